//! Settings API Handlers

use axum::{Json, extract::State};
use shared::models::{Setting, SettingUpsert};

use crate::core::ServerState;
use crate::db::repository::setting;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_KEY_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppJson, AppPath, AppResult, ErrorCode};

fn not_found(key: &str) -> AppError {
    AppError::with_message(ErrorCode::SettingNotFound, format!("Setting '{key}' not found"))
}

/// GET /api/settings
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Setting>>> {
    let settings = setting::find_all(&state.pool).await?;
    Ok(Json(settings))
}

/// GET /api/settings/:key
pub async fn get_by_key(
    State(state): State<ServerState>,
    AppPath(key): AppPath<String>,
) -> AppResult<Json<Setting>> {
    let setting = setting::find_by_key(&state.pool, &key)
        .await?
        .ok_or_else(|| not_found(&key))?;
    Ok(Json(setting))
}

/// PUT /api/settings/:key - 写入设置 (已知键做类型校验)
pub async fn upsert(
    State(state): State<ServerState>,
    AppPath(key): AppPath<String>,
    AppJson(payload): AppJson<SettingUpsert>,
) -> AppResult<Json<Setting>> {
    validate_required_text(&key, "key", MAX_KEY_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;

    let setting = setting::upsert(&state.pool, &key, payload).await?;
    tracing::info!(key = %setting.key, value = %setting.value, "Setting updated");
    Ok(Json(setting))
}

/// DELETE /api/settings/:key - 删除后恢复默认值
pub async fn delete(
    State(state): State<ServerState>,
    AppPath(key): AppPath<String>,
) -> AppResult<Json<bool>> {
    if !setting::delete(&state.pool, &key).await? {
        return Err(not_found(&key));
    }
    Ok(Json(true))
}
