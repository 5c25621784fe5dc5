//! Category API Handlers

use axum::{Json, extract::State};
use shared::models::{Category, CategoryCreate, CategoryUpdate, SortOrderUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::category;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, validate_optional_text, validate_required_text,
    validate_slug,
};
use crate::utils::{AppError, AppJson, AppPath, AppResult, ErrorCode};

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::CategoryNotFound, format!("Category {id} not found"))
}

/// GET /api/categories - 获取分类 (管理员可见停用分类)
pub async fn list(
    State(state): State<ServerState>,
    user: Option<CurrentUser>,
) -> AppResult<Json<Vec<Category>>> {
    let categories = category::find_all(&state.pool, user.is_some()).await?;
    Ok(Json(categories))
}

/// GET /api/categories/:id - 获取单个分类
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: Option<CurrentUser>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<Category>> {
    let category = category::find_by_id(&state.pool, id)
        .await?
        .filter(|c| c.is_active || user.is_some())
        .ok_or_else(|| not_found(id))?;
    Ok(Json(category))
}

/// POST /api/categories - 创建分类
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<CategoryCreate>,
) -> AppResult<Json<Category>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    if let Some(slug) = &payload.slug {
        validate_slug(slug)?;
    }

    let category = category::create(&state.pool, payload).await?;
    tracing::info!(id = category.id, name = %category.name, "Category created");
    Ok(Json(category))
}

/// PUT /api/categories/:id - 更新分类
pub async fn update(
    State(state): State<ServerState>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    if let Some(slug) = &payload.slug {
        validate_slug(slug)?;
    }

    let category = category::update(&state.pool, id, payload).await?;
    Ok(Json(category))
}

/// DELETE /api/categories/:id - 删除分类 (仍有商品时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<bool>> {
    if !category::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(id, "Category deleted");
    Ok(Json(true))
}

/// PUT /api/categories/sort-order - 批量更新排序
pub async fn batch_update_sort_order(
    State(state): State<ServerState>,
    AppJson(updates): AppJson<Vec<SortOrderUpdate>>,
) -> AppResult<Json<bool>> {
    category::batch_update_sort_order(&state.pool, &updates).await?;
    Ok(Json(true))
}
