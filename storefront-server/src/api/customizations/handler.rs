//! Customization API Handlers

use axum::{Json, extract::State};
use serde::Deserialize;
use shared::models::{
    CustomizationGroupCreate, CustomizationGroupUpdate, CustomizationGroupWithOptions,
    CustomizationOption, CustomizationOptionCreate, CustomizationOptionUpdate,
};

use crate::core::ServerState;
use crate::db::repository::customization;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, validate_modifier, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppJson, AppPath, AppQuery, AppResult, ErrorCode};

#[derive(Debug, Default, Deserialize)]
pub struct DeleteGroupQuery {
    #[serde(default)]
    pub force: bool,
}

fn group_not_found(id: i64) -> AppError {
    AppError::with_message(
        ErrorCode::CustomizationGroupNotFound,
        format!("Customization group {id} not found"),
    )
}

fn validate_option_create(option: &CustomizationOptionCreate) -> AppResult<()> {
    validate_required_text(&option.name, "option name", MAX_NAME_LEN)?;
    validate_modifier(option.price_modifier, "price_modifier")
}

/// GET /api/customization-groups - 全部定制组 (含选项)
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<CustomizationGroupWithOptions>>> {
    let groups = customization::find_all_groups(&state.pool, true).await?;
    Ok(Json(groups))
}

/// GET /api/customization-groups/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<CustomizationGroupWithOptions>> {
    let group = customization::find_group(&state.pool, id)
        .await?
        .ok_or_else(|| group_not_found(id))?;
    Ok(Json(group))
}

/// POST /api/customization-groups - 创建定制组 (可内嵌选项)
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<CustomizationGroupCreate>,
) -> AppResult<Json<CustomizationGroupWithOptions>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    for option in &payload.options {
        validate_option_create(option)?;
    }

    let group = customization::create_group(&state.pool, payload).await?;
    tracing::info!(
        id = group.group.id,
        name = %group.group.name,
        options = group.options.len(),
        "Customization group created"
    );
    Ok(Json(group))
}

/// PUT /api/customization-groups/:id
pub async fn update(
    State(state): State<ServerState>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<CustomizationGroupUpdate>,
) -> AppResult<Json<CustomizationGroupWithOptions>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(description) = &payload.description {
        validate_optional_text(description, "description", MAX_DESCRIPTION_LEN)?;
    }

    let group = customization::update_group(&state.pool, id, payload).await?;
    Ok(Json(group))
}

/// DELETE /api/customization-groups/:id?force=true
///
/// Without `force` a group still attached to an item is rejected (409).
pub async fn delete(
    State(state): State<ServerState>,
    AppPath(id): AppPath<i64>,
    AppQuery(query): AppQuery<DeleteGroupQuery>,
) -> AppResult<Json<bool>> {
    if !customization::delete_group(&state.pool, id, query.force).await? {
        return Err(group_not_found(id));
    }
    tracing::info!(id, force = query.force, "Customization group deleted");
    Ok(Json(true))
}

/// POST /api/customization-groups/:id/options
pub async fn create_option(
    State(state): State<ServerState>,
    AppPath(group_id): AppPath<i64>,
    AppJson(payload): AppJson<CustomizationOptionCreate>,
) -> AppResult<Json<CustomizationOption>> {
    validate_option_create(&payload)?;
    let option = customization::create_option(&state.pool, group_id, payload).await?;
    Ok(Json(option))
}

/// PUT /api/customization-options/:id
pub async fn update_option(
    State(state): State<ServerState>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<CustomizationOptionUpdate>,
) -> AppResult<Json<CustomizationOption>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(modifier) = payload.price_modifier {
        validate_modifier(modifier, "price_modifier")?;
    }
    let option = customization::update_option(&state.pool, id, payload).await?;
    Ok(Json(option))
}

/// DELETE /api/customization-options/:id
pub async fn delete_option(
    State(state): State<ServerState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<bool>> {
    if !customization::delete_option(&state.pool, id).await? {
        return Err(AppError::with_message(
            ErrorCode::CustomizationOptionNotFound,
            format!("Customization option {id} not found"),
        ));
    }
    Ok(Json(true))
}
