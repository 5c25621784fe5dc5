//! Menu Item API Handlers

use axum::{Json, extract::State};
use serde::Deserialize;
use shared::models::{
    AvailabilityUpdate, CustomizationLinkInput, MenuItem, MenuItemCreate, MenuItemDetail,
    MenuItemUpdate,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::menu_item;
use crate::menu::{self, CatalogView};
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_URL_LEN, validate_optional_text, validate_price,
    validate_required_text, validate_slug,
};
use crate::utils::{AppError, AppJson, AppPath, AppQuery, AppResult, ErrorCode};

#[derive(Debug, Deserialize)]
pub struct ItemListQuery {
    pub category_id: Option<i64>,
}

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::MenuItemNotFound, format!("Menu item {id} not found"))
}

/// GET /api/items - 商品列表
pub async fn list(
    State(state): State<ServerState>,
    user: Option<CurrentUser>,
    AppQuery(query): AppQuery<ItemListQuery>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let items = menu_item::find_all(&state.pool, query.category_id, user.is_some()).await?;
    Ok(Json(items))
}

/// GET /api/items/:id - 商品详情 (含定制组和选项)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: Option<CurrentUser>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<MenuItemDetail>> {
    let view = CatalogView::for_admin(user.is_some());
    let item = menu_item::find_by_id(&state.pool, id)
        .await?
        .filter(|i| i.is_active || view.include_inactive())
        .ok_or_else(|| not_found(id))?;
    let detail = menu::item_detail(&state.pool, item, view).await?;
    Ok(Json(detail))
}

/// POST /api/items - 创建商品
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<MenuItemCreate>,
) -> AppResult<Json<MenuItem>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;
    validate_price(payload.base_price, "base_price")?;
    if let Some(slug) = &payload.slug {
        validate_slug(slug)?;
    }

    let item = menu_item::create(&state.pool, payload).await?;
    tracing::info!(id = item.id, name = %item.name, "Menu item created");
    Ok(Json(item))
}

/// PUT /api/items/:id - 更新商品
pub async fn update(
    State(state): State<ServerState>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;
    if let Some(price) = payload.base_price {
        validate_price(price, "base_price")?;
    }
    if let Some(slug) = &payload.slug {
        validate_slug(slug)?;
    }

    let item = menu_item::update(&state.pool, id, payload).await?;
    Ok(Json(item))
}

/// DELETE /api/items/:id - 删除商品 (关联级联删除, 订单保留快照)
pub async fn delete(
    State(state): State<ServerState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<bool>> {
    if !menu_item::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(id, "Menu item deleted");
    Ok(Json(true))
}

/// PUT /api/items/:id/customizations - 替换定制组关联
pub async fn replace_customizations(
    State(state): State<ServerState>,
    AppPath(id): AppPath<i64>,
    AppJson(links): AppJson<Vec<CustomizationLinkInput>>,
) -> AppResult<Json<MenuItemDetail>> {
    menu_item::replace_links(&state.pool, id, &links).await?;
    let item = menu_item::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let detail = menu::item_detail(&state.pool, item, CatalogView::Admin).await?;
    Ok(Json(detail))
}

/// PUT /api/items/:id/availability - 售罄开关
pub async fn set_availability(
    State(state): State<ServerState>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<AvailabilityUpdate>,
) -> AppResult<Json<MenuItem>> {
    let item = menu_item::set_availability(&state.pool, id, payload.is_available).await?;
    tracing::info!(id, is_available = item.is_available, "Menu item availability changed");
    Ok(Json(item))
}
