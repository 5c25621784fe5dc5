//! Storefront Menu Handlers

use axum::{Json, extract::State};
use shared::models::{MenuItemDetail, MenuSection};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::menu::{self, CatalogView};
use crate::utils::{AppError, AppPath, AppResult, ErrorCode};

/// GET /api/menu - 菜单: 启用的分类及其启用的商品
pub async fn menu(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuSection>>> {
    let sections = menu::load_menu(&state.pool).await?;
    Ok(Json(sections))
}

/// GET /api/menu/items/:id_or_slug - pizza builder 视图
///
/// Inactive items are hidden from anonymous callers.
pub async fn item(
    State(state): State<ServerState>,
    user: Option<CurrentUser>,
    AppPath(id_or_slug): AppPath<String>,
) -> AppResult<Json<MenuItemDetail>> {
    let view = CatalogView::for_admin(user.is_some());
    let item = menu::find_item(&state.pool, &id_or_slug)
        .await?
        .filter(|i| i.is_active || view.include_inactive())
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::MenuItemNotFound,
                format!("Menu item '{id_or_slug}' not found"),
            )
        })?;

    let detail = menu::item_detail(&state.pool, item, view).await?;
    Ok(Json(detail))
}
