//! Order API Handlers

use axum::{Json, extract::State};
use shared::models::{Order, OrderDetail, OrderListQuery, OrderNotesUpdate, OrderStatusUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::order;
use crate::orders;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppJson, AppPath, AppQuery, AppResult, ErrorCode};

/// GET /api/orders?status=&limit=&offset= - 订单列表 (最新在前)
pub async fn list(
    State(state): State<ServerState>,
    AppQuery(query): AppQuery<OrderListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order::find_all(&state.pool, &query).await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - 订单详情 (含商品和选项快照)
pub async fn get_by_id(
    State(state): State<ServerState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<OrderDetail>> {
    let detail = order::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
        })?;
    Ok(Json(detail))
}

/// PUT /api/orders/:id/status - 状态流转
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    let order = orders::transition_status(&state.pool, id, payload.status).await?;
    tracing::info!(
        order_id = id,
        order_number = order.order_number,
        status = %order.status,
        by = %user.username,
        "Order status updated"
    );
    Ok(Json(order))
}

/// PUT /api/orders/:id/notes - 更新备注 (null 清空)
pub async fn update_notes(
    State(state): State<ServerState>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<OrderNotesUpdate>,
) -> AppResult<Json<Order>> {
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;
    let order = orders::update_notes(&state.pool, id, payload.notes).await?;
    Ok(Json(order))
}

/// DELETE /api/orders/:id - 删除已完成/已取消订单
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<bool>> {
    orders::delete_order(&state.pool, id).await?;
    tracing::info!(order_id = id, by = %user.username, "Order deleted");
    Ok(Json(true))
}
