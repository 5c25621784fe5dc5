use axum::{Json, extract::State};
use shared::models::{CheckoutRequest, OrderDetail};

use crate::core::ServerState;
use crate::orders;
use crate::utils::{AppJson, AppResult};

/// POST /api/checkout - 下单
///
/// Re-prices the cart and persists the order with status PENDING.
pub async fn checkout(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<CheckoutRequest>,
) -> AppResult<Json<OrderDetail>> {
    let order = orders::place_order(&state.pool, payload).await?;
    Ok(Json(order))
}
