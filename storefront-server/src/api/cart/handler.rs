use axum::{Json, extract::State};
use shared::models::{CartRequest, CartSummary};

use crate::cart;
use crate::core::ServerState;
use crate::utils::{AppJson, AppResult};

/// POST /api/cart/price - 服务端计价 (客户端价格不可信)
pub async fn price(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<CartRequest>,
) -> AppResult<Json<CartSummary>> {
    let summary = cart::price_cart(&state.pool, &payload).await?;
    Ok(Json(summary))
}
