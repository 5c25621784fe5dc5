//! Cart Pricing API 模块

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

/// POST /api/cart/price - 公共路由
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/cart/price", post(handler::price))
}
