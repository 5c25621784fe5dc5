//! Checkout API 模块

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

/// POST /api/checkout - 公共路由
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/checkout", post(handler::checkout))
}
