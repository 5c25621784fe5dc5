//! Customization Group / Option API 模块
//!
//! 全部为管理接口 (需要认证)

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/customization-groups", group_routes())
        .route(
            "/api/customization-options/{id}",
            put(handler::update_option).delete(handler::delete_option),
        )
}

fn group_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/options", post(handler::create_option))
}
