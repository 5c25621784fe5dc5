//! Storefront Menu API 模块
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/menu | GET | 菜单 (分类 + 商品) | 无 |
//! | /api/menu/items/{id_or_slug} | GET | 商品定制视图 | 无 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/menu", get(handler::menu))
        .route("/api/menu/items/{id_or_slug}", get(handler::item))
}
