//! Menu Item API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/items | GET/POST | 列表 (?category_id=) / 创建 |
//! | /api/items/{id} | GET/PUT/DELETE | 详情 (含定制组) / 更新 / 删除 |
//! | /api/items/{id}/customizations | PUT | 替换定制组关联 |
//! | /api/items/{id}/availability | PUT | 售罄开关 |

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/items", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/customizations", put(handler::replace_customizations))
        .route("/{id}/availability", put(handler::set_availability))
}
