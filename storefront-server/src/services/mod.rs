//! 服务模块
//!
//! - [`https`] - HTTP 服务 (路由组装与中间件)

pub mod https;

pub use https::{HttpsService, build_app};
