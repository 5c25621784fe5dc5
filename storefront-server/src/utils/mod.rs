//! 工具模块 - 通用工具函数和类型
//!
//! - [`AppError`] / [`ApiResponse`] (from `shared::error`)
//! - [`AppJson`] / [`AppPath`] / [`AppQuery`] 提取器
//! - 日志初始化、输入校验、金额计算

pub mod error;
pub mod extract;
pub mod logger;
pub mod money;
pub mod validation;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use extract::{AppJson, AppPath, AppQuery};
