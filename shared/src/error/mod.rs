//! Unified error system
//!
//! - [`ErrorCode`]: numeric codes shared by server, CLI and front-ends
//! - [`ErrorCategory`]: classification of codes by range
//! - [`AppError`]: error with code, message and optional details
//! - [`ApiResponse`]: JSON envelope used for error bodies
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::with_message(ErrorCode::CategoryHasItems, "Category 3 still has items")
//!     .with_detail("category_id", 3);
//!
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(6102));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
