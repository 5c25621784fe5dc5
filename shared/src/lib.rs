//! Shared types for the Slice ordering platform
//!
//! Data models, the unified error system and small utilities used by both
//! `storefront-server` and `storefront-cli`.

pub mod error;
pub mod models;
pub mod serde_helpers;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
