//! 统一错误处理
//!
//! Re-exports the shared error system and bridges the repository layer into
//! it, so handlers can use `?` on repository calls.
//!
//! # 使用示例
//!
//! ```ignore
//! let item = menu_item::find_by_id(&state.pool, id)
//!     .await?
//!     .ok_or_else(|| AppError::new(ErrorCode::MenuItemNotFound))?;
//! ```

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

use crate::db::repository::RepoError;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Business(code, msg) => AppError::with_message(code, msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_error_mapping() {
        let err: AppError = RepoError::Duplicate("Category 'Pizza' already exists".into()).into();
        assert_eq!(err.code, ErrorCode::AlreadyExists);
        assert_eq!(err.http_status(), http::StatusCode::CONFLICT);

        let err: AppError =
            RepoError::Business(ErrorCode::CategoryHasItems, "has items".into()).into();
        assert_eq!(err.code, ErrorCode::CategoryHasItems);

        let err: AppError = RepoError::Database("locked".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
