//! Repository Module
//!
//! Free functions over `&SqlitePool` (or a transaction) per table.

// Menu
pub mod category;
pub mod customization;
pub mod menu_item;

// Orders
pub mod order;
pub mod system_state;

// Settings
pub mod setting;

use shared::error::ErrorCode;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Rule violation with a specific error code (e.g. category still has items)
    #[error("{1}")]
    Business(ErrorCode, String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound("Row not found".into()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepoError::Duplicate(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                RepoError::Validation(format!(
                    "Referenced record does not exist: {}",
                    db_err.message()
                ))
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Tables that carry a unique `slug` column
#[derive(Debug, Clone, Copy)]
pub enum SlugTable {
    Category,
    MenuItem,
}

impl SlugTable {
    fn table(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::MenuItem => "menu_item",
        }
    }

    /// Slug used when a name has no ASCII letters or digits
    pub fn fallback_slug(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::MenuItem => "item",
        }
    }
}

/// First free slug of `base`, `base-2`, `base-3`, ... in `table`.
///
/// `exclude_id` is the row being renamed, whose own slug does not count as taken.
pub async fn next_free_slug(
    conn: &mut sqlx::SqliteConnection,
    table: SlugTable,
    base: &str,
    exclude_id: Option<i64>,
) -> RepoResult<String> {
    let base = if base.is_empty() { table.fallback_slug() } else { base };
    let sql = format!(
        "SELECT COUNT(*) FROM {} WHERE slug = ? AND id != ?",
        table.table()
    );
    let mut n = 1;
    loop {
        let candidate = shared::util::slug_with_suffix(base, n);
        let taken: i64 = sqlx::query_scalar(&sql)
            .bind(&candidate)
            .bind(exclude_id.unwrap_or(-1))
            .fetch_one(&mut *conn)
            .await?;
        if taken == 0 {
            return Ok(candidate);
        }
        n += 1;
    }
}
