//! System State Model

use serde::{Deserialize, Serialize};

/// Singleton row holding store-wide counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SystemState {
    pub id: i64,
    /// Last order number handed out (orders start at 1001)
    pub last_order_number: i64,
    pub created_at: i64,
    pub updated_at: i64,
}
