//! Data models
//!
//! Shared between storefront-server, storefront-cli and front-ends (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).
//! Money is `f64` in currency units; arithmetic happens server-side in `Decimal`.

pub mod auth;
pub mod cart;
pub mod category;
pub mod customization;
pub mod menu_item;
pub mod order;
pub mod setting;
pub mod system_state;

// Re-exports
pub use auth::*;
pub use cart::*;
pub use category::*;
pub use customization::*;
pub use menu_item::*;
pub use order::*;
pub use setting::*;
pub use system_state::*;
