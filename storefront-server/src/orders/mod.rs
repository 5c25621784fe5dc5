//! Orders
//!
//! - **checkout**: turns a priced cart into a persisted PENDING order
//! - **lifecycle**: admin status transitions, notes and deletion
//!
//! # Data Flow
//!
//! ```text
//! CheckoutRequest → price_cart → BEGIN
//!                                  ├─ next_order_number (system_state)
//!                                  ├─ INSERT orders / order_item / order_item_option
//!                                COMMIT → OrderDetail
//! ```

pub mod checkout;
pub mod lifecycle;

pub use checkout::place_order;
pub use lifecycle::{delete_order, transition_status, update_notes};
