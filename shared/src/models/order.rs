//! Order Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// COMPLETED and CANCELLED accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Next status on the happy path, if any
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::Preparing),
            Self::Preparing => Some(Self::Ready),
            Self::Ready => Some(Self::Completed),
            Self::Completed | Self::Cancelled => None,
        }
    }

    /// Whether `self -> to` is an allowed transition
    pub fn can_transition_to(&self, to: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == Self::Cancelled || self.next() == Some(to)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Preparing => "PREPARING",
            Self::Ready => "READY",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fulfilment type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderType {
    #[default]
    Pickup,
    Delivery,
}

/// Order entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    /// Customer-facing number, sequential from 1001
    pub order_number: i64,
    pub status: OrderStatus,
    pub order_type: OrderType,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: String,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub delivery_fee: f64,
    pub tip_amount: f64,
    pub total: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line (name/price snapshot)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    /// Nulled when the menu item is deleted
    pub menu_item_id: Option<i64>,
    pub item_name: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub line_total: f64,
    pub special_instructions: Option<String>,
}

/// Selected option snapshot on an order line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItemOption {
    pub id: i64,
    pub order_item_id: i64,
    pub option_id: Option<i64>,
    pub group_name: String,
    pub option_name: String,
    pub quantity: i32,
    /// Contribution of this option to the unit price
    pub price: f64,
}

/// Order line with its options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemDetail {
    #[serde(flatten)]
    pub item: OrderItem,
    pub options: Vec<OrderItemOption>,
}

/// Order with lines, returned by checkout and the admin detail view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemDetail>,
}

/// Admin list query (`GET /api/orders?status=&limit=&offset=`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Status change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// Notes change payload (None clears)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderNotesUpdate {
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let mut status = OrderStatus::Pending;
        let mut seen = vec![status];
        while let Some(next) = status.next() {
            assert!(status.can_transition_to(next));
            status = next;
            seen.push(status);
        }
        assert_eq!(
            seen,
            vec![
                OrderStatus::Pending,
                OrderStatus::Confirmed,
                OrderStatus::Preparing,
                OrderStatus::Ready,
                OrderStatus::Completed,
            ]
        );
    }

    #[test]
    fn test_cancel_from_non_terminal_only() {
        for s in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
        ] {
            assert!(s.can_transition_to(OrderStatus::Cancelled));
        }
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_rejects_skips_and_reversals() {
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Ready));
        assert!(!OrderStatus::Ready.can_transition_to(OrderStatus::Preparing));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn test_status_wire_name() {
        assert_eq!(serde_json::to_string(&OrderStatus::Preparing).unwrap(), "\"PREPARING\"");
        assert_eq!(OrderStatus::Cancelled.to_string(), "CANCELLED");
    }
}
