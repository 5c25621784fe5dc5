//! Cart pricing and checkout payloads

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::customization::{OptionSelection, PriceType};
use super::order::OrderType;

/// One cart line as sent by the client (no prices: the server prices it)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemInput {
    pub menu_item_id: i64,
    pub quantity: i32,
    #[serde(default)]
    pub selections: Vec<OptionSelection>,
    pub special_instructions: Option<String>,
}

/// `POST /api/cart/price` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartRequest {
    #[serde(default)]
    pub order_type: OrderType,
    pub tip_amount: Option<f64>,
    pub items: Vec<CartItemInput>,
}

/// Priced option on a cart line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedOption {
    pub option_id: i64,
    pub group_id: i64,
    pub group_name: String,
    pub option_name: String,
    pub price_type: PriceType,
    pub quantity: i32,
    /// Contribution to the unit price
    pub price: f64,
}

/// Priced cart line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedCartItem {
    pub menu_item_id: i64,
    pub item_name: String,
    pub quantity: i32,
    pub base_price: f64,
    pub unit_price: f64,
    pub line_total: f64,
    pub options: Vec<PricedOption>,
    pub special_instructions: Option<String>,
}

/// Fully priced cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSummary {
    pub order_type: OrderType,
    pub items: Vec<PricedCartItem>,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub delivery_fee: f64,
    pub tip_amount: f64,
    pub total: f64,
}

/// Customer contact block of a checkout
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CheckoutCustomer {
    #[validate(length(min = 1, max = 200, message = "customer_name must be 1..=200 chars"))]
    pub customer_name: String,
    #[validate(email(message = "customer_email is not a valid email address"))]
    pub customer_email: Option<String>,
    #[validate(length(min = 5, max = 32, message = "customer_phone must be 5..=32 chars"))]
    pub customer_phone: String,
    #[validate(length(max = 500, message = "delivery_address is too long"))]
    pub delivery_address: Option<String>,
    #[validate(length(max = 500, message = "notes is too long"))]
    pub notes: Option<String>,
}

/// `POST /api/checkout` body: cart plus customer fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    #[serde(flatten)]
    pub cart: CartRequest,
    #[serde(flatten)]
    pub customer: CheckoutCustomer,
}
