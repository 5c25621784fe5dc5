//! Checkout

use crate::cart::price_cart_with;
use crate::db::repository::{order, setting, system_state};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{CheckoutCustomer, CheckoutRequest, OrderDetail, OrderType};
use sqlx::SqlitePool;
use validator::Validate;

/// Validate, price and persist an order.
///
/// The order number is allocated inside the same transaction as the inserts,
/// so a failed checkout leaves no gap.
pub async fn place_order(pool: &SqlitePool, req: CheckoutRequest) -> AppResult<OrderDetail> {
    let settings = setting::load_store_settings(pool).await?;
    if !settings.accepting_orders {
        return Err(AppError::with_message(
            ErrorCode::StoreClosed,
            format!("{} is not accepting orders right now", settings.restaurant_name),
        ));
    }

    let customer = normalize_customer(req.customer);
    customer.validate()?;
    if req.cart.order_type == OrderType::Delivery && customer.delivery_address.is_none() {
        return Err(AppError::validation("delivery_address is required for delivery orders")
            .with_detail("field", "delivery_address"));
    }

    let summary = price_cart_with(pool, &req.cart, &settings).await?;
    if summary.order_type == OrderType::Delivery
        && summary.subtotal < settings.minimum_delivery_order
    {
        return Err(AppError::with_message(
            ErrorCode::OrderBelowMinimum,
            format!(
                "Delivery orders must be at least {:.2} before tax and fees",
                settings.minimum_delivery_order
            ),
        )
        .with_detail("minimum", settings.minimum_delivery_order)
        .with_detail("subtotal", summary.subtotal));
    }

    let mut tx = pool.begin().await?;
    let order_number = system_state::next_order_number(&mut tx).await?;
    let order_id = order::insert(&mut tx, order_number, &customer, &summary).await?;
    let detail = order::find_detail_with(&mut tx, order_id)
        .await?
        .ok_or_else(|| AppError::internal("Order vanished after insert"))?;
    tx.commit().await?;

    tracing::info!(
        order_id,
        order_number,
        order_type = ?summary.order_type,
        total = summary.total,
        items = summary.items.len(),
        "Order placed"
    );
    Ok(detail)
}

/// Trim contact fields; blank optionals become `None`
fn normalize_customer(c: CheckoutCustomer) -> CheckoutCustomer {
    fn opt(v: Option<String>) -> Option<String> {
        v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
    }
    CheckoutCustomer {
        customer_name: c.customer_name.trim().to_string(),
        customer_email: opt(c.customer_email),
        customer_phone: c.customer_phone.trim().to_string(),
        delivery_address: opt(c.delivery_address),
        notes: opt(c.notes),
    }
}
