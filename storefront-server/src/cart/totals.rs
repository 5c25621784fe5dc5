//! Order-level totals
//!
//! subtotal → tax → delivery fee → tip → total, all in Decimal.

use crate::utils::money::{percent_of, round_money, to_decimal, to_f64};
use rust_decimal::Decimal;
use shared::models::{OrderType, StoreSettings};

/// Cart totals, each rounded to cents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartTotals {
    pub subtotal: f64,
    pub tax_amount: f64,
    pub delivery_fee: f64,
    pub tip_amount: f64,
    pub total: f64,
}

/// Compute totals from already-priced line totals.
///
/// Tax applies to the subtotal only. The delivery fee is charged for DELIVERY
/// orders unless the subtotal reaches `free_delivery_threshold`.
pub fn compute_totals(
    order_type: OrderType,
    line_totals: impl IntoIterator<Item = f64>,
    tip_amount: f64,
    settings: &StoreSettings,
) -> CartTotals {
    let subtotal = round_money(line_totals.into_iter().map(to_decimal).sum::<Decimal>());
    let tax = round_money(percent_of(subtotal, to_decimal(settings.tax_rate_percent)));

    let delivery_fee = match order_type {
        OrderType::Pickup => Decimal::ZERO,
        OrderType::Delivery => match settings.free_delivery_threshold {
            Some(threshold) if subtotal >= to_decimal(threshold) => Decimal::ZERO,
            _ => round_money(to_decimal(settings.delivery_fee)),
        },
    };

    let tip = round_money(to_decimal(tip_amount).max(Decimal::ZERO));
    let total = subtotal + tax + delivery_fee + tip;

    CartTotals {
        subtotal: to_f64(subtotal),
        tax_amount: to_f64(tax),
        delivery_fee: to_f64(delivery_fee),
        tip_amount: to_f64(tip),
        total: to_f64(total),
    }
}
