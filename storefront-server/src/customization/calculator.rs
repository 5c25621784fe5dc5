//! Item Price Calculator
//!
//! Prices a configured menu item:
//! - FLAT adds `price_modifier`
//! - PERCENTAGE adds `base_price × price_modifier / 100`
//! - PER_UNIT adds `price_modifier × option quantity`
//!
//! Uses rust_decimal for precision calculations.

use super::ResolvedSelection;
use crate::utils::money::{percent_of, round_money, to_decimal, to_f64};
use rust_decimal::Decimal;
use shared::models::{PriceType, PricedOption};

/// Result of pricing one cart line
#[derive(Debug, Clone, PartialEq)]
pub struct ItemPrice {
    pub unit_price: f64,
    pub line_total: f64,
    pub options: Vec<PricedOption>,
}

/// Amount one selected option adds to the unit price (unrounded)
pub fn option_contribution(
    base_price: Decimal,
    price_type: PriceType,
    modifier: f64,
    quantity: i32,
) -> Decimal {
    let modifier = to_decimal(modifier);
    match price_type {
        PriceType::Flat => modifier,
        PriceType::Percentage => percent_of(base_price, modifier),
        PriceType::PerUnit => modifier * Decimal::from(quantity),
    }
}

/// Price an item from its base price and validated selections.
///
/// The unit price is floored at zero. `line_total` is the rounded unit price
/// times `quantity`.
pub fn price_item(
    base_price: f64,
    selections: &[ResolvedSelection<'_>],
    quantity: i32,
) -> ItemPrice {
    let base = to_decimal(base_price);
    let mut unit = base;
    let mut options = Vec::with_capacity(selections.len());

    for sel in selections {
        let amount = option_contribution(
            base,
            sel.option.price_type,
            sel.option.price_modifier,
            sel.quantity,
        );
        unit += amount;
        options.push(PricedOption {
            option_id: sel.option.id,
            group_id: sel.group.id,
            group_name: sel.group.name.clone(),
            option_name: sel.option.name.clone(),
            price_type: sel.option.price_type,
            quantity: sel.quantity,
            price: to_f64(amount),
        });
    }

    let unit = round_money(unit.max(Decimal::ZERO));
    let line = unit * Decimal::from(quantity.max(0));

    ItemPrice {
        unit_price: to_f64(unit),
        line_total: to_f64(line),
        options,
    }
}
