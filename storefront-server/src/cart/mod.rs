//! Cart Pricing
//!
//! Server-side pricing of a cart: every line is re-validated against the
//! current menu and customization groups, then totals are computed from the
//! store settings. Prices sent by clients are never used.

mod totals;

pub use totals::*;

use crate::customization::{self, price_item};
use crate::db::repository::{customization as customization_repo, menu_item, setting};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text, validate_price};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    CartRequest, CartSummary, CustomizationGroupWithOptions, MenuItem, PricedCartItem,
    StoreSettings,
};
use sqlx::SqlitePool;
use std::collections::HashMap;

/// Maximum quantity of one cart line
pub const MAX_LINE_QUANTITY: i32 = 99;
/// Maximum number of lines in one cart
pub const MAX_CART_LINES: usize = 50;

/// Price a cart against the live menu and the current store settings
pub async fn price_cart(pool: &SqlitePool, cart: &CartRequest) -> AppResult<CartSummary> {
    let settings = setting::load_store_settings(pool).await?;
    price_cart_with(pool, cart, &settings).await
}

/// [`price_cart`] with settings already loaded (checkout reads them once)
pub async fn price_cart_with(
    pool: &SqlitePool,
    cart: &CartRequest,
    settings: &StoreSettings,
) -> AppResult<CartSummary> {
    check_shape(cart)?;

    let mut ids: Vec<i64> = cart.items.iter().map(|l| l.menu_item_id).collect();
    ids.sort_unstable();
    ids.dedup();
    let items: HashMap<i64, MenuItem> = menu_item::find_by_ids(pool, &ids)
        .await?
        .into_iter()
        .map(|i| (i.id, i))
        .collect();

    let mut groups: HashMap<i64, Vec<CustomizationGroupWithOptions>> = HashMap::new();
    for id in &ids {
        if items.contains_key(id) {
            groups.insert(*id, customization_repo::find_groups_for_item(pool, *id).await?);
        }
    }

    let mut priced = Vec::with_capacity(cart.items.len());
    for (idx, line) in cart.items.iter().enumerate() {
        let item = items.get(&line.menu_item_id).ok_or_else(|| {
            AppError::with_message(
                ErrorCode::MenuItemNotFound,
                format!("Menu item {} not found", line.menu_item_id),
            )
            .with_detail("line", idx)
        })?;
        if !item.is_orderable() {
            return Err(AppError::with_message(
                ErrorCode::MenuItemUnavailable,
                format!("{} is not available right now", item.name),
            )
            .with_detail("line", idx));
        }

        let item_groups = groups.get(&item.id).map(Vec::as_slice).unwrap_or_default();
        let resolved = customization::validate_selections(item_groups, &line.selections)
            .map_err(|e| AppError::from(e).with_detail("line", idx))?;
        let price = price_item(item.base_price, &resolved, line.quantity);

        priced.push(PricedCartItem {
            menu_item_id: item.id,
            item_name: item.name.clone(),
            quantity: line.quantity,
            base_price: item.base_price,
            unit_price: price.unit_price,
            line_total: price.line_total,
            options: price.options,
            special_instructions: line
                .special_instructions
                .as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        });
    }

    let totals = compute_totals(
        cart.order_type,
        priced.iter().map(|p| p.line_total),
        cart.tip_amount.unwrap_or(0.0),
        settings,
    );

    Ok(CartSummary {
        order_type: cart.order_type,
        items: priced,
        subtotal: totals.subtotal,
        tax_amount: totals.tax_amount,
        delivery_fee: totals.delivery_fee,
        tip_amount: totals.tip_amount,
        total: totals.total,
    })
}

/// Request-level checks that need no database access
fn check_shape(cart: &CartRequest) -> AppResult<()> {
    if cart.items.is_empty() {
        return Err(AppError::with_message(ErrorCode::OrderEmpty, "Cart is empty"));
    }
    if cart.items.len() > MAX_CART_LINES {
        return Err(AppError::validation(format!(
            "Cart cannot have more than {MAX_CART_LINES} lines"
        )));
    }
    for (idx, line) in cart.items.iter().enumerate() {
        if !(1..=MAX_LINE_QUANTITY).contains(&line.quantity) {
            return Err(AppError::validation(format!(
                "quantity must be between 1 and {MAX_LINE_QUANTITY}"
            ))
            .with_detail("line", idx));
        }
        validate_optional_text(&line.special_instructions, "special_instructions", MAX_NOTE_LEN)
            .map_err(|e| e.with_detail("line", idx))?;
    }
    if let Some(tip) = cart.tip_amount {
        validate_price(tip, "tip_amount")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{category, test_support};
    use serde_json::json;
    use shared::models::{
        CartItemInput, CategoryCreate, CustomizationGroupCreate, CustomizationLinkInput,
        CustomizationOptionCreate, MenuItemCreate, OptionSelection, OrderType, SelectionType,
        SettingUpsert,
    };

    struct Fixture {
        pool: SqlitePool,
        pizza: i64,
        large: i64,
        pepperoni: i64,
    }

    async fn fixture() -> Fixture {
        let pool = test_support::pool().await;
        let cat = category::create(
            &pool,
            CategoryCreate {
                name: "Pizzas".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let pizza = menu_item::create(
            &pool,
            MenuItemCreate {
                category_id: cat.id,
                name: "Margherita".into(),
                base_price: 8.99,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let size = customization_repo::create_group(
            &pool,
            CustomizationGroupCreate {
                name: "Size".into(),
                is_required: Some(true),
                options: vec![
                    CustomizationOptionCreate {
                        name: "Medium".into(),
                        ..Default::default()
                    },
                    CustomizationOptionCreate {
                        name: "Large".into(),
                        price_modifier: 1.0,
                        ..Default::default()
                    },
                ],
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let toppings = customization_repo::create_group(
            &pool,
            CustomizationGroupCreate {
                name: "Toppings".into(),
                selection_type: Some(SelectionType::Multiple),
                max_selections: Some(1),
                options: vec![
                    CustomizationOptionCreate {
                        name: "Pepperoni".into(),
                        price_modifier: 1.5,
                        ..Default::default()
                    },
                    CustomizationOptionCreate {
                        name: "Basil".into(),
                        price_modifier: 0.5,
                        ..Default::default()
                    },
                ],
                ..Default::default()
            },
        )
        .await
        .unwrap();
        menu_item::replace_links(
            &pool,
            pizza.id,
            &[
                CustomizationLinkInput {
                    group_id: size.group.id,
                    sort_order: None,
                    is_required_override: None,
                },
                CustomizationLinkInput {
                    group_id: toppings.group.id,
                    sort_order: None,
                    is_required_override: None,
                },
            ],
        )
        .await
        .unwrap();

        Fixture {
            pool,
            pizza: pizza.id,
            large: size.options[1].id,
            pepperoni: toppings.options[0].id,
        }
    }

    fn line(menu_item_id: i64, quantity: i32, options: &[i64]) -> CartItemInput {
        CartItemInput {
            menu_item_id,
            quantity,
            selections: options.iter().map(|&id| OptionSelection::new(id)).collect(),
            special_instructions: None,
        }
    }

    fn cart(order_type: OrderType, items: Vec<CartItemInput>) -> CartRequest {
        CartRequest {
            order_type,
            tip_amount: None,
            items,
        }
    }

    async fn set(pool: &SqlitePool, key: &str, value: serde_json::Value) {
        let upsert = SettingUpsert {
            value,
            description: None,
        };
        setting::upsert(pool, key, upsert).await.unwrap();
    }

    #[tokio::test]
    async fn test_prices_from_menu() {
        let f = fixture().await;
        let summary = price_cart(
            &f.pool,
            &cart(OrderType::Pickup, vec![line(f.pizza, 2, &[f.large])]),
        )
        .await
        .unwrap();

        assert_eq!(summary.items[0].unit_price, 9.99);
        assert_eq!(summary.items[0].line_total, 19.98);
        assert_eq!(summary.items[0].options[0].option_name, "Large");
        assert_eq!(summary.subtotal, 19.98);
        assert_eq!(summary.total, 19.98);
    }

    #[tokio::test]
    async fn test_tax_delivery_and_tip() {
        let f = fixture().await;
        set(&f.pool, "tax_rate_percent", json!(10)).await;
        set(&f.pool, "delivery_fee", json!(3.5)).await;

        let mut req = cart(OrderType::Delivery, vec![line(f.pizza, 1, &[f.large, f.pepperoni])]);
        req.tip_amount = Some(2.0);
        let summary = price_cart(&f.pool, &req).await.unwrap();
        // 8.99 + 1.00 + 1.50
        assert_eq!(summary.subtotal, 11.49);
        assert_eq!(summary.tax_amount, 1.15);
        assert_eq!(summary.delivery_fee, 3.5);
        assert_eq!(summary.tip_amount, 2.0);
        assert_eq!(summary.total, 18.14);
    }

    #[tokio::test]
    async fn test_invalid_selection_reports_line() {
        let f = fixture().await;
        let err = price_cart(&f.pool, &cart(OrderType::Pickup, vec![line(f.pizza, 1, &[])]))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CustomizationInvalid);
        assert_eq!(err.details.unwrap()["line"], 0);
    }

    #[tokio::test]
    async fn test_unavailable_and_missing_items() {
        let f = fixture().await;
        menu_item::set_availability(&f.pool, f.pizza, false).await.unwrap();
        let err = price_cart(&f.pool, &cart(OrderType::Pickup, vec![line(f.pizza, 1, &[f.large])]))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuItemUnavailable);

        let err = price_cart(&f.pool, &cart(OrderType::Pickup, vec![line(404, 1, &[])]))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuItemNotFound);
    }

    #[tokio::test]
    async fn test_shape_checks() {
        let f = fixture().await;
        let err = price_cart(&f.pool, &cart(OrderType::Pickup, vec![])).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderEmpty);

        let too_many = cart(OrderType::Pickup, vec![line(f.pizza, 100, &[f.large])]);
        let err = price_cart(&f.pool, &too_many).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let mut req = cart(OrderType::Pickup, vec![line(f.pizza, 1, &[f.large])]);
        req.tip_amount = Some(-1.0);
        assert!(price_cart(&f.pool, &req).await.is_err());
    }

    #[tokio::test]
    async fn test_oversized_tip_rejected() {
        let f = fixture().await;
        let mut req = cart(OrderType::Pickup, vec![line(f.pizza, 1, &[f.large])]);

        // Beyond Decimal's range: must not be priced as a zero tip
        req.tip_amount = Some(1e29);
        let err = price_cart(&f.pool, &req).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.message.contains("tip_amount"));

        req.tip_amount = Some(1e20);
        assert!(price_cart(&f.pool, &req).await.is_err());

        req.tip_amount = Some(5.0);
        assert_eq!(price_cart(&f.pool, &req).await.unwrap().tip_amount, 5.0);
    }
}
