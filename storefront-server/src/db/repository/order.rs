//! Order Repository
//!
//! Orders are written once by checkout (inside its transaction) and then only
//! change status or notes.

use super::{RepoError, RepoResult};
use shared::models::{
    CartSummary, CheckoutCustomer, Order, OrderDetail, OrderItem, OrderItemDetail, OrderItemOption,
    OrderListQuery, OrderStatus,
};
use sqlx::{SqliteConnection, SqlitePool};

const ORDER_SELECT: &str =
    "SELECT id, order_number, status, order_type, customer_name, customer_email, customer_phone, delivery_address, notes, subtotal, tax_amount, delivery_fee, tip_amount, total, created_at, updated_at FROM orders";

const ITEM_SELECT: &str =
    "SELECT id, order_id, menu_item_id, item_name, quantity, unit_price, line_total, special_instructions FROM order_item";

const ITEM_OPTION_SELECT: &str =
    "SELECT id, order_item_id, option_id, group_name, option_name, quantity, price FROM order_item_option";

pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const MAX_LIST_LIMIT: i64 = 200;

/// Insert an order with its lines and option snapshots; returns the new id.
///
/// The caller owns the transaction and has already allocated `order_number`.
pub async fn insert(
    conn: &mut SqliteConnection,
    order_number: i64,
    customer: &CheckoutCustomer,
    summary: &CartSummary,
) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let order_id: i64 = sqlx::query_scalar(
        "INSERT INTO orders (order_number, status, order_type, customer_name, customer_email, customer_phone, delivery_address, notes, subtotal, tax_amount, delivery_fee, tip_amount, total, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?14) RETURNING id",
    )
    .bind(order_number)
    .bind(OrderStatus::Pending)
    .bind(summary.order_type)
    .bind(&customer.customer_name)
    .bind(&customer.customer_email)
    .bind(&customer.customer_phone)
    .bind(&customer.delivery_address)
    .bind(&customer.notes)
    .bind(summary.subtotal)
    .bind(summary.tax_amount)
    .bind(summary.delivery_fee)
    .bind(summary.tip_amount)
    .bind(summary.total)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    for line in &summary.items {
        let item_id: i64 = sqlx::query_scalar(
            "INSERT INTO order_item (order_id, menu_item_id, item_name, quantity, unit_price, line_total, special_instructions) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) RETURNING id",
        )
        .bind(order_id)
        .bind(line.menu_item_id)
        .bind(&line.item_name)
        .bind(line.quantity)
        .bind(line.unit_price)
        .bind(line.line_total)
        .bind(&line.special_instructions)
        .fetch_one(&mut *conn)
        .await?;

        for option in &line.options {
            sqlx::query(
                "INSERT INTO order_item_option (order_item_id, option_id, group_name, option_name, quantity, price) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(item_id)
            .bind(option.option_id)
            .bind(&option.group_name)
            .bind(&option.option_name)
            .bind(option.quantity)
            .bind(option.price)
            .execute(&mut *conn)
            .await?;
        }
    }

    Ok(order_id)
}

/// Newest first, optionally filtered by status
pub async fn find_all(pool: &SqlitePool, query: &OrderListQuery) -> RepoResult<Vec<Order>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);
    let offset = query.offset.unwrap_or(0).max(0);

    let rows = match query.status {
        Some(status) => {
            let sql = format!(
                "{ORDER_SELECT} WHERE status = ? ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
            );
            sqlx::query_as::<_, Order>(&sql)
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!("{ORDER_SELECT} ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?");
            sqlx::query_as::<_, Order>(&sql)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
        }
    };
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Order with its items and their option snapshots
pub async fn find_detail(pool: &SqlitePool, id: i64) -> RepoResult<Option<OrderDetail>> {
    let mut conn = pool.acquire().await?;
    find_detail_with(&mut conn, id).await
}

pub async fn find_detail_with(
    conn: &mut SqliteConnection,
    id: i64,
) -> RepoResult<Option<OrderDetail>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let Some(order) = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
    else {
        return Ok(None);
    };

    let sql = format!("{ITEM_SELECT} WHERE order_id = ? ORDER BY id");
    let items = sqlx::query_as::<_, OrderItem>(&sql)
        .bind(id)
        .fetch_all(&mut *conn)
        .await?;

    let sql = format!(
        "{ITEM_OPTION_SELECT} WHERE order_item_id IN (SELECT id FROM order_item WHERE order_id = ?) ORDER BY id"
    );
    let mut options = sqlx::query_as::<_, OrderItemOption>(&sql)
        .bind(id)
        .fetch_all(&mut *conn)
        .await?;

    let items = items
        .into_iter()
        .map(|item| {
            let (mine, rest): (Vec<_>, Vec<_>) =
                options.drain(..).partition(|o| o.order_item_id == item.id);
            options = rest;
            OrderItemDetail {
                item,
                options: mine,
            }
        })
        .collect();

    Ok(Some(OrderDetail { order, items }))
}

/// Compare-and-set status change; `false` when the order moved on meanwhile
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    from: OrderStatus,
    to: OrderStatus,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4",
    )
    .bind(to)
    .bind(now)
    .bind(id)
    .bind(from)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn update_notes(pool: &SqlitePool, id: i64, notes: Option<&str>) -> RepoResult<Order> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE orders SET notes = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(notes)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

/// Delete an order; items and option snapshots cascade
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
