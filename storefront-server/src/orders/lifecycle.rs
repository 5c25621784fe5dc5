//! Order lifecycle (admin)
//!
//! `PENDING → CONFIRMED → PREPARING → READY → COMPLETED`, plus `CANCELLED`
//! from any non-terminal status.

use crate::db::repository::order;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Order, OrderStatus};
use sqlx::SqlitePool;

fn order_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
}

/// Move an order to `to`, rejecting transitions the lifecycle does not allow
pub async fn transition_status(pool: &SqlitePool, id: i64, to: OrderStatus) -> AppResult<Order> {
    let current = order::find_by_id(pool, id).await?.ok_or_else(|| order_not_found(id))?;

    if current.status == to {
        return Ok(current);
    }
    if !current.status.can_transition_to(to) {
        let code = if current.status.is_terminal() {
            ErrorCode::OrderAlreadyCompleted
        } else {
            ErrorCode::OrderInvalidTransition
        };
        return Err(AppError::with_message(
            code,
            format!("Order {} cannot move from {} to {}", current.order_number, current.status, to),
        )
        .with_detail("from", current.status.as_str())
        .with_detail("to", to.as_str()));
    }

    // Lost a race with another update: report against the fresh status
    if !order::update_status(pool, id, current.status, to).await? {
        let fresh = order::find_by_id(pool, id).await?.ok_or_else(|| order_not_found(id))?;
        return Err(AppError::with_message(
            ErrorCode::OrderInvalidTransition,
            format!("Order {} is now {}", fresh.order_number, fresh.status),
        ));
    }

    tracing::info!(order_id = id, from = %current.status, to = %to, "Order status changed");
    order::find_by_id(pool, id).await?.ok_or_else(|| order_not_found(id))
}

pub async fn update_notes(pool: &SqlitePool, id: i64, notes: Option<String>) -> AppResult<Order> {
    let notes = notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
    crate::utils::validation::validate_optional_text(
        &notes,
        "notes",
        crate::utils::validation::MAX_NOTE_LEN,
    )?;
    if order::find_by_id(pool, id).await?.is_none() {
        return Err(order_not_found(id));
    }
    Ok(order::update_notes(pool, id, notes.as_deref()).await?)
}

/// Delete a COMPLETED or CANCELLED order
pub async fn delete_order(pool: &SqlitePool, id: i64) -> AppResult<()> {
    let current = order::find_by_id(pool, id).await?.ok_or_else(|| order_not_found(id))?;
    if !current.status.is_terminal() {
        return Err(AppError::with_message(
            ErrorCode::OrderNotDeletable,
            format!(
                "Order {} is {}; only completed or cancelled orders can be deleted",
                current.order_number, current.status
            ),
        ));
    }
    order::delete(pool, id).await?;
    tracing::info!(order_id = id, order_number = current.order_number, "Order deleted");
    Ok(())
}
