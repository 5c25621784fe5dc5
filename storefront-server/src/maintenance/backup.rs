//! Database dump and restore
//!
//! A backup is one JSON document holding every table, tagged with
//! [`BACKUP_VERSION`]. Restore writes rows with their original ids so order
//! snapshots and links stay intact.

use serde::{Deserialize, Serialize};
use shared::models::{
    Category, CustomizationGroup, CustomizationOption, MenuItem, MenuItemCustomization, Order,
    OrderItem, OrderItemOption, SettingRow, SystemState,
};
use sqlx::{SqliteConnection, SqlitePool};
use std::path::Path;

use crate::db::repository::{RepoError, RepoResult};

pub const BACKUP_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    pub version: u32,
    /// Unix millis at dump time
    pub created_at: i64,
    pub categories: Vec<Category>,
    pub menu_items: Vec<MenuItem>,
    pub customization_groups: Vec<CustomizationGroup>,
    pub customization_options: Vec<CustomizationOption>,
    pub menu_item_customizations: Vec<MenuItemCustomization>,
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderItem>,
    pub order_item_options: Vec<OrderItemOption>,
    pub settings: Vec<SettingRow>,
    pub system_state: Option<SystemState>,
}

/// Row counts written by a restore
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RestoreReport {
    pub categories: usize,
    pub menu_items: usize,
    pub customization_groups: usize,
    pub customization_options: usize,
    pub links: usize,
    pub orders: usize,
    pub settings: usize,
}

// Children before parents
const CLEAR_ORDER: &[&str] = &[
    "order_item_option",
    "order_item",
    "orders",
    "menu_item_customization",
    "customization_option",
    "customization_group",
    "menu_item",
    "category",
    "setting",
    "system_state",
];

async fn fetch_table<T>(
    conn: &mut SqliteConnection,
    table: &str,
    order_by: &str,
) -> RepoResult<Vec<T>>
where
    T: for<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow> + Send + Unpin,
{
    let sql = format!("SELECT * FROM {table} ORDER BY {order_by}");
    Ok(sqlx::query_as::<_, T>(&sql).fetch_all(conn).await?)
}

/// Read every table into a [`Backup`]
///
/// All reads share one transaction, so a checkout committed mid-dump is
/// either fully in the backup or not at all.
pub async fn dump(pool: &SqlitePool) -> RepoResult<Backup> {
    let mut tx = pool.begin().await?;
    let backup = Backup {
        version: BACKUP_VERSION,
        created_at: shared::util::now_millis(),
        categories: fetch_table(&mut tx, "category", "id").await?,
        menu_items: fetch_table(&mut tx, "menu_item", "id").await?,
        customization_groups: fetch_table(&mut tx, "customization_group", "id").await?,
        customization_options: fetch_table(&mut tx, "customization_option", "id").await?,
        menu_item_customizations: fetch_table(
            &mut tx,
            "menu_item_customization",
            "menu_item_id, group_id",
        )
        .await?,
        orders: fetch_table(&mut tx, "orders", "id").await?,
        order_items: fetch_table(&mut tx, "order_item", "id").await?,
        order_item_options: fetch_table(&mut tx, "order_item_option", "id").await?,
        settings: fetch_table(&mut tx, "setting", "key").await?,
        system_state: fetch_table(&mut tx, "system_state", "id").await?.pop(),
    };
    tx.commit().await?;

    tracing::info!(
        categories = backup.categories.len(),
        items = backup.menu_items.len(),
        orders = backup.orders.len(),
        "Database dumped"
    );
    Ok(backup)
}

pub fn write_backup(backup: &Backup, path: &Path) -> RepoResult<()> {
    let text = serde_json::to_string_pretty(backup)
        .map_err(|e| RepoError::Database(format!("Failed to encode backup: {e}")))?;
    std::fs::write(path, text)
        .map_err(|e| RepoError::Database(format!("Failed to write {}: {e}", path.display())))
}

pub fn read_backup(path: &Path) -> RepoResult<Backup> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| RepoError::Validation(format!("Failed to read {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| RepoError::Validation(format!("Invalid backup document: {e}")))
}

async fn menu_row_count(conn: &mut SqliteConnection) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT (SELECT COUNT(*) FROM category) + (SELECT COUNT(*) FROM menu_item) + (SELECT COUNT(*) FROM customization_group) + (SELECT COUNT(*) FROM orders)",
    )
    .fetch_one(conn)
    .await?;
    Ok(count)
}

/// Load `backup` in one transaction.
///
/// Refuses a database that already holds menu or order rows unless `force`,
/// which clears every table first.
pub async fn restore(
    pool: &SqlitePool,
    backup: &Backup,
    force: bool,
) -> RepoResult<RestoreReport> {
    if backup.version != BACKUP_VERSION {
        return Err(RepoError::Validation(format!(
            "Unsupported backup version {} (expected {BACKUP_VERSION})",
            backup.version
        )));
    }

    let mut tx = pool.begin().await?;

    if menu_row_count(&mut tx).await? > 0 {
        if !force {
            return Err(RepoError::Validation(
                "Database is not empty; use force to overwrite it".into(),
            ));
        }
        for table in CLEAR_ORDER {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await?;
        }
    } else {
        // Settings and counters may exist without any menu
        for table in ["setting", "system_state"] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await?;
        }
    }

    for c in &backup.categories {
        sqlx::query(
            "INSERT INTO category (id, name, slug, description, sort_order, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(c.id)
        .bind(&c.name)
        .bind(&c.slug)
        .bind(&c.description)
        .bind(c.sort_order)
        .bind(c.is_active)
        .bind(c.created_at)
        .bind(c.updated_at)
        .execute(&mut *tx)
        .await?;
    }
    for i in &backup.menu_items {
        sqlx::query(
            "INSERT INTO menu_item (id, category_id, name, slug, description, base_price, image_url, item_type, sort_order, is_available, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(i.id)
        .bind(i.category_id)
        .bind(&i.name)
        .bind(&i.slug)
        .bind(&i.description)
        .bind(i.base_price)
        .bind(&i.image_url)
        .bind(i.item_type)
        .bind(i.sort_order)
        .bind(i.is_available)
        .bind(i.is_active)
        .bind(i.created_at)
        .bind(i.updated_at)
        .execute(&mut *tx)
        .await?;
    }
    for g in &backup.customization_groups {
        sqlx::query(
            "INSERT INTO customization_group (id, name, description, selection_type, is_required, min_selections, max_selections, sort_order, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(g.id)
        .bind(&g.name)
        .bind(&g.description)
        .bind(g.selection_type)
        .bind(g.is_required)
        .bind(g.min_selections)
        .bind(g.max_selections)
        .bind(g.sort_order)
        .bind(g.is_active)
        .bind(g.created_at)
        .bind(g.updated_at)
        .execute(&mut *tx)
        .await?;
    }
    for o in &backup.customization_options {
        sqlx::query(
            "INSERT INTO customization_option (id, group_id, name, price_modifier, price_type, is_default, is_available, is_active, sort_order, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(o.id)
        .bind(o.group_id)
        .bind(&o.name)
        .bind(o.price_modifier)
        .bind(o.price_type)
        .bind(o.is_default)
        .bind(o.is_available)
        .bind(o.is_active)
        .bind(o.sort_order)
        .bind(o.created_at)
        .bind(o.updated_at)
        .execute(&mut *tx)
        .await?;
    }
    for l in &backup.menu_item_customizations {
        sqlx::query(
            "INSERT INTO menu_item_customization (menu_item_id, group_id, sort_order, is_required_override) VALUES (?, ?, ?, ?)",
        )
        .bind(l.menu_item_id)
        .bind(l.group_id)
        .bind(l.sort_order)
        .bind(l.is_required_override)
        .execute(&mut *tx)
        .await?;
    }
    for o in &backup.orders {
        sqlx::query(
            "INSERT INTO orders (id, order_number, status, order_type, customer_name, customer_email, customer_phone, delivery_address, notes, subtotal, tax_amount, delivery_fee, tip_amount, total, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(o.id)
        .bind(o.order_number)
        .bind(o.status)
        .bind(o.order_type)
        .bind(&o.customer_name)
        .bind(&o.customer_email)
        .bind(&o.customer_phone)
        .bind(&o.delivery_address)
        .bind(&o.notes)
        .bind(o.subtotal)
        .bind(o.tax_amount)
        .bind(o.delivery_fee)
        .bind(o.tip_amount)
        .bind(o.total)
        .bind(o.created_at)
        .bind(o.updated_at)
        .execute(&mut *tx)
        .await?;
    }
    for i in &backup.order_items {
        sqlx::query(
            "INSERT INTO order_item (id, order_id, menu_item_id, item_name, quantity, unit_price, line_total, special_instructions) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(i.id)
        .bind(i.order_id)
        .bind(i.menu_item_id)
        .bind(&i.item_name)
        .bind(i.quantity)
        .bind(i.unit_price)
        .bind(i.line_total)
        .bind(&i.special_instructions)
        .execute(&mut *tx)
        .await?;
    }
    for o in &backup.order_item_options {
        sqlx::query(
            "INSERT INTO order_item_option (id, order_item_id, option_id, group_name, option_name, quantity, price) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(o.id)
        .bind(o.order_item_id)
        .bind(o.option_id)
        .bind(&o.group_name)
        .bind(&o.option_name)
        .bind(o.quantity)
        .bind(o.price)
        .execute(&mut *tx)
        .await?;
    }
    for s in &backup.settings {
        sqlx::query(
            "INSERT INTO setting (key, value, description, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&s.key)
        .bind(&s.value)
        .bind(&s.description)
        .bind(s.updated_at)
        .execute(&mut *tx)
        .await?;
    }
    if let Some(state) = &backup.system_state {
        sqlx::query(
            "INSERT INTO system_state (id, last_order_number, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(state.id)
        .bind(state.last_order_number)
        .bind(state.created_at)
        .bind(state.updated_at)
        .execute(&mut *tx)
        .await?;
    }

    // Never hand out a number that a restored order already uses
    let highest: Option<i64> = backup.orders.iter().map(|o| o.order_number).max();
    if let Some(highest) = highest {
        crate::db::repository::system_state::bump_order_number_floor(&mut tx, highest).await?;
    }

    tx.commit().await?;

    let report = RestoreReport {
        categories: backup.categories.len(),
        menu_items: backup.menu_items.len(),
        customization_groups: backup.customization_groups.len(),
        customization_options: backup.customization_options.len(),
        links: backup.menu_item_customizations.len(),
        orders: backup.orders.len(),
        settings: backup.settings.len(),
    };
    tracing::info!(?report, "Backup restored");
    Ok(report)
}
