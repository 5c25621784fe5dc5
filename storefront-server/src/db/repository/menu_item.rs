//! Menu Item Repository
//!
//! Items plus their customization links (`menu_item_customization`).

use super::{RepoError, RepoResult, SlugTable, next_free_slug};
use shared::error::ErrorCode;
use shared::models::{
    CustomizationLinkInput, MenuItem, MenuItemCreate, MenuItemCustomization, MenuItemUpdate,
};
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashSet;

const ITEM_SELECT: &str =
    "SELECT id, category_id, name, slug, description, base_price, image_url, item_type, sort_order, is_available, is_active, created_at, updated_at FROM menu_item";

/// List items, optionally for one category; inactive items only when asked
pub async fn find_all(
    pool: &SqlitePool,
    category_id: Option<i64>,
    include_inactive: bool,
) -> RepoResult<Vec<MenuItem>> {
    let sql = format!(
        "{ITEM_SELECT} WHERE (?1 IS NULL OR category_id = ?1) AND (?2 = 1 OR is_active = 1) ORDER BY sort_order, name"
    );
    let rows = sqlx::query_as::<_, MenuItem>(&sql)
        .bind(category_id)
        .bind(include_inactive)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuItem>> {
    let sql = format!("{ITEM_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, MenuItem>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> RepoResult<Option<MenuItem>> {
    let sql = format!("{ITEM_SELECT} WHERE slug = ?");
    let row = sqlx::query_as::<_, MenuItem>(&sql)
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_ids(pool: &SqlitePool, ids: &[i64]) -> RepoResult<Vec<MenuItem>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("{ITEM_SELECT} WHERE id IN ({placeholders})");
    let mut query = sqlx::query_as::<_, MenuItem>(&sql);
    for id in ids {
        query = query.bind(id);
    }
    Ok(query.fetch_all(pool).await?)
}

async fn category_exists(conn: &mut SqliteConnection, category_id: i64) -> RepoResult<()> {
    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM category WHERE id = ?")
        .bind(category_id)
        .fetch_optional(conn)
        .await?;
    match exists {
        Some(_) => Ok(()),
        None => Err(RepoError::Business(
            ErrorCode::CategoryNotFound,
            format!("Category {category_id} not found"),
        )),
    }
}

fn slug_conflict(err: RepoError, slug: &str) -> RepoError {
    match err {
        RepoError::Duplicate(_) => RepoError::Business(
            ErrorCode::MenuItemSlugExists,
            format!("Menu item slug '{slug}' already exists"),
        ),
        other => other,
    }
}

pub async fn create(pool: &SqlitePool, data: MenuItemCreate) -> RepoResult<MenuItem> {
    let mut conn = pool.acquire().await?;
    create_with(&mut conn, data).await
}

/// [`create`] on an existing connection or transaction
pub async fn create_with(
    conn: &mut SqliteConnection,
    data: MenuItemCreate,
) -> RepoResult<MenuItem> {
    category_exists(&mut *conn, data.category_id).await?;

    let slug = match data.slug {
        Some(slug) => slug,
        None => {
            let base = shared::util::slugify(&data.name);
            next_free_slug(&mut *conn, SlugTable::MenuItem, &base, None).await?
        }
    };

    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO menu_item (category_id, name, slug, description, base_price, image_url, item_type, sort_order, is_available, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11) RETURNING id",
    )
    .bind(data.category_id)
    .bind(&data.name)
    .bind(&slug)
    .bind(&data.description)
    .bind(data.base_price)
    .bind(&data.image_url)
    .bind(data.item_type.unwrap_or_default())
    .bind(data.sort_order.unwrap_or(0))
    .bind(data.is_available.unwrap_or(true))
    .bind(data.is_active.unwrap_or(true))
    .bind(now)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| slug_conflict(e.into(), &slug))?;

    let sql = format!("{ITEM_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, MenuItem>(&sql)
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(row)
}

pub async fn update(pool: &SqlitePool, id: i64, data: MenuItemUpdate) -> RepoResult<MenuItem> {
    let mut conn = pool.acquire().await?;
    if let Some(category_id) = data.category_id {
        category_exists(&mut conn, category_id).await?;
    }

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE menu_item SET category_id = COALESCE(?1, category_id), name = COALESCE(?2, name), slug = COALESCE(?3, slug), description = COALESCE(?4, description), base_price = COALESCE(?5, base_price), image_url = COALESCE(?6, image_url), item_type = COALESCE(?7, item_type), sort_order = COALESCE(?8, sort_order), is_available = COALESCE(?9, is_available), is_active = COALESCE(?10, is_active), updated_at = ?11 WHERE id = ?12",
    )
    .bind(data.category_id)
    .bind(&data.name)
    .bind(&data.slug)
    .bind(&data.description)
    .bind(data.base_price)
    .bind(&data.image_url)
    .bind(data.item_type)
    .bind(data.sort_order)
    .bind(data.is_available)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await
    .map_err(|e| slug_conflict(e.into(), data.slug.as_deref().unwrap_or_default()))?;
    drop(conn);

    if rows.rows_affected() == 0 {
        return Err(not_found(id));
    }
    find_by_id(pool, id).await?.ok_or_else(|| not_found(id))
}

/// Toggle the sold-out flag
pub async fn set_availability(
    pool: &SqlitePool,
    id: i64,
    is_available: bool,
) -> RepoResult<MenuItem> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE menu_item SET is_available = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(is_available)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(id));
    }
    find_by_id(pool, id).await?.ok_or_else(|| not_found(id))
}

/// Hard delete; links cascade and order lines keep their snapshots
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM menu_item WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Overwrite an item's slug (SEO maintenance)
pub async fn set_slug(conn: &mut SqliteConnection, id: i64, slug: &str) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("UPDATE menu_item SET slug = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(slug)
        .bind(now)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

fn not_found(id: i64) -> RepoError {
    RepoError::Business(ErrorCode::MenuItemNotFound, format!("Menu item {id} not found"))
}

// ── Customization links ─────────────────────────────────────────────

pub async fn find_links(
    pool: &SqlitePool,
    menu_item_id: i64,
) -> RepoResult<Vec<MenuItemCustomization>> {
    let rows = sqlx::query_as::<_, MenuItemCustomization>(
        "SELECT menu_item_id, group_id, sort_order, is_required_override FROM menu_item_customization WHERE menu_item_id = ? ORDER BY sort_order, group_id",
    )
    .bind(menu_item_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Attach a group to an item (no-op if already linked)
pub async fn add_link(
    conn: &mut SqliteConnection,
    menu_item_id: i64,
    link: &CustomizationLinkInput,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO menu_item_customization (menu_item_id, group_id, sort_order, is_required_override) VALUES (?1, ?2, ?3, ?4) ON CONFLICT(menu_item_id, group_id) DO NOTHING",
    )
    .bind(menu_item_id)
    .bind(link.group_id)
    .bind(link.sort_order.unwrap_or(0))
    .bind(link.is_required_override)
    .execute(conn)
    .await?;
    Ok(())
}

/// Replace all customization links of an item in one transaction
///
/// When `sort_order` is omitted the position in `links` is used.
pub async fn replace_links(
    pool: &SqlitePool,
    menu_item_id: i64,
    links: &[CustomizationLinkInput],
) -> RepoResult<Vec<MenuItemCustomization>> {
    let mut seen = HashSet::new();
    if let Some(dup) = links.iter().find(|l| !seen.insert(l.group_id)) {
        return Err(RepoError::Validation(format!(
            "Customization group {} listed more than once",
            dup.group_id
        )));
    }

    let mut tx = pool.begin().await?;

    let item: Option<i64> = sqlx::query_scalar("SELECT id FROM menu_item WHERE id = ?")
        .bind(menu_item_id)
        .fetch_optional(&mut *tx)
        .await?;
    if item.is_none() {
        return Err(not_found(menu_item_id));
    }

    sqlx::query("DELETE FROM menu_item_customization WHERE menu_item_id = ?")
        .bind(menu_item_id)
        .execute(&mut *tx)
        .await?;

    for (idx, link) in links.iter().enumerate() {
        let group: Option<i64> =
            sqlx::query_scalar("SELECT id FROM customization_group WHERE id = ?")
                .bind(link.group_id)
                .fetch_optional(&mut *tx)
                .await?;
        if group.is_none() {
            return Err(RepoError::Business(
                ErrorCode::CustomizationGroupNotFound,
                format!("Customization group {} not found", link.group_id),
            ));
        }
        let link = CustomizationLinkInput {
            sort_order: Some(link.sort_order.unwrap_or(idx as i32)),
            ..link.clone()
        };
        add_link(&mut *tx, menu_item_id, &link).await?;
    }

    tx.commit().await?;
    find_links(pool, menu_item_id).await
}
