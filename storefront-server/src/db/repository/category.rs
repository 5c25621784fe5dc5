//! Category Repository

use super::{RepoError, RepoResult, SlugTable, next_free_slug};
use shared::error::ErrorCode;
use shared::models::{Category, CategoryCreate, CategoryUpdate, SortOrderUpdate};
use sqlx::{SqliteConnection, SqlitePool};

const CATEGORY_SELECT: &str =
    "SELECT id, name, slug, description, sort_order, is_active, created_at, updated_at FROM category";

/// List categories ordered for display; storefront passes `include_inactive = false`
pub async fn find_all(pool: &SqlitePool, include_inactive: bool) -> RepoResult<Vec<Category>> {
    let sql = if include_inactive {
        format!("{CATEGORY_SELECT} ORDER BY sort_order, name")
    } else {
        format!("{CATEGORY_SELECT} WHERE is_active = 1 ORDER BY sort_order, name")
    };
    let rows = sqlx::query_as::<_, Category>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let sql = format!("{CATEGORY_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Category>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_name(conn: &mut SqliteConnection, name: &str) -> RepoResult<Option<Category>> {
    let sql = format!("{CATEGORY_SELECT} WHERE name = ? LIMIT 1");
    let row = sqlx::query_as::<_, Category>(&sql)
        .bind(name)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

/// Create a category; the slug is derived from the name when not given
pub async fn create(pool: &SqlitePool, data: CategoryCreate) -> RepoResult<Category> {
    let mut conn = pool.acquire().await?;
    let category = create_with(&mut conn, data).await?;
    Ok(category)
}

/// [`create`] on an existing connection or transaction
pub async fn create_with(
    conn: &mut SqliteConnection,
    data: CategoryCreate,
) -> RepoResult<Category> {
    if find_by_name(&mut *conn, &data.name).await?.is_some() {
        return Err(RepoError::Business(
            ErrorCode::CategoryNameExists,
            format!("Category '{}' already exists", data.name),
        ));
    }

    let slug = match data.slug {
        Some(slug) => slug,
        None => {
            let base = shared::util::slugify(&data.name);
            next_free_slug(&mut *conn, SlugTable::Category, &base, None).await?
        }
    };

    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO category (name, slug, description, sort_order, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6) RETURNING id",
    )
    .bind(&data.name)
    .bind(&slug)
    .bind(&data.description)
    .bind(data.sort_order.unwrap_or(0))
    .bind(data.is_active.unwrap_or(true))
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    let sql = format!("{CATEGORY_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Category>(&sql)
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(row)
}

pub async fn update(pool: &SqlitePool, id: i64, data: CategoryUpdate) -> RepoResult<Category> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| {
            RepoError::Business(ErrorCode::CategoryNotFound, format!("Category {id} not found"))
        })?;

    // Check duplicate name if changing
    if let Some(ref new_name) = data.name
        && new_name != &existing.name
    {
        let mut conn = pool.acquire().await?;
        if find_by_name(&mut conn, new_name).await?.is_some() {
            return Err(RepoError::Business(
                ErrorCode::CategoryNameExists,
                format!("Category '{new_name}' already exists"),
            ));
        }
    }

    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE category SET name = COALESCE(?1, name), slug = COALESCE(?2, slug), description = COALESCE(?3, description), sort_order = COALESCE(?4, sort_order), is_active = COALESCE(?5, is_active), updated_at = ?6 WHERE id = ?7",
    )
    .bind(&data.name)
    .bind(&data.slug)
    .bind(&data.description)
    .bind(data.sort_order)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))
}

/// Number of menu items (active or not) in a category
pub async fn count_items(pool: &SqlitePool, id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_item WHERE category_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Hard delete a category; rejected while any menu item references it
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let items = count_items(pool, id).await?;
    if items > 0 {
        return Err(RepoError::Business(
            ErrorCode::CategoryHasItems,
            format!("Category {id} still has {items} menu item(s)"),
        ));
    }
    let rows = sqlx::query("DELETE FROM category WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Apply a batch of sort-order changes atomically
pub async fn batch_update_sort_order(
    pool: &SqlitePool,
    updates: &[SortOrderUpdate],
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;
    for u in updates {
        let rows = sqlx::query("UPDATE category SET sort_order = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(u.sort_order)
            .bind(now)
            .bind(u.id)
            .execute(&mut *tx)
            .await?;
        if rows.rows_affected() == 0 {
            return Err(RepoError::Business(
                ErrorCode::CategoryNotFound,
                format!("Category {} not found", u.id),
            ));
        }
    }
    tx.commit().await?;
    Ok(())
}

/// Overwrite a category's slug (SEO maintenance)
pub async fn set_slug(conn: &mut SqliteConnection, id: i64, slug: &str) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("UPDATE category SET slug = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(slug)
        .bind(now)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}
