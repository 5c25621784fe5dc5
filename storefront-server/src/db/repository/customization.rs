//! Customization Group / Option Repository

use super::{RepoError, RepoResult};
use shared::error::ErrorCode;
use shared::models::{
    CustomizationGroup, CustomizationGroupCreate, CustomizationGroupUpdate,
    CustomizationGroupWithOptions, CustomizationOption, CustomizationOptionCreate,
    CustomizationOptionUpdate, SelectionType,
};
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;

const GROUP_SELECT: &str =
    "SELECT id, name, description, selection_type, is_required, min_selections, max_selections, sort_order, is_active, created_at, updated_at FROM customization_group";

const OPTION_SELECT: &str =
    "SELECT id, group_id, name, price_modifier, price_type, is_default, is_available, is_active, sort_order, created_at, updated_at FROM customization_option";

/// Check min/max consistency of a group definition
pub fn check_selection_bounds(
    selection_type: SelectionType,
    min: i32,
    max: Option<i32>,
) -> RepoResult<()> {
    if min < 0 {
        return Err(RepoError::Validation("min_selections must be >= 0".into()));
    }
    if let Some(max) = max {
        if max < 0 {
            return Err(RepoError::Validation("max_selections must be >= 0".into()));
        }
        if min > max {
            return Err(RepoError::Validation(format!(
                "min_selections ({min}) must not exceed max_selections ({max})"
            )));
        }
    }
    if selection_type == SelectionType::Single && min > 1 {
        return Err(RepoError::Validation(
            "SINGLE groups cannot require more than one selection".into(),
        ));
    }
    Ok(())
}

async fn options_for_groups(
    conn: &mut SqliteConnection,
    group_ids: &[i64],
) -> RepoResult<HashMap<i64, Vec<CustomizationOption>>> {
    let mut by_group: HashMap<i64, Vec<CustomizationOption>> = HashMap::new();
    if group_ids.is_empty() {
        return Ok(by_group);
    }
    let placeholders = vec!["?"; group_ids.len()].join(", ");
    let sql = format!("{OPTION_SELECT} WHERE group_id IN ({placeholders}) ORDER BY sort_order, id");
    let mut query = sqlx::query_as::<_, CustomizationOption>(&sql);
    for id in group_ids {
        query = query.bind(id);
    }
    for option in query.fetch_all(conn).await? {
        by_group.entry(option.group_id).or_default().push(option);
    }
    Ok(by_group)
}

async fn attach_options(
    conn: &mut SqliteConnection,
    groups: Vec<CustomizationGroup>,
) -> RepoResult<Vec<CustomizationGroupWithOptions>> {
    let ids: Vec<i64> = groups.iter().map(|g| g.id).collect();
    let mut options = options_for_groups(conn, &ids).await?;
    Ok(groups
        .into_iter()
        .map(|group| CustomizationGroupWithOptions {
            options: options.remove(&group.id).unwrap_or_default(),
            group,
        })
        .collect())
}

/// All groups with their options (admin list)
pub async fn find_all_groups(
    pool: &SqlitePool,
    include_inactive: bool,
) -> RepoResult<Vec<CustomizationGroupWithOptions>> {
    let mut conn = pool.acquire().await?;
    let sql = if include_inactive {
        format!("{GROUP_SELECT} ORDER BY sort_order, name, id")
    } else {
        format!("{GROUP_SELECT} WHERE is_active = 1 ORDER BY sort_order, name, id")
    };
    let groups = sqlx::query_as::<_, CustomizationGroup>(&sql)
        .fetch_all(&mut *conn)
        .await?;
    attach_options(&mut conn, groups).await
}

pub async fn find_group(
    pool: &SqlitePool,
    id: i64,
) -> RepoResult<Option<CustomizationGroupWithOptions>> {
    let mut conn = pool.acquire().await?;
    find_group_with(&mut conn, id).await
}

async fn find_group_with(
    conn: &mut SqliteConnection,
    id: i64,
) -> RepoResult<Option<CustomizationGroupWithOptions>> {
    let sql = format!("{GROUP_SELECT} WHERE id = ?");
    let Some(group) = sqlx::query_as::<_, CustomizationGroup>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
    else {
        return Ok(None);
    };
    Ok(attach_options(conn, vec![group]).await?.pop())
}

/// Groups attached to a menu item, in link order, with the link's
/// `is_required_override` folded into `is_required`.
///
/// Inactive groups and options are included; callers decide whether to hide
/// them (builder view) or reject them (selection validation).
pub async fn find_groups_for_item(
    pool: &SqlitePool,
    menu_item_id: i64,
) -> RepoResult<Vec<CustomizationGroupWithOptions>> {
    let mut conn = pool.acquire().await?;
    let rows = sqlx::query_as::<_, (i64, Option<bool>)>(
        "SELECT group_id, is_required_override FROM menu_item_customization WHERE menu_item_id = ? ORDER BY sort_order, group_id",
    )
    .bind(menu_item_id)
    .fetch_all(&mut *conn)
    .await?;

    let mut groups = Vec::with_capacity(rows.len());
    for (group_id, required_override) in rows {
        let sql = format!("{GROUP_SELECT} WHERE id = ?");
        if let Some(mut group) = sqlx::query_as::<_, CustomizationGroup>(&sql)
            .bind(group_id)
            .fetch_optional(&mut *conn)
            .await?
        {
            if let Some(required) = required_override {
                group.is_required = required;
            }
            groups.push(group);
        }
    }
    attach_options(&mut conn, groups).await
}

async fn insert_option(
    conn: &mut SqliteConnection,
    group_id: i64,
    data: &CustomizationOptionCreate,
    fallback_sort: i32,
) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO customization_option (group_id, name, price_modifier, price_type, is_default, is_available, is_active, sort_order, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?8, ?8) RETURNING id",
    )
    .bind(group_id)
    .bind(&data.name)
    .bind(data.price_modifier)
    .bind(data.price_type.unwrap_or_default())
    .bind(data.is_default.unwrap_or(false))
    .bind(data.is_available.unwrap_or(true))
    .bind(data.sort_order.unwrap_or(fallback_sort))
    .bind(now)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

/// Create a group together with its embedded options
pub async fn create_group(
    pool: &SqlitePool,
    data: CustomizationGroupCreate,
) -> RepoResult<CustomizationGroupWithOptions> {
    let mut tx = pool.begin().await?;
    let created = create_group_with(&mut tx, data).await?;
    tx.commit().await?;
    Ok(created)
}

/// [`create_group`] inside a caller-owned transaction
pub async fn create_group_with(
    conn: &mut SqliteConnection,
    data: CustomizationGroupCreate,
) -> RepoResult<CustomizationGroupWithOptions> {
    let selection_type = data.selection_type.unwrap_or_default();
    let min = data.min_selections.unwrap_or(0);
    check_selection_bounds(selection_type, min, data.max_selections)?;

    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO customization_group (name, description, selection_type, is_required, min_selections, max_selections, sort_order, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8, ?8) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(selection_type)
    .bind(data.is_required.unwrap_or(false))
    .bind(min)
    .bind(data.max_selections)
    .bind(data.sort_order.unwrap_or(0))
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    for (idx, option) in data.options.iter().enumerate() {
        insert_option(&mut *conn, id, option, idx as i32).await?;
    }

    find_group_with(conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create customization group".into()))
}

pub async fn update_group(
    pool: &SqlitePool,
    id: i64,
    data: CustomizationGroupUpdate,
) -> RepoResult<CustomizationGroupWithOptions> {
    let existing = find_group(pool, id).await?.ok_or_else(|| group_not_found(id))?.group;

    check_selection_bounds(
        data.selection_type.unwrap_or(existing.selection_type),
        data.min_selections.unwrap_or(existing.min_selections),
        data.max_selections.unwrap_or(existing.max_selections),
    )?;

    // Nullable columns: ?flag = 1 means the payload carried the field,
    // possibly as null
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE customization_group SET name = COALESCE(?1, name), description = CASE WHEN ?2 THEN ?3 ELSE description END, selection_type = COALESCE(?4, selection_type), is_required = COALESCE(?5, is_required), min_selections = COALESCE(?6, min_selections), max_selections = CASE WHEN ?7 THEN ?8 ELSE max_selections END, sort_order = COALESCE(?9, sort_order), is_active = COALESCE(?10, is_active), updated_at = ?11 WHERE id = ?12",
    )
    .bind(&data.name)
    .bind(data.description.is_some())
    .bind(data.description.flatten())
    .bind(data.selection_type)
    .bind(data.is_required)
    .bind(data.min_selections)
    .bind(data.max_selections.is_some())
    .bind(data.max_selections.flatten())
    .bind(data.sort_order)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    find_group(pool, id).await?.ok_or_else(|| group_not_found(id))
}

/// Number of menu items a group is attached to
pub async fn count_links(conn: &mut SqliteConnection, group_id: i64) -> RepoResult<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM menu_item_customization WHERE group_id = ?")
            .bind(group_id)
            .fetch_one(conn)
            .await?;
    Ok(count)
}

/// Delete a group and its options.
///
/// Rejected while linked to a menu item unless `force`, which removes the
/// links in the same transaction.
pub async fn delete_group(pool: &SqlitePool, id: i64, force: bool) -> RepoResult<bool> {
    let mut tx = pool.begin().await?;

    let links = count_links(&mut tx, id).await?;
    if links > 0 && !force {
        return Err(RepoError::Business(
            ErrorCode::CustomizationGroupInUse,
            format!("Customization group {id} is attached to {links} menu item(s)"),
        ));
    }

    sqlx::query("DELETE FROM menu_item_customization WHERE group_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let rows = sqlx::query("DELETE FROM customization_group WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(rows.rows_affected() > 0)
}

fn group_not_found(id: i64) -> RepoError {
    RepoError::Business(
        ErrorCode::CustomizationGroupNotFound,
        format!("Customization group {id} not found"),
    )
}

fn option_not_found(id: i64) -> RepoError {
    RepoError::Business(
        ErrorCode::CustomizationOptionNotFound,
        format!("Customization option {id} not found"),
    )
}

// ── Options ─────────────────────────────────────────────────────────

pub async fn find_option(pool: &SqlitePool, id: i64) -> RepoResult<Option<CustomizationOption>> {
    let sql = format!("{OPTION_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, CustomizationOption>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create_option(
    pool: &SqlitePool,
    group_id: i64,
    data: CustomizationOptionCreate,
) -> RepoResult<CustomizationOption> {
    let mut conn = pool.acquire().await?;
    let group: Option<i64> = sqlx::query_scalar("SELECT id FROM customization_group WHERE id = ?")
        .bind(group_id)
        .fetch_optional(&mut *conn)
        .await?;
    if group.is_none() {
        return Err(group_not_found(group_id));
    }
    let next_sort: i32 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM customization_option WHERE group_id = ?",
    )
    .bind(group_id)
    .fetch_one(&mut *conn)
    .await?;
    let id = insert_option(&mut conn, group_id, &data, next_sort).await?;
    drop(conn);

    find_option(pool, id).await?.ok_or_else(|| option_not_found(id))
}

pub async fn update_option(
    pool: &SqlitePool,
    id: i64,
    data: CustomizationOptionUpdate,
) -> RepoResult<CustomizationOption> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE customization_option SET name = COALESCE(?1, name), price_modifier = COALESCE(?2, price_modifier), price_type = COALESCE(?3, price_type), is_default = COALESCE(?4, is_default), is_available = COALESCE(?5, is_available), is_active = COALESCE(?6, is_active), sort_order = COALESCE(?7, sort_order), updated_at = ?8 WHERE id = ?9",
    )
    .bind(&data.name)
    .bind(data.price_modifier)
    .bind(data.price_type)
    .bind(data.is_default)
    .bind(data.is_available)
    .bind(data.is_active)
    .bind(data.sort_order)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(option_not_found(id));
    }
    find_option(pool, id).await?.ok_or_else(|| option_not_found(id))
}

pub async fn delete_option(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM customization_option WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Oldest group with this exact name
pub async fn find_group_by_name(
    conn: &mut SqliteConnection,
    name: &str,
) -> RepoResult<Option<CustomizationGroupWithOptions>> {
    let id: Option<i64> =
        sqlx::query_scalar("SELECT id FROM customization_group WHERE name = ? ORDER BY id LIMIT 1")
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?;
    match id {
        Some(id) => find_group_with(conn, id).await,
        None => Ok(None),
    }
}

/// Repoint every link from `from_group` to `to_group`, dropping links that
/// would duplicate an existing one, then delete `from_group`.
pub async fn merge_group_into(
    conn: &mut SqliteConnection,
    from_group: i64,
    to_group: i64,
) -> RepoResult<u64> {
    let moved = sqlx::query(
        "UPDATE OR IGNORE menu_item_customization SET group_id = ?1 WHERE group_id = ?2",
    )
    .bind(to_group)
    .bind(from_group)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    // Leftovers are links whose item already had `to_group`
    sqlx::query("DELETE FROM menu_item_customization WHERE group_id = ?")
        .bind(from_group)
        .execute(&mut *conn)
        .await?;
    sqlx::query("DELETE FROM customization_group WHERE id = ?")
        .bind(from_group)
        .execute(&mut *conn)
        .await?;
    Ok(moved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{category, menu_item, test_support};
    use shared::models::{CategoryCreate, CustomizationLinkInput, MenuItemCreate, PriceType};

    fn toppings() -> CustomizationGroupCreate {
        CustomizationGroupCreate {
            name: "Toppings".into(),
            selection_type: Some(SelectionType::Multiple),
            max_selections: Some(3),
            options: vec![
                CustomizationOptionCreate {
                    name: "Pepperoni".into(),
                    price_modifier: 1.5,
                    ..Default::default()
                },
                CustomizationOptionCreate {
                    name: "Extra Cheese".into(),
                    price_modifier: 0.75,
                    price_type: Some(PriceType::PerUnit),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    async fn linked_item(pool: &SqlitePool, group_id: i64, required_override: Option<bool>) -> i64 {
        let cat = category::create(
            pool,
            CategoryCreate {
                name: "Pizzas".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let item = menu_item::create(
            pool,
            MenuItemCreate {
                category_id: cat.id,
                name: "Build Your Own".into(),
                base_price: 10.0,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        menu_item::replace_links(
            pool,
            item.id,
            &[CustomizationLinkInput {
                group_id,
                sort_order: None,
                is_required_override: required_override,
            }],
        )
        .await
        .unwrap();
        item.id
    }

    #[test]
    fn test_selection_bounds() {
        assert!(check_selection_bounds(SelectionType::Multiple, 1, Some(3)).is_ok());
        assert!(check_selection_bounds(SelectionType::Multiple, 0, None).is_ok());
        assert!(check_selection_bounds(SelectionType::Multiple, 4, Some(3)).is_err());
        assert!(check_selection_bounds(SelectionType::Single, 2, None).is_err());
        assert!(check_selection_bounds(SelectionType::Multiple, -1, None).is_err());
    }

    #[tokio::test]
    async fn test_create_group_with_options() {
        let pool = test_support::pool().await;
        let created = create_group(&pool, toppings()).await.unwrap();
        assert_eq!(created.group.selection_type, SelectionType::Multiple);
        assert_eq!(created.group.max_selections, Some(3));
        assert_eq!(created.options.len(), 2);
        assert_eq!(created.options[0].name, "Pepperoni");
        assert_eq!(created.options[1].price_type, PriceType::PerUnit);
        assert_eq!(created.options[1].sort_order, 1);
    }

    #[tokio::test]
    async fn test_update_rejects_min_above_max() {
        let pool = test_support::pool().await;
        let created = create_group(&pool, toppings()).await.unwrap();
        let err = update_group(
            &pool,
            created.group.id,
            CustomizationGroupUpdate {
                min_selections: Some(5),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_can_clear_max_and_description() {
        let pool = test_support::pool().await;
        let created = create_group(&pool, toppings()).await.unwrap();
        let id = created.group.id;
        update_group(
            &pool,
            id,
            CustomizationGroupUpdate {
                description: Some(Some("Pick up to three".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        // Absent fields are kept
        let kept = update_group(
            &pool,
            id,
            CustomizationGroupUpdate {
                sort_order: Some(4),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(kept.group.max_selections, Some(3));
        assert_eq!(kept.group.description.as_deref(), Some("Pick up to three"));

        let cleared = update_group(
            &pool,
            id,
            CustomizationGroupUpdate {
                description: Some(None),
                max_selections: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(cleared.group.max_selections, None);
        assert_eq!(cleared.group.description, None);
        assert_eq!(cleared.group.sort_order, 4);
    }

    #[tokio::test]
    async fn test_override_applied_for_item() {
        let pool = test_support::pool().await;
        let created = create_group(&pool, toppings()).await.unwrap();
        assert!(!created.group.is_required);
        let item_id = linked_item(&pool, created.group.id, Some(true)).await;

        let groups = find_groups_for_item(&pool, item_id).await.unwrap();
        assert_eq!(groups.len(), 1);
        assert!(groups[0].group.is_required);
        assert_eq!(groups[0].options.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_linked_group_requires_force() {
        let pool = test_support::pool().await;
        let created = create_group(&pool, toppings()).await.unwrap();
        let item_id = linked_item(&pool, created.group.id, None).await;

        let err = delete_group(&pool, created.group.id, false).await.unwrap_err();
        assert!(matches!(err, RepoError::Business(ErrorCode::CustomizationGroupInUse, _)));
        let mut conn = pool.acquire().await.unwrap();
        assert_eq!(count_links(&mut conn, created.group.id).await.unwrap(), 1);
        drop(conn);

        assert!(delete_group(&pool, created.group.id, true).await.unwrap());
        assert!(find_groups_for_item(&pool, item_id).await.unwrap().is_empty());
        assert!(find_group(&pool, created.group.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_option_crud() {
        let pool = test_support::pool().await;
        let created = create_group(&pool, toppings()).await.unwrap();
        let option = create_option(
            &pool,
            created.group.id,
            CustomizationOptionCreate {
                name: "Olives".into(),
                price_modifier: 0.5,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(option.sort_order, 2);

        let option = update_option(
            &pool,
            option.id,
            CustomizationOptionUpdate {
                is_available: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(!option.is_selectable());

        assert!(delete_option(&pool, option.id).await.unwrap());
        assert!(find_option(&pool, option.id).await.unwrap().is_none());
        assert!(create_option(&pool, 999, CustomizationOptionCreate::default()).await.is_err());
    }
}
