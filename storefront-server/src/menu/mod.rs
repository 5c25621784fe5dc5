//! Storefront catalog views
//!
//! Assembles the customer-facing menu and the pizza-builder view of an item
//! from the repositories. Admin callers get the unfiltered data.

use shared::models::{CustomizationGroupWithOptions, MenuItem, MenuItemDetail, MenuSection};
use sqlx::SqlitePool;

use crate::db::repository::{RepoResult, category, customization, menu_item};

/// Who is looking at the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogView {
    /// Inactive records hidden
    Storefront,
    /// Everything, inactive records included
    Admin,
}

impl CatalogView {
    pub fn for_admin(is_admin: bool) -> Self {
        if is_admin { Self::Admin } else { Self::Storefront }
    }

    pub fn include_inactive(self) -> bool {
        self == Self::Admin
    }
}

/// Active categories with their active items, in sort order.
///
/// Categories without any active item are left out.
pub async fn load_menu(pool: &SqlitePool) -> RepoResult<Vec<MenuSection>> {
    let categories = category::find_all(pool, false).await?;
    let items = menu_item::find_all(pool, None, false).await?;

    let sections = categories
        .into_iter()
        .map(|category| {
            let items: Vec<MenuItem> = items
                .iter()
                .filter(|i| i.category_id == category.id)
                .cloned()
                .collect();
            MenuSection { category, items }
        })
        .filter(|s| !s.items.is_empty())
        .collect();
    Ok(sections)
}

/// Look an item up by numeric id, falling back to its slug
pub async fn find_item(pool: &SqlitePool, id_or_slug: &str) -> RepoResult<Option<MenuItem>> {
    if let Ok(id) = id_or_slug.parse::<i64>()
        && let Some(item) = menu_item::find_by_id(pool, id).await?
    {
        return Ok(Some(item));
    }
    menu_item::find_by_slug(pool, id_or_slug).await
}

/// Item plus its attached groups and options.
///
/// The storefront view drops inactive groups and inactive options; options
/// that are merely sold out stay listed with `is_available = false`.
pub async fn item_detail(
    pool: &SqlitePool,
    item: MenuItem,
    view: CatalogView,
) -> RepoResult<MenuItemDetail> {
    let groups = customization::find_groups_for_item(pool, item.id).await?;
    let customization_groups = match view {
        CatalogView::Admin => groups,
        CatalogView::Storefront => storefront_groups(groups),
    };
    Ok(MenuItemDetail {
        item,
        customization_groups,
    })
}

fn storefront_groups(
    groups: Vec<CustomizationGroupWithOptions>,
) -> Vec<CustomizationGroupWithOptions> {
    groups
        .into_iter()
        .filter(|g| g.group.is_active)
        .map(|mut g| {
            g.options.retain(|o| o.is_active);
            g
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support;
    use shared::models::{
        CategoryCreate, CategoryUpdate, CustomizationGroupCreate, CustomizationLinkInput,
        CustomizationOptionCreate, CustomizationOptionUpdate, MenuItemCreate, MenuItemUpdate,
    };

    async fn category(pool: &SqlitePool, name: &str) -> i64 {
        category::create(
            pool,
            CategoryCreate {
                name: name.into(),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .id
    }

    async fn item(pool: &SqlitePool, category_id: i64, name: &str) -> MenuItem {
        menu_item::create(
            pool,
            MenuItemCreate {
                category_id,
                name: name.into(),
                base_price: 10.0,
                ..Default::default()
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_menu_hides_inactive_and_empty_sections() {
        let pool = test_support::pool().await;
        let pizzas = category(&pool, "Pizzas").await;
        category(&pool, "Drinks").await;
        let hidden = category(&pool, "Secret").await;
        item(&pool, pizzas, "Margherita").await;
        let retired = item(&pool, pizzas, "Hawaiian").await;
        item(&pool, hidden, "Staff Meal").await;

        menu_item::update(
            &pool,
            retired.id,
            MenuItemUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        category::update(
            &pool,
            hidden,
            CategoryUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let menu = load_menu(&pool).await.unwrap();
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].category.name, "Pizzas");
        let names: Vec<_> = menu[0].items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Margherita"]);
    }

    #[tokio::test]
    async fn test_find_item_by_id_or_slug() {
        let pool = test_support::pool().await;
        let cat = category(&pool, "Pizzas").await;
        let pie = item(&pool, cat, "Meat Lovers").await;

        let by_id = find_item(&pool, &pie.id.to_string()).await.unwrap().unwrap();
        let by_slug = find_item(&pool, "meat-lovers").await.unwrap().unwrap();
        assert_eq!(by_id.id, by_slug.id);
        assert!(find_item(&pool, "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_storefront_detail_filters_inactive() {
        let pool = test_support::pool().await;
        let cat = category(&pool, "Pizzas").await;
        let pie = item(&pool, cat, "Build Your Own").await;

        let toppings = customization::create_group(
            &pool,
            CustomizationGroupCreate {
                name: "Toppings".into(),
                options: vec![
                    CustomizationOptionCreate {
                        name: "Pepperoni".into(),
                        price_modifier: 1.5,
                        ..Default::default()
                    },
                    CustomizationOptionCreate {
                        name: "Anchovies".into(),
                        price_modifier: 1.0,
                        ..Default::default()
                    },
                    CustomizationOptionCreate {
                        name: "Olives".into(),
                        price_modifier: 1.0,
                        is_available: Some(false),
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
            pie.id,
            &[CustomizationLinkInput {
                group_id: toppings.group.id,
                sort_order: None,
                is_required_override: None,
            }],
        )
        .await
        .unwrap();
        customization::update_option(
            &pool,
            toppings.options[1].id,
            CustomizationOptionUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let admin = item_detail(&pool, pie.clone(), CatalogView::Admin).await.unwrap();
        assert_eq!(admin.customization_groups[0].options.len(), 3);

        let storefront = item_detail(&pool, pie, CatalogView::Storefront).await.unwrap();
        let options = &storefront.customization_groups[0].options;
        let names: Vec<_> = options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Pepperoni", "Olives"]);
        assert!(!options[1].is_available);
    }
}
