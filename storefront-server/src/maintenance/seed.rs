//! Menu seeding
//!
//! Loads a [`MenuSeed`] document. Categories and groups are matched by name,
//! items by slug (or by name within the category when the name yields no
//! slug); anything already present is left untouched, so running the same
//! seed twice is a no-op.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::{
    CategoryCreate, CustomizationGroupCreate, CustomizationLinkInput, CustomizationOptionCreate,
    MenuItemCreate, MenuItemType, SelectionType, SettingKey,
};
use sqlx::SqlitePool;
use std::collections::{BTreeMap, HashMap};

use crate::db::repository::{RepoError, RepoResult, category, customization, menu_item};

const DEFAULT_MENU: &str = include_str!("../../data/default_menu.json");

/// Seed document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuSeed {
    /// Written only when the key is not set yet
    #[serde(default)]
    pub settings: BTreeMap<String, Value>,
    #[serde(default)]
    pub groups: Vec<SeedGroup>,
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedGroup {
    pub name: String,
    pub description: Option<String>,
    pub selection_type: Option<SelectionType>,
    pub is_required: Option<bool>,
    pub min_selections: Option<i32>,
    pub max_selections: Option<i32>,
    #[serde(default)]
    pub options: Vec<CustomizationOptionCreate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedCategory {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<SeedItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedItem {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub base_price: f64,
    pub item_type: Option<MenuItemType>,
    /// Group names, in display order
    #[serde(default)]
    pub customizations: Vec<SeedLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedLink {
    pub group: String,
    /// Per-item override of the group's `is_required`
    pub is_required: Option<bool>,
}

/// What a seed run changed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeedReport {
    pub settings_created: usize,
    pub groups_created: usize,
    pub categories_created: usize,
    pub items_created: usize,
    pub items_skipped: usize,
    pub links_created: usize,
}

impl MenuSeed {
    /// The built-in pizzeria menu
    pub fn builtin() -> RepoResult<Self> {
        Self::from_json(DEFAULT_MENU)
    }

    pub fn from_json(text: &str) -> RepoResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| RepoError::Validation(format!("Invalid menu seed: {e}")))
    }
}

/// Apply `seed` in a single transaction
pub async fn seed_menu(pool: &SqlitePool, seed: &MenuSeed) -> RepoResult<SeedReport> {
    let mut report = SeedReport::default();
    let mut tx = pool.begin().await?;
    let now = shared::util::now_millis();

    for (key, value) in &seed.settings {
        if let Some(known) = SettingKey::parse(key) {
            known.check(value).map_err(RepoError::Validation)?;
        }
        let text = value.to_string();
        let inserted = sqlx::query(
            "INSERT INTO setting (key, value, description, updated_at) VALUES (?1, ?2, NULL, ?3) ON CONFLICT(key) DO NOTHING",
        )
        .bind(key)
        .bind(&text)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        report.settings_created += inserted as usize;
    }

    let mut group_ids: HashMap<&str, i64> = HashMap::new();
    for (idx, group) in seed.groups.iter().enumerate() {
        let id = match customization::find_group_by_name(&mut tx, &group.name).await? {
            Some(existing) => existing.group.id,
            None => {
                let created = customization::create_group_with(
                    &mut tx,
                    CustomizationGroupCreate {
                        name: group.name.clone(),
                        description: group.description.clone(),
                        selection_type: group.selection_type,
                        is_required: group.is_required,
                        min_selections: group.min_selections,
                        max_selections: group.max_selections,
                        sort_order: Some(idx as i32),
                        options: group.options.clone(),
                    },
                )
                .await?;
                report.groups_created += 1;
                created.group.id
            }
        };
        group_ids.insert(group.name.as_str(), id);
    }

    for (cat_idx, seed_category) in seed.categories.iter().enumerate() {
        let category_id = match category::find_by_name(&mut tx, &seed_category.name).await? {
            Some(existing) => existing.id,
            None => {
                let created = category::create_with(
                    &mut tx,
                    CategoryCreate {
                        name: seed_category.name.clone(),
                        slug: None,
                        description: seed_category.description.clone(),
                        sort_order: Some(cat_idx as i32),
                        is_active: Some(true),
                    },
                )
                .await?;
                report.categories_created += 1;
                created.id
            }
        };

        for (item_idx, item) in seed_category.items.iter().enumerate() {
            // None when the name has no sluggable characters; create_with then
            // picks a free fallback slug
            let slug = item
                .slug
                .clone()
                .or_else(|| Some(shared::util::slugify(&item.name)))
                .filter(|slug| !slug.is_empty());
            let exists: Option<i64> = match &slug {
                Some(slug) => {
                    sqlx::query_scalar("SELECT id FROM menu_item WHERE slug = ?")
                        .bind(slug)
                        .fetch_optional(&mut *tx)
                        .await?
                }
                None => {
                    sqlx::query_scalar(
                        "SELECT id FROM menu_item WHERE category_id = ? AND name = ?",
                    )
                    .bind(category_id)
                    .bind(&item.name)
                    .fetch_optional(&mut *tx)
                    .await?
                }
            };
            if exists.is_some() {
                report.items_skipped += 1;
                continue;
            }

            let created = menu_item::create_with(
                &mut tx,
                MenuItemCreate {
                    category_id,
                    name: item.name.clone(),
                    slug,
                    description: item.description.clone(),
                    base_price: item.base_price,
                    image_url: None,
                    item_type: item.item_type,
                    sort_order: Some(item_idx as i32),
                    is_available: Some(true),
                    is_active: Some(true),
                },
            )
            .await?;
            report.items_created += 1;

            for (link_idx, link) in item.customizations.iter().enumerate() {
                let group_id = group_ids.get(link.group.as_str()).copied().ok_or_else(|| {
                    RepoError::Validation(format!(
                        "Item '{}' references unknown group '{}'",
                        item.name, link.group
                    ))
                })?;
                menu_item::add_link(
                    &mut tx,
                    created.id,
                    &CustomizationLinkInput {
                        group_id,
                        sort_order: Some(link_idx as i32),
                        is_required_override: link.is_required,
                    },
                )
                .await?;
                report.links_created += 1;
            }
        }
    }

    tx.commit().await?;
    tracing::info!(
        groups = report.groups_created,
        categories = report.categories_created,
        items = report.items_created,
        skipped = report.items_skipped,
        "Menu seed applied"
    );
    Ok(report)
}
