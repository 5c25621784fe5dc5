//! Slug regeneration
//!
//! Rebuilds category and item slugs from their current names. Rows are
//! processed in id order; a name whose slug is already taken gets the next
//! numeric suffix (`margherita`, `margherita-2`, ...).

use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::HashSet;

use crate::db::repository::{RepoResult, SlugTable, category, menu_item};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlugChange {
    pub id: i64,
    pub name: String,
    pub old_slug: String,
    pub new_slug: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReslugReport {
    pub dry_run: bool,
    pub categories: Vec<SlugChange>,
    pub items: Vec<SlugChange>,
}

impl ReslugReport {
    pub fn total(&self) -> usize {
        self.categories.len() + self.items.len()
    }
}

/// Assign fresh slugs to `(id, name, current_slug)` rows, returning only
/// the rows whose slug changes
fn plan(table: SlugTable, mut rows: Vec<(i64, String, String)>) -> Vec<SlugChange> {
    rows.sort_by_key(|(id, _, _)| *id);
    let mut taken = HashSet::new();
    let mut changes = Vec::new();

    for (id, name, old_slug) in rows {
        let mut base = shared::util::slugify(&name);
        if base.is_empty() {
            base = table.fallback_slug().to_string();
        }
        let mut n = 1;
        let new_slug = loop {
            let candidate = shared::util::slug_with_suffix(&base, n);
            if taken.insert(candidate.clone()) {
                break candidate;
            }
            n += 1;
        };
        if new_slug != old_slug {
            changes.push(SlugChange {
                id,
                name,
                old_slug,
                new_slug,
            });
        }
    }
    changes
}

/// Regenerate all slugs in one transaction (nothing written on a dry run)
pub async fn reslug(pool: &SqlitePool, dry_run: bool) -> RepoResult<ReslugReport> {
    let categories = category::find_all(pool, true)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name, c.slug))
        .collect();
    let items = menu_item::find_all(pool, None, true)
        .await?
        .into_iter()
        .map(|i| (i.id, i.name, i.slug))
        .collect();

    let report = ReslugReport {
        dry_run,
        categories: plan(SlugTable::Category, categories),
        items: plan(SlugTable::MenuItem, items),
    };
    if dry_run || report.total() == 0 {
        return Ok(report);
    }

    let mut tx = pool.begin().await?;
    // Park changed rows on unique placeholders so swaps cannot collide
    for c in &report.categories {
        category::set_slug(&mut tx, c.id, &format!("~reslug-{}", c.id)).await?;
    }
    for i in &report.items {
        menu_item::set_slug(&mut tx, i.id, &format!("~reslug-{}", i.id)).await?;
    }
    for c in &report.categories {
        category::set_slug(&mut tx, c.id, &c.new_slug).await?;
    }
    for i in &report.items {
        menu_item::set_slug(&mut tx, i.id, &i.new_slug).await?;
    }
    tx.commit().await?;

    tracing::info!(
        categories = report.categories.len(),
        items = report.items.len(),
        "Slugs regenerated"
    );
    Ok(report)
}
