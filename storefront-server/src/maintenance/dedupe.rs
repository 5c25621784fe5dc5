//! Duplicate customization group cleanup
//!
//! Two groups are duplicates when name, selection rules and option set
//! (name, price, price type) all match. The oldest group survives; item links
//! are repointed to it and the others are deleted.

use serde::Serialize;
use shared::models::{CustomizationGroupWithOptions, PriceType, SelectionType};
use sqlx::SqlitePool;
use std::collections::BTreeMap;

use crate::db::repository::{RepoResult, customization};

/// Groups sharing one fingerprint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateSet {
    pub name: String,
    pub kept: i64,
    pub removed: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DedupeReport {
    pub dry_run: bool,
    pub sets: Vec<DuplicateSet>,
    /// Links moved onto the kept group (0 on a dry run)
    pub links_repointed: u64,
}

impl DedupeReport {
    pub fn groups_removed(&self) -> usize {
        self.sets.iter().map(|s| s.removed.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Fingerprint {
    name: String,
    selection_type: SelectionType,
    is_required: bool,
    min_selections: i32,
    max_selections: Option<i32>,
    /// (name, price in cents, price type), sorted
    options: Vec<(String, i64, PriceType)>,
}

fn fingerprint(g: &CustomizationGroupWithOptions) -> Fingerprint {
    let mut options: Vec<_> = g
        .options
        .iter()
        .map(|o| {
            (
                o.name.clone(),
                (o.price_modifier * 100.0).round() as i64,
                o.price_type,
            )
        })
        .collect();
    options.sort();
    Fingerprint {
        name: g.group.name.clone(),
        selection_type: g.group.selection_type,
        is_required: g.group.is_required,
        min_selections: g.group.min_selections,
        max_selections: g.group.max_selections,
        options,
    }
}

/// Group ids into duplicate sets, oldest (lowest id) first
fn find_duplicates(groups: &[CustomizationGroupWithOptions]) -> Vec<DuplicateSet> {
    let mut buckets: BTreeMap<Fingerprint, Vec<i64>> = BTreeMap::new();
    for g in groups {
        buckets.entry(fingerprint(g)).or_default().push(g.group.id);
    }

    let mut sets: Vec<DuplicateSet> = buckets
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|(fp, mut ids)| {
            ids.sort_unstable();
            let kept = ids.remove(0);
            DuplicateSet {
                name: fp.name,
                kept,
                removed: ids,
            }
        })
        .collect();
    sets.sort_by_key(|s| s.kept);
    sets
}

/// Find and (unless `dry_run`) merge duplicate groups in one transaction
pub async fn dedupe_groups(pool: &SqlitePool, dry_run: bool) -> RepoResult<DedupeReport> {
    let groups = customization::find_all_groups(pool, true).await?;
    let sets = find_duplicates(&groups);

    let mut report = DedupeReport {
        dry_run,
        sets,
        links_repointed: 0,
    };
    if dry_run || report.sets.is_empty() {
        return Ok(report);
    }

    let mut tx = pool.begin().await?;
    for set in &report.sets {
        for &dup in &set.removed {
            report.links_repointed +=
                customization::merge_group_into(&mut tx, dup, set.kept).await?;
        }
    }
    tx.commit().await?;

    tracing::info!(
        sets = report.sets.len(),
        removed = report.groups_removed(),
        links = report.links_repointed,
        "Duplicate customization groups merged"
    );
    Ok(report)
}
