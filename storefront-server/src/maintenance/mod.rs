//! Maintenance tasks
//!
//! Library side of `storefront-cli`: every task takes a pool and returns a
//! serializable report.
//!
//! - [`seed`] - load a menu seed (built-in pizzeria menu or a JSON file)
//! - [`dedupe`] - merge duplicate customization groups
//! - [`backup`] - versioned JSON dump / restore
//! - [`reslug`] - regenerate slugs from names

pub mod backup;
pub mod dedupe;
pub mod reslug;
pub mod seed;

pub use backup::{BACKUP_VERSION, Backup, RestoreReport, dump, read_backup, restore, write_backup};
pub use dedupe::{DedupeReport, DuplicateSet, dedupe_groups};
pub use reslug::{ReslugReport, SlugChange, reslug};
pub use seed::{MenuSeed, SeedReport, seed_menu};
