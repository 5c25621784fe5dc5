//! Slice maintenance CLI
//!
//! Operates directly on the SQLite database file; the server may keep running
//! (WAL mode) but large restores are best done with it stopped.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use storefront_server::maintenance::{self, MenuSeed};
use storefront_server::{Config, DbService, init_logger};

/// Slice storefront maintenance tool
#[derive(Parser)]
#[command(name = "storefront-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Maintenance tasks for the Slice storefront database", long_about = None)]
struct Cli {
    /// SQLite database file
    ///
    /// Defaults to the server's `DATABASE_PATH` / `{WORK_DIR}/storefront.db`.
    #[arg(short, long, env = "DATABASE_PATH", global = true)]
    database: Option<PathBuf>,

    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a menu seed (built-in pizzeria menu by default); idempotent
    Seed {
        /// JSON seed file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Merge customization groups that are exact duplicates
    DedupeGroups {
        /// Report without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Export every table to a JSON backup
    Dump {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Load a JSON backup into an empty database
    Restore {
        #[arg(short, long)]
        input: PathBuf,
        /// Clear a non-empty database first
        #[arg(long)]
        force: bool,
    },
    /// Regenerate category and item slugs from their names
    Reslug {
        #[arg(long)]
        dry_run: bool,
    },
    /// Print an Argon2 hash for ADMIN_PASSWORD_HASH
    HashPassword { password: String },
}

/// Open the database, applying migrations
async fn open(database: Option<PathBuf>) -> anyhow::Result<DbService> {
    let path = match database {
        Some(path) => path.to_string_lossy().into_owned(),
        None => Config::from_env().database_path,
    };
    tracing::debug!(database = %path, "Opening database");
    DbService::new(&path)
        .await
        .with_context(|| format!("Failed to open {path}"))
}

fn print_report<T: Serialize>(
    json: bool,
    report: &T,
    summary: impl FnOnce() -> String,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", summary());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logger();
    let cli = Cli::parse();

    let database = cli.database;

    match cli.command {
        Command::Seed { file } => {
            let pool = open(database).await?.pool;
            let seed = match file {
                Some(path) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    MenuSeed::from_json(&text)?
                }
                None => MenuSeed::builtin()?,
            };
            let report = maintenance::seed_menu(&pool, &seed).await?;
            print_report(cli.json, &report, || {
                format!(
                    "Seeded {} categories, {} groups, {} items ({} already present), {} links, {} settings",
                    report.categories_created,
                    report.groups_created,
                    report.items_created,
                    report.items_skipped,
                    report.links_created,
                    report.settings_created
                )
            })?;
        }
        Command::DedupeGroups { dry_run } => {
            let pool = open(database).await?.pool;
            let report = maintenance::dedupe_groups(&pool, dry_run).await?;
            print_report(cli.json, &report, || {
                let mut lines: Vec<String> = report
                    .sets
                    .iter()
                    .map(|s| format!("  {}: keep #{}, remove {:?}", s.name, s.kept, s.removed))
                    .collect();
                let verb = if dry_run { "Would remove" } else { "Removed" };
                lines.push(format!(
                    "{verb} {} duplicate group(s), {} link(s) repointed",
                    report.groups_removed(),
                    report.links_repointed
                ));
                lines.join("\n")
            })?;
        }
        Command::Dump { output } => {
            let pool = open(database).await?.pool;
            let backup = maintenance::dump(&pool).await?;
            match output {
                Some(path) => {
                    maintenance::write_backup(&backup, &path)?;
                    eprintln!(
                        "Wrote backup v{} ({} items, {} orders) to {}",
                        backup.version,
                        backup.menu_items.len(),
                        backup.orders.len(),
                        path.display()
                    );
                }
                None => println!("{}", serde_json::to_string_pretty(&backup)?),
            }
        }
        Command::Restore { input, force } => {
            let pool = open(database).await?.pool;
            let backup = maintenance::read_backup(&input)?;
            let report = maintenance::restore(&pool, &backup, force).await?;
            print_report(cli.json, &report, || {
                format!(
                    "Restored {} categories, {} items, {} groups, {} orders, {} settings",
                    report.categories,
                    report.menu_items,
                    report.customization_groups,
                    report.orders,
                    report.settings
                )
            })?;
        }
        Command::Reslug { dry_run } => {
            let pool = open(database).await?.pool;
            let report = maintenance::reslug(&pool, dry_run).await?;
            print_report(cli.json, &report, || {
                let mut lines: Vec<String> = report
                    .categories
                    .iter()
                    .chain(report.items.iter())
                    .map(|c| format!("  {}: {} -> {}", c.name, c.old_slug, c.new_slug))
                    .collect();
                let verb = if dry_run { "Would change" } else { "Changed" };
                lines.push(format!("{verb} {} slug(s)", report.total()));
                lines.join("\n")
            })?;
        }
        Command::HashPassword { password } => {
            let hash = storefront_server::auth::password::hash_password(&password)
                .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;
            println!("{hash}");
        }
    }

    Ok(())
}
