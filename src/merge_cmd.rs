//! The `merge` command: fold the Russian store into the primary store.
//!
//! Pipeline: load both stores, merge, audit the combined corpus, then
//! (unless dry-run) rewrite `song_data`, stamp `user_version`, and probe.
//! Nothing is written if any earlier step fails.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::info;

use crate::audit::{audit, print_report, AuditReport};
use crate::config::Config;
use crate::db;
use crate::hymnal;
use crate::merge::{merge_with_stats, MergeStats};
use crate::probe::run_probe;
use crate::russian::load_russian_corpus;

pub async fn run_merge(config: &Config, dry_run: bool) -> Result<()> {
    let dry_run = dry_run || config.migration.dry_run;

    let russian_pool = db::connect(&config.db.russian, false).await?;
    let hymnal_pool = match db::connect(&config.db.hymnal, false).await {
        Ok(pool) => pool,
        Err(e) => {
            russian_pool.close().await;
            return Err(e);
        }
    };

    let result = merge_stores(config, &hymnal_pool, &russian_pool, dry_run).await;

    russian_pool.close().await;
    hymnal_pool.close().await;
    result
}

async fn merge_stores(
    config: &Config,
    hymnal_pool: &SqlitePool,
    russian_pool: &SqlitePool,
    dry_run: bool,
) -> Result<()> {
    let primary = hymnal::load_corpus(hymnal_pool)
        .await
        .context("Failed to load hymnal corpus")?;
    let russian = load_russian_corpus(russian_pool)
        .await
        .context("Failed to load russian corpus")?;
    info!(
        primary = primary.len(),
        russian = russian.len(),
        "loaded stores"
    );

    let primary_count = primary.len();
    let (combined, stats) = merge_with_stats(primary, &russian);
    let report = audit(&combined).context("Merged corpus failed audit")?;

    if dry_run {
        println!("merge russian (dry-run)");
        print_counts(primary_count, russian.len(), &stats, &report);
        return Ok(());
    }

    hymnal::write_corpus(hymnal_pool, &combined)
        .await
        .context("Failed to write merged corpus")?;

    if let Some(version) = config.migration.user_version {
        hymnal::stamp_user_version(hymnal_pool, version).await?;
        info!(version, "stamped user_version");
    }

    let probed = if config.migration.probe {
        Some(run_probe(hymnal_pool).await.context("Post-write probe failed")?)
    } else {
        None
    };

    println!("merge russian");
    print_counts(primary_count, russian.len(), &stats, &report);
    println!("  hymns written: {}", combined.len());
    if let Some(version) = config.migration.user_version {
        println!("  user_version: {}", version);
    }
    if let Some(rows) = probed {
        println!("  probe rows: {}", rows);
    }
    println!("ok");

    Ok(())
}

fn print_counts(primary: usize, russian: usize, stats: &MergeStats, report: &AuditReport) {
    println!("  primary hymns: {}", primary);
    println!("  russian hymns: {}", russian);
    println!("  linked: {}", stats.linked);
    println!("  dangling: {}", stats.dangling);
    println!("  hymns touched: {}", stats.hymns_touched);
    print_report(report);
}
