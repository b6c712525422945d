//! Post-write smoke test over a handful of well-known hymns.
//!
//! The probe looks up `h/43`, `S/28`, and `ch/37` (both Chinese variants),
//! checks every JSON column parses, and that each carries a full set of
//! eight language links. It checks data shape only, not the graph rules.

use anyhow::{Context, Result as AnyResult};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::config::Config;
use crate::db;
use crate::error::{HymnalError, Result};
use crate::key::HymnType;

const PROBE_KEYS: [(HymnType, &str); 3] = [
    (HymnType::ClassicHymn, "43"),
    (HymnType::Spanish, "28"),
    (HymnType::Chinese, "37"),
];

const EXPECTED_ROWS: usize = 4;
const EXPECTED_LANGUAGES: usize = 8;

const JSON_COLUMNS: [&str; 6] = [
    "SONG_LYRICS",
    "SONG_META_DATA_MUSIC",
    "SONG_META_DATA_SVG_SHEET_MUSIC",
    "SONG_META_DATA_PDF_SHEET_MUSIC",
    "SONG_META_DATA_LANGUAGES",
    "SONG_META_DATA_Relevant",
];

/// Run the probe. Returns the number of rows checked.
pub async fn run_probe(pool: &SqlitePool) -> Result<usize> {
    let filter = PROBE_KEYS
        .iter()
        .map(|_| "(HYMN_TYPE = ? AND HYMN_NUMBER = ?)")
        .collect::<Vec<_>>()
        .join(" OR ");
    let sql = format!(
        "SELECT HYMN_TYPE, HYMN_NUMBER, QUERY_PARAMS, {} FROM song_data WHERE {}",
        JSON_COLUMNS.join(", "),
        filter
    );

    let mut query = sqlx::query(&sql);
    for (hymn_type, number) in PROBE_KEYS {
        query = query.bind(hymn_type.code()).bind(number);
    }
    let rows = query.fetch_all(pool).await?;

    for row in &rows {
        let label = format!(
            "{}/{}{}",
            row.try_get::<String, _>("HYMN_TYPE")?,
            row.try_get::<String, _>("HYMN_NUMBER")?,
            row.try_get::<Option<String>, _>("QUERY_PARAMS")?
                .unwrap_or_default()
        );

        for column in JSON_COLUMNS {
            let value: Option<String> = row.try_get(column)?;
            if let Some(json) = value {
                serde_json::from_str::<serde_json::Value>(&json).map_err(|e| {
                    HymnalError::ProbeFailed(format!("{} has invalid json in {}: {}", label, column, e))
                })?;
            }
        }

        let languages = language_count(row.try_get("SONG_META_DATA_LANGUAGES")?);
        if languages != EXPECTED_LANGUAGES {
            return Err(HymnalError::ProbeFailed(format!(
                "{} has {} languages, expected {}",
                label, languages, EXPECTED_LANGUAGES
            )));
        }
        debug!(hymn = %label, "probe row ok");
    }

    if rows.len() != EXPECTED_ROWS {
        return Err(HymnalError::ProbeFailed(format!(
            "expected {} rows, found {}",
            EXPECTED_ROWS,
            rows.len()
        )));
    }

    Ok(rows.len())
}

fn language_count(json: Option<String>) -> usize {
    json.and_then(|j| serde_json::from_str::<serde_json::Value>(&j).ok())
        .and_then(|v| v.get("data").and_then(|d| d.as_array()).map(Vec::len))
        .unwrap_or(0)
}

/// `probe` command.
pub async fn run_probe_cmd(config: &Config) -> AnyResult<()> {
    let pool = db::connect(&config.db.hymnal, false).await?;
    let result = run_probe(&pool).await;
    pool.close().await;
    let rows = result.context("Probe failed")?;

    println!("probe {}", config.db.hymnal.display());
    println!("  rows checked: {}", rows);
    println!("ok");
    Ok(())
}
