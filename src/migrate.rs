use anyhow::Result;

use crate::config::Config;
use crate::db;

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(&config.db.hymnal, true).await?;
    create_song_data(&pool).await?;
    pool.close().await;

    let pool = db::connect(&config.db.russian, true).await?;
    create_russian_hymns(&pool).await?;
    pool.close().await;

    Ok(())
}

/// Primary store table. Column names match the published hymnal database.
pub async fn create_song_data(pool: &sqlx::SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS song_data (
            _id INTEGER PRIMARY KEY AUTOINCREMENT,
            HYMN_TYPE TEXT NOT NULL,
            HYMN_NUMBER TEXT NOT NULL,
            QUERY_PARAMS TEXT,
            SONG_TITLE TEXT,
            SONG_LYRICS TEXT,
            SONG_META_DATA_CATEGORY TEXT,
            SONG_META_DATA_SUBCATEGORY TEXT,
            SONG_META_DATA_AUTHOR TEXT,
            SONG_META_DATA_COMPOSER TEXT,
            SONG_META_DATA_KEY TEXT,
            SONG_META_DATA_TIME TEXT,
            SONG_META_DATA_METER TEXT,
            SONG_META_DATA_SCRIPTURES TEXT,
            SONG_META_DATA_HYMN_CODE TEXT,
            SONG_META_DATA_MUSIC TEXT,
            SONG_META_DATA_SVG_SHEET_MUSIC TEXT,
            SONG_META_DATA_PDF_SHEET_MUSIC TEXT,
            SONG_META_DATA_LANGUAGES TEXT,
            SONG_META_DATA_Relevant TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_song_data_key ON song_data(HYMN_TYPE, HYMN_NUMBER, QUERY_PARAMS)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Russian source table.
pub async fn create_russian_hymns(pool: &sqlx::SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS hymns (
            number INTEGER PRIMARY KEY,
            number_eng INTEGER NOT NULL,
            first_string TEXT,
            html TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
