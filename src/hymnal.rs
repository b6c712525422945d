//! Primary store: load `song_data` into a [`Corpus`] and write it back.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::error::Result;
use crate::key::{HymnKey, HymnType};
use crate::models::{Corpus, Hymn};
use crate::references::{parse_references, serialize_references, LANGUAGES_NAME, RELEVANT_NAME};

const SELECT_SONGS: &str = r#"
    SELECT HYMN_TYPE, HYMN_NUMBER, QUERY_PARAMS, SONG_TITLE, SONG_LYRICS,
           SONG_META_DATA_CATEGORY, SONG_META_DATA_SUBCATEGORY, SONG_META_DATA_AUTHOR,
           SONG_META_DATA_COMPOSER, SONG_META_DATA_KEY, SONG_META_DATA_TIME,
           SONG_META_DATA_METER, SONG_META_DATA_SCRIPTURES, SONG_META_DATA_HYMN_CODE,
           SONG_META_DATA_MUSIC, SONG_META_DATA_SVG_SHEET_MUSIC, SONG_META_DATA_PDF_SHEET_MUSIC,
           SONG_META_DATA_LANGUAGES, SONG_META_DATA_Relevant
    FROM song_data
    ORDER BY _id
"#;

const INSERT_SONG: &str = r#"
    INSERT INTO song_data (
        HYMN_TYPE, HYMN_NUMBER, QUERY_PARAMS, SONG_TITLE, SONG_LYRICS,
        SONG_META_DATA_CATEGORY, SONG_META_DATA_SUBCATEGORY, SONG_META_DATA_AUTHOR,
        SONG_META_DATA_COMPOSER, SONG_META_DATA_KEY, SONG_META_DATA_TIME,
        SONG_META_DATA_METER, SONG_META_DATA_SCRIPTURES, SONG_META_DATA_HYMN_CODE,
        SONG_META_DATA_MUSIC, SONG_META_DATA_SVG_SHEET_MUSIC, SONG_META_DATA_PDF_SHEET_MUSIC,
        SONG_META_DATA_LANGUAGES, SONG_META_DATA_Relevant
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

/// Read every `song_data` row in storage order.
pub async fn load_corpus(pool: &SqlitePool) -> Result<Corpus> {
    let rows = sqlx::query(SELECT_SONGS).fetch_all(pool).await?;

    let mut corpus = Corpus::with_capacity(rows.len());
    for row in &rows {
        let (key, hymn) = decode_row(row)?;
        corpus.insert(key, hymn);
    }

    debug!(hymns = corpus.len(), "loaded song_data");
    Ok(corpus)
}

fn decode_row(row: &SqliteRow) -> Result<(HymnKey, Hymn)> {
    let hymn_type = HymnType::from_code(&row.try_get::<String, _>("HYMN_TYPE")?)?;
    let number: String = row.try_get("HYMN_NUMBER")?;
    let query_params: Option<String> = row.try_get("QUERY_PARAMS")?;
    let key = HymnKey::new(hymn_type, number, query_params.as_deref());
    let label = key.to_string();

    let languages: Option<String> = row.try_get("SONG_META_DATA_LANGUAGES")?;
    let relevant: Option<String> = row.try_get("SONG_META_DATA_Relevant")?;

    let hymn = Hymn {
        title: row
            .try_get::<Option<String>, _>("SONG_TITLE")?
            .unwrap_or_default(),
        lyrics_json: row.try_get("SONG_LYRICS")?,
        category: row.try_get("SONG_META_DATA_CATEGORY")?,
        sub_category: row.try_get("SONG_META_DATA_SUBCATEGORY")?,
        author: row.try_get("SONG_META_DATA_AUTHOR")?,
        composer: row.try_get("SONG_META_DATA_COMPOSER")?,
        key: row.try_get("SONG_META_DATA_KEY")?,
        time: row.try_get("SONG_META_DATA_TIME")?,
        meter: row.try_get("SONG_META_DATA_METER")?,
        scriptures: row.try_get("SONG_META_DATA_SCRIPTURES")?,
        hymn_code: row.try_get("SONG_META_DATA_HYMN_CODE")?,
        music_json: row.try_get("SONG_META_DATA_MUSIC")?,
        svg_json: row.try_get("SONG_META_DATA_SVG_SHEET_MUSIC")?,
        pdf_json: row.try_get("SONG_META_DATA_PDF_SHEET_MUSIC")?,
        language_references: parse_references(languages.as_deref(), &label, "languages")?,
        relevant_references: parse_references(relevant.as_deref(), &label, "relevant")?,
    };

    Ok((key, hymn))
}

/// Replace the contents of `song_data` with `corpus`, in corpus order, in
/// one transaction.
pub async fn write_corpus(pool: &SqlitePool, corpus: &Corpus) -> Result<()> {
    let mut tx = pool.begin().await?;

    let cleared = sqlx::query("DELETE FROM song_data")
        .execute(&mut *tx)
        .await?
        .rows_affected();

    for (key, hymn) in corpus {
        sqlx::query(INSERT_SONG)
            .bind(key.hymn_type.code())
            .bind(&key.number)
            .bind(&key.query_suffix)
            .bind(&hymn.title)
            .bind(&hymn.lyrics_json)
            .bind(&hymn.category)
            .bind(&hymn.sub_category)
            .bind(&hymn.author)
            .bind(&hymn.composer)
            .bind(&hymn.key)
            .bind(&hymn.time)
            .bind(&hymn.meter)
            .bind(&hymn.scriptures)
            .bind(&hymn.hymn_code)
            .bind(&hymn.music_json)
            .bind(&hymn.svg_json)
            .bind(&hymn.pdf_json)
            .bind(serialize_references(LANGUAGES_NAME, &hymn.language_references))
            .bind(serialize_references(RELEVANT_NAME, &hymn.relevant_references))
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    info!(cleared, written = corpus.len(), "rewrote song_data");
    Ok(())
}

/// Set the schema version consumers use to detect a migrated store.
pub async fn stamp_user_version(pool: &SqlitePool, version: u32) -> Result<()> {
    // PRAGMA values cannot be bound; `version` is an integer.
    sqlx::query(&format!("PRAGMA user_version = {}", version))
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn user_version(pool: &SqlitePool) -> Result<i64> {
    let version: i64 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HymnalError;
    use crate::key::{parse_path, SIMPLIFIED_SUFFIX};
    use crate::migrate::create_song_data;
    use crate::models::Reference;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        create_song_data(&pool).await.unwrap();
        pool
    }

    fn sample_corpus() -> Corpus {
        let mut corpus = Corpus::new();
        let mut h = Hymn::new("It's my joy");
        h.lyrics_json = Some(r#"[{"verseType":"verse","verseContent":["a"]}]"#.to_string());
        h.meter = Some("8.7.8.7".to_string());
        h.language_references
            .insert(Reference::new("詩歌(繁)", parse_path("ch/37").unwrap()));
        h.language_references
            .insert(Reference::new("诗歌(简)", parse_path("ch/37?gb=1").unwrap()));
        corpus.insert(parse_path("h/43").unwrap(), h);

        let mut ch = Hymn::new("中文");
        ch.language_references
            .insert(Reference::new("English", parse_path("h/43").unwrap()));
        corpus.insert(parse_path("ch/37?gb=1").unwrap(), ch);
        corpus
    }

    #[tokio::test]
    async fn test_write_then_load_preserves_corpus() {
        let pool = memory_pool().await;
        let corpus = sample_corpus();

        write_corpus(&pool, &corpus).await.unwrap();
        let loaded = load_corpus(&pool).await.unwrap();

        assert_eq!(loaded, corpus);
        let keys: Vec<&HymnKey> = loaded.keys().collect();
        assert_eq!(keys[1].query_suffix, SIMPLIFIED_SUFFIX);
    }

    #[tokio::test]
    async fn test_write_replaces_previous_rows() {
        let pool = memory_pool().await;
        write_corpus(&pool, &sample_corpus()).await.unwrap();

        let mut smaller = Corpus::new();
        smaller.insert(parse_path("h/1").unwrap(), Hymn::new("One"));
        write_corpus(&pool, &smaller).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM song_data")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_empty_references_stored_as_null() {
        let pool = memory_pool().await;
        let mut corpus = Corpus::new();
        corpus.insert(parse_path("h/1").unwrap(), Hymn::new("One"));
        write_corpus(&pool, &corpus).await.unwrap();

        let languages: Option<String> =
            sqlx::query_scalar("SELECT SONG_META_DATA_LANGUAGES FROM song_data")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(languages, None);
    }

    #[tokio::test]
    async fn test_null_query_params_and_title() {
        let pool = memory_pool().await;
        sqlx::query("INSERT INTO song_data (HYMN_TYPE, HYMN_NUMBER) VALUES ('ns', '154')")
            .execute(&pool)
            .await
            .unwrap();

        let corpus = load_corpus(&pool).await.unwrap();
        let (key, hymn) = corpus.first().unwrap();
        assert_eq!(key, &parse_path("ns/154").unwrap());
        assert_eq!(hymn.title, "");
    }

    #[tokio::test]
    async fn test_unknown_type_is_fatal() {
        let pool = memory_pool().await;
        sqlx::query("INSERT INTO song_data (HYMN_TYPE, HYMN_NUMBER) VALUES ('xx', '1')")
            .execute(&pool)
            .await
            .unwrap();
        assert!(matches!(
            load_corpus(&pool).await,
            Err(HymnalError::UnknownHymnType(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_reference_blob_is_fatal() {
        let pool = memory_pool().await;
        sqlx::query(
            "INSERT INTO song_data (HYMN_TYPE, HYMN_NUMBER, SONG_META_DATA_Relevant) VALUES ('h', '1', '{not json')",
        )
        .execute(&pool)
        .await
        .unwrap();
        assert!(matches!(
            load_corpus(&pool).await,
            Err(HymnalError::MalformedJson {
                field: "relevant",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_stamp_user_version() {
        let pool = memory_pool().await;
        stamp_user_version(&pool, 19).await.unwrap();
        assert_eq!(user_version(&pool).await.unwrap(), 19);
    }
}
