//! Russian hymn source: HTML parsing and the `hymns` table loader.
//!
//! Each Russian song is stored as one HTML document. The first element
//! under `<body>` holds, in order, optional `title` / `subtitle` / `meter`
//! headers and one or more verse blocks laid out as table cells. Numeric
//! cells are verse markers and must count up from 1.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::{HymnalError, Result};
use crate::key::{HymnKey, HymnType};
use crate::models::{Corpus, Hymn, Reference, Verse, VerseType, ENGLISH};

static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").expect("body selector"));
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("td selector"));

/// One row of the `hymns` table.
#[derive(Debug, Clone)]
pub struct RussianRow {
    pub number: i64,
    pub english_number: i64,
    pub title: String,
    pub html: String,
}

impl RussianRow {
    pub fn key(&self) -> HymnKey {
        HymnKey::new(HymnType::Russian, self.number.to_string(), None)
    }
}

/// Fields recovered from one HTML document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLyrics {
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub meter: Option<String>,
    pub verses: Vec<Verse>,
}

/// Parse the HTML of hymn `hymn` (used only to label errors).
pub fn parse_html(hymn: &str, html: &str) -> Result<ParsedLyrics> {
    let document = Html::parse_document(html);
    let container = document
        .select(&BODY)
        .next()
        .and_then(|body| body.children().find_map(ElementRef::wrap))
        .ok_or_else(|| HymnalError::EmptyBody(hymn.to_string()))?;

    let mut parsed = ParsedLyrics::default();
    let mut next_verse: u32 = 1;

    for child in container.children().filter_map(ElementRef::wrap) {
        match class_of(&child) {
            "title" => parsed.category = Some(element_text(&child)),
            "subtitle" => parsed.sub_category = Some(element_text(&child)),
            "meter" => parsed.meter = Some(element_text(&child)),
            _ => parse_verse_block(hymn, &child, &mut next_verse, &mut parsed.verses)?,
        }
    }

    Ok(parsed)
}

fn parse_verse_block(
    hymn: &str,
    block: &ElementRef<'_>,
    next_verse: &mut u32,
    verses: &mut Vec<Verse>,
) -> Result<()> {
    for cell in block.select(&CELL) {
        let text: String = element_text(&cell)
            .chars()
            .filter(|c| !matches!(*c, '.' | '*'))
            .collect();
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        if text.chars().all(|c| c.is_ascii_digit()) {
            if text.parse::<u32>().ok() != Some(*next_verse) {
                return Err(HymnalError::NonConsecutiveVerse {
                    hymn: hymn.to_string(),
                    expected: *next_verse,
                    found: text.to_string(),
                });
            }
            *next_verse += 1;
            continue;
        }

        let verse_type = match class_of(&cell) {
            "" => VerseType::Verse,
            "chorus" => VerseType::Chorus,
            _ => VerseType::Other,
        };

        // Direct text children only: each <br>-separated run is one line,
        // whitespace-collapsed and trimmed. Blank runs are dropped.
        let verse_content = cell
            .children()
            .filter_map(|node| node.value().as_text())
            .map(|t| normalize_whitespace(t))
            .filter(|line| !line.is_empty())
            .collect();

        verses.push(Verse {
            verse_type,
            verse_content,
        });
    }
    Ok(())
}

fn class_of<'a>(element: &ElementRef<'a>) -> &'a str {
    element.value().attr("class").map(str::trim).unwrap_or("")
}

fn element_text(element: &ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Build the hymn record for one Russian row, linked to its English original.
pub fn parse_row(row: &RussianRow) -> Result<Hymn> {
    let key = row.key();
    let parsed = parse_html(&key.to_string(), &row.html)?;

    let mut hymn = Hymn::new(row.title.clone());
    hymn.set_lyrics(&parsed.verses);
    hymn.category = parsed.category;
    hymn.sub_category = parsed.sub_category;
    hymn.meter = parsed.meter;
    hymn.language_references.insert(Reference::new(
        ENGLISH,
        HymnKey::new(HymnType::ClassicHymn, row.english_number.to_string(), None),
    ));
    Ok(hymn)
}

/// Read and parse every row of the Russian store, in row order.
pub async fn load_russian_corpus(pool: &SqlitePool) -> Result<Corpus> {
    let rows = sqlx::query("SELECT number, number_eng, first_string, html FROM hymns")
        .fetch_all(pool)
        .await?;

    let mut corpus = Corpus::new();
    for row in &rows {
        let russian = RussianRow {
            number: row.try_get("number")?,
            english_number: row.try_get("number_eng")?,
            title: row
                .try_get::<Option<String>, _>("first_string")?
                .unwrap_or_default(),
            html: row.try_get::<Option<String>, _>("html")?.unwrap_or_default(),
        };
        let hymn = parse_row(&russian)?;
        debug!(
            key = %russian.key(),
            verses = hymn.lyrics()?.len(),
            "parsed russian hymn"
        );
        corpus.insert(russian.key(), hymn);
    }
    Ok(corpus)
}
