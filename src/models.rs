//! Core data models shared by the loaders, the merge engine, and the auditor.
//!
//! A [`Corpus`] is an insertion-ordered map from [`HymnKey`] to [`Hymn`].
//! Reference sets are [`IndexSet`]s: duplicates are impossible, equality is
//! set equality, and the stored order survives a load/write cycle.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::{HymnalError, Result};
use crate::key::HymnKey;

/// Ordered mapping of every hymn in a store.
pub type Corpus = IndexMap<HymnKey, Hymn>;

/// A set of labelled cross-references.
pub type ReferenceSet = IndexSet<Reference>;

/// Display text attached to a link to an English hymn.
pub const ENGLISH: &str = "English";

/// Display text attached to a link to a Russian hymn.
pub const RUSSIAN: &str = "Russian";

/// A labelled edge to another hymn, e.g. `("Chinese", ch/50)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub text: String,
    pub key: HymnKey,
}

impl Reference {
    pub fn new(text: impl Into<String>, key: HymnKey) -> Self {
        Self {
            text: text.into(),
            key,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerseType {
    Verse,
    Chorus,
    Other,
}

/// One stanza of lyrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verse {
    pub verse_type: VerseType,
    pub verse_content: Vec<String>,
}

/// One row of the primary store, or a parsed Russian hymn.
///
/// Non-reference columns are kept exactly as stored so that a merge only
/// ever changes the two reference columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hymn {
    pub title: String,
    pub lyrics_json: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub author: Option<String>,
    pub composer: Option<String>,
    pub key: Option<String>,
    pub time: Option<String>,
    pub meter: Option<String>,
    pub scriptures: Option<String>,
    pub hymn_code: Option<String>,
    pub music_json: Option<String>,
    pub svg_json: Option<String>,
    pub pdf_json: Option<String>,
    pub language_references: ReferenceSet,
    pub relevant_references: ReferenceSet,
}

impl Hymn {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Decode the stored lyrics. A missing column is an error, as every
    /// stored hymn is expected to carry lyrics.
    pub fn lyrics(&self) -> Result<Vec<Verse>> {
        let json = self
            .lyrics_json
            .as_deref()
            .ok_or_else(|| malformed_lyrics(&self.title, "missing".to_string()))?;
        serde_json::from_str(json).map_err(|e| malformed_lyrics(&self.title, e.to_string()))
    }

    pub fn set_lyrics(&mut self, verses: &[Verse]) {
        // A Vec of plain structs always serializes.
        self.lyrics_json = serde_json::to_string(verses).ok();
    }
}

fn malformed_lyrics(title: &str, message: String) -> HymnalError {
    HymnalError::MalformedJson {
        hymn: title.to_string(),
        field: "lyrics",
        message,
    }
}
