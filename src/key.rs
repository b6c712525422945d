//! Canonical identity of a hymn.
//!
//! A [`HymnKey`] is the `(type, number, query suffix)` triple used as the
//! corpus key and as the target of every cross-reference. Keys travel on the
//! wire as paths like `/en/hymn/ch/476?gb=1`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::error::{HymnalError, Result};

/// Prefix carried by every stored reference path.
pub const PATH_PREFIX: &str = "/en/hymn/";

/// Query suffix that marks the simplified-Chinese variant of a Chinese hymn.
pub const SIMPLIFIED_SUFFIX: &str = "?gb=1";

static PATH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+)/(c?\d+[a-z]*)(\?gb=1)?").expect("path pattern compiles"));

/// Hymn categories, in the order the auditor walks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HymnType {
    ClassicHymn,
    NewTune,
    NewSong,
    ChildrenSong,
    HowardHigashi,
    Dutch,
    German,
    Chinese,
    ChineseSupplement,
    Cebuano,
    Tagalog,
    French,
    Spanish,
    Korean,
    Japanese,
    Indonesian,
    Farsi,
    Russian,
    Portuguese,
    BeFilled,
}

impl HymnType {
    pub const ALL: [HymnType; 20] = [
        HymnType::ClassicHymn,
        HymnType::NewTune,
        HymnType::NewSong,
        HymnType::ChildrenSong,
        HymnType::HowardHigashi,
        HymnType::Dutch,
        HymnType::German,
        HymnType::Chinese,
        HymnType::ChineseSupplement,
        HymnType::Cebuano,
        HymnType::Tagalog,
        HymnType::French,
        HymnType::Spanish,
        HymnType::Korean,
        HymnType::Japanese,
        HymnType::Indonesian,
        HymnType::Farsi,
        HymnType::Russian,
        HymnType::Portuguese,
        HymnType::BeFilled,
    ];

    /// External short code, as stored in `HYMN_TYPE` and used in paths.
    pub fn code(self) -> &'static str {
        match self {
            HymnType::ClassicHymn => "h",
            HymnType::NewTune => "nt",
            HymnType::NewSong => "ns",
            HymnType::ChildrenSong => "c",
            HymnType::HowardHigashi => "lb",
            HymnType::Dutch => "hd",
            HymnType::German => "de",
            HymnType::Chinese => "ch",
            HymnType::ChineseSupplement => "ts",
            HymnType::Cebuano => "cb",
            HymnType::Tagalog => "ht",
            HymnType::French => "fr",
            HymnType::Spanish => "S",
            HymnType::Korean => "K",
            HymnType::Japanese => "J",
            HymnType::Indonesian => "I",
            HymnType::Farsi => "F",
            HymnType::Russian => "R",
            HymnType::Portuguese => "pt",
            HymnType::BeFilled => "bf",
        }
    }

    pub fn from_code(code: &str) -> Result<HymnType> {
        // "T" is the older Tagalog code still found in some paths.
        if code == "T" {
            return Ok(HymnType::Tagalog);
        }
        HymnType::ALL
            .iter()
            .copied()
            .find(|t| t.code() == code)
            .ok_or_else(|| HymnalError::UnknownHymnType(code.to_string()))
    }

    /// Upper-snake name used in audit messages.
    pub fn name(self) -> &'static str {
        match self {
            HymnType::ClassicHymn => "CLASSIC_HYMN",
            HymnType::NewTune => "NEW_TUNE",
            HymnType::NewSong => "NEW_SONG",
            HymnType::ChildrenSong => "CHILDREN_SONG",
            HymnType::HowardHigashi => "HOWARD_HIGASHI",
            HymnType::Dutch => "DUTCH",
            HymnType::German => "GERMAN",
            HymnType::Chinese => "CHINESE",
            HymnType::ChineseSupplement => "CHINESE_SUPPLEMENT",
            HymnType::Cebuano => "CEBUANO",
            HymnType::Tagalog => "TAGALOG",
            HymnType::French => "FRENCH",
            HymnType::Spanish => "SPANISH",
            HymnType::Korean => "KOREAN",
            HymnType::Japanese => "JAPANESE",
            HymnType::Indonesian => "INDONESIAN",
            HymnType::Farsi => "FARSI",
            HymnType::Russian => "RUSSIAN",
            HymnType::Portuguese => "PORTUGUESE",
            HymnType::BeFilled => "BE_FILLED",
        }
    }
}

impl fmt::Display for HymnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HymnKey {
    pub hymn_type: HymnType,
    pub number: String,
    pub query_suffix: String,
}

impl HymnKey {
    /// Build a key, folding a missing query suffix into `""`.
    pub fn new(hymn_type: HymnType, number: impl Into<String>, query_suffix: Option<&str>) -> Self {
        Self {
            hymn_type,
            number: number.into(),
            query_suffix: query_suffix.unwrap_or_default().to_string(),
        }
    }

    /// `{code}/{number}{suffix}`, the inverse of [`parse_path`].
    pub fn to_path(&self) -> String {
        format!(
            "{}/{}{}",
            self.hymn_type.code(),
            self.number,
            self.query_suffix
        )
    }

    /// Full wire path, including the `/en/hymn/` prefix.
    pub fn to_wire_path(&self) -> String {
        format!("{}{}", PATH_PREFIX, self.to_path())
    }
}

impl fmt::Display for HymnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}

/// Parse a reference path (with or without the `/en/hymn/` prefix) into a key.
pub fn parse_path(path: &str) -> Result<HymnKey> {
    let stripped = path.strip_prefix(PATH_PREFIX).unwrap_or(path);
    let captures = PATH_PATTERN
        .captures(stripped)
        .ok_or_else(|| HymnalError::InvalidPath(path.to_string()))?;

    let hymn_type = HymnType::from_code(&captures[1])?;
    let number = captures[2].to_string();
    let query_suffix = captures.get(3).map(|m| m.as_str());

    Ok(HymnKey::new(hymn_type, number, query_suffix))
}
