//! JSON wire format of the `SONG_META_DATA_LANGUAGES` and
//! `SONG_META_DATA_Relevant` columns.
//!
//! ```text
//! {"name":"Languages","data":[{"value":"Chinese","path":"/en/hymn/ch/50"}]}
//! ```
//!
//! An empty set is stored as `NULL`, never as `{"data": []}`.

use serde::{Deserialize, Serialize};

use crate::error::{HymnalError, Result};
use crate::key::parse_path;
use crate::models::{Reference, ReferenceSet};

/// `name` written into the languages blob.
pub const LANGUAGES_NAME: &str = "Languages";

/// `name` written into the relevant blob.
pub const RELEVANT_NAME: &str = "Relevant";

#[derive(Debug, Serialize, Deserialize)]
struct ReferenceList {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    data: Vec<Datum>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Datum {
    value: String,
    path: String,
}

/// Decode a stored reference blob. `NULL`, `""`, and JSON `null` all decode
/// to the empty set.
///
/// `hymn` and `field` only label the error.
pub fn parse_references(
    json: Option<&str>,
    hymn: &str,
    field: &'static str,
) -> Result<ReferenceSet> {
    let json = match json.map(str::trim) {
        None | Some("") => return Ok(ReferenceSet::new()),
        Some(json) => json,
    };

    let list: Option<ReferenceList> =
        serde_json::from_str(json).map_err(|e| HymnalError::MalformedJson {
            hymn: hymn.to_string(),
            field,
            message: e.to_string(),
        })?;

    let mut references = ReferenceSet::new();
    for datum in list.map(|l| l.data).unwrap_or_default() {
        references.insert(Reference::new(datum.value, parse_path(&datum.path)?));
    }
    Ok(references)
}

/// Encode a reference set under `name`, or `None` when the set is empty.
pub fn serialize_references(name: &str, references: &ReferenceSet) -> Option<String> {
    if references.is_empty() {
        return None;
    }

    let list = ReferenceList {
        name: Some(name.to_string()),
        data: references
            .iter()
            .map(|r| Datum {
                value: r.text.clone(),
                path: r.key.to_wire_path(),
            })
            .collect(),
    };
    serde_json::to_string(&list).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{HymnKey, HymnType, SIMPLIFIED_SUFFIX};

    fn sample() -> ReferenceSet {
        [
            Reference::new("English", HymnKey::new(HymnType::ClassicHymn, "200", None)),
            Reference::new(
                "诗歌(简)",
                HymnKey::new(HymnType::Chinese, "50", Some(SIMPLIFIED_SUFFIX)),
            ),
            Reference::new("Tagalog", HymnKey::new(HymnType::Tagalog, "c333", None)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_serialize_shape() {
        let refs: ReferenceSet = [Reference::new(
            "Russian",
            HymnKey::new(HymnType::Russian, "1", None),
        )]
        .into_iter()
        .collect();
        assert_eq!(
            serialize_references(LANGUAGES_NAME, &refs).as_deref(),
            Some(r#"{"name":"Languages","data":[{"value":"Russian","path":"/en/hymn/R/1"}]}"#)
        );
    }

    #[test]
    fn test_empty_set_is_null() {
        assert_eq!(serialize_references(RELEVANT_NAME, &ReferenceSet::new()), None);
    }

    #[test]
    fn test_round_trip() {
        let refs = sample();
        let json = serialize_references(LANGUAGES_NAME, &refs);
        let parsed = parse_references(json.as_deref(), "h/200", "languages").unwrap();
        assert_eq!(parsed, refs);
    }

    #[test]
    fn test_null_forms_parse_empty() {
        for blob in [None, Some(""), Some("  "), Some("null")] {
            assert!(parse_references(blob, "h/1", "relevant").unwrap().is_empty());
        }
    }

    #[test]
    fn test_duplicate_entries_collapse() {
        let json = r#"{"name":"Relevant","data":[
            {"value":"New Tune","path":"/en/hymn/nt/720"},
            {"value":"New Tune","path":"/en/hymn/nt/720"}]}"#;
        assert_eq!(parse_references(Some(json), "h/720", "relevant").unwrap().len(), 1);
    }

    #[test]
    fn test_missing_data_is_empty() {
        let refs = parse_references(Some(r#"{"name":"Languages"}"#), "h/1", "languages").unwrap();
        assert!(refs.is_empty());
    }

    #[test]
    fn test_malformed_blob() {
        match parse_references(Some("{not json"), "h/9", "languages") {
            Err(HymnalError::MalformedJson { hymn, field, .. }) => {
                assert_eq!(hymn, "h/9");
                assert_eq!(field, "languages");
            }
            other => panic!("expected MalformedJson, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_path_inside_blob() {
        let json = r#"{"data":[{"value":"English","path":"/en/hymn/"}]}"#;
        assert!(matches!(
            parse_references(Some(json), "h/1", "languages"),
            Err(HymnalError::InvalidPath(_))
        ));
    }
}
