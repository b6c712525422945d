//! Error taxonomy for loading, merging, and auditing the hymnal corpus.
//!
//! Every variant is fatal except where the caller explicitly downgrades it;
//! the command layer wraps these in `anyhow` with extra context.

use thiserror::Error;

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, HymnalError>;

#[derive(Error, Debug)]
pub enum HymnalError {
    /// A reference path did not match `<type>/<number>[?gb=1]`.
    #[error("invalid hymn path: {0}")]
    InvalidPath(String),

    /// Short code is not a known hymn type.
    #[error("unknown hymn type code: {0}")]
    UnknownHymnType(String),

    /// Russian HTML carried verse markers out of order.
    #[error("verse numbers not consecutive for {hymn}: expected {expected}, found {found}")]
    NonConsecutiveVerse {
        hymn: String,
        expected: u32,
        found: String,
    },

    /// Russian HTML had no element under `<body>`.
    #[error("empty html body for {0}")]
    EmptyBody(String),

    /// A stored JSON blob failed to parse.
    #[error("malformed {field} json for {hymn}: {message}")]
    MalformedJson {
        hymn: String,
        field: &'static str,
        message: String,
    },

    #[error("{0} has an empty title")]
    EmptyTitle(String),

    #[error("{key} has a {graph} self-reference")]
    SelfReference { key: String, graph: &'static str },

    /// A component of one key: the hymn references something that is not there.
    #[error("{graph} set with only 1 key is a dangling reference, which needs fixing: {component}")]
    DanglingComponent {
        graph: &'static str,
        component: String,
    },

    /// A hymn's references straddle more than one partial component.
    #[error("{graph} keys {keys} were not in a unique set")]
    AmbiguousComponent { graph: &'static str, keys: String },

    #[error("{component} has too many instances of {hymn_type} ({actual} > {allowed})")]
    TypeFrequencyViolation {
        component: String,
        hymn_type: String,
        actual: usize,
        allowed: usize,
    },

    #[error("{component} has incompatible {graph} types: {first} and {second}")]
    TypeIncompatibility {
        graph: &'static str,
        component: String,
        first: String,
        second: String,
    },

    /// The post-write smoke probe saw data of the wrong shape.
    #[error("probe failed: {0}")]
    ProbeFailed(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
