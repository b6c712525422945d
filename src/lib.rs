//! # Hymnal Merge
//!
//! Offline migration tool for a multi-language hymnal SQLite database.
//!
//! It loads the primary hymnal store (`song_data`) and a separate Russian
//! store (`hymns`, one HTML document per song), weaves each Russian hymn into
//! the translation clique of its English original, audits the combined
//! cross-reference graphs, and rewrites the primary store.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────┐
//! │  song_data  │──▶│  hymnal  │──┐
//! └─────────────┘   └──────────┘  │   ┌───────┐   ┌───────┐   ┌────────────┐
//!                                 ├──▶│ merge │──▶│ audit │──▶│ write+probe│
//! ┌─────────────┐   ┌──────────┐  │   └───────┘   └───────┘   └────────────┘
//! │   hymns     │──▶│ russian  │──┘
//! └─────────────┘   └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! hymnal-merge init                 # create tables in both stores
//! hymnal-merge audit                # check the primary store as-is
//! hymnal-merge merge --dry-run      # merge + audit without writing
//! hymnal-merge merge                # merge, audit, rewrite, probe
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`key`] | Hymn types, keys, and path parsing |
//! | [`models`] | Hymn records, references, lyrics |
//! | [`references`] | Reference-list JSON codec |
//! | [`russian`] | Russian HTML parser and loader |
//! | [`hymnal`] | Primary store load / rewrite |
//! | [`merge`] | Russian clique merge |
//! | [`audit`] | Graph audit |
//! | [`probe`] | Post-write smoke test |
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema creation |

pub mod audit;
pub mod config;
pub mod db;
pub mod error;
pub mod hymnal;
pub mod key;
pub mod merge;
pub mod merge_cmd;
pub mod migrate;
pub mod models;
pub mod probe;
pub mod references;
pub mod russian;
