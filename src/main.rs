//! # Hymnal Merge CLI (`hymnal-merge`)
//!
//! ## Usage
//!
//! ```bash
//! hymnal-merge --config ./config/hymnal.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `hymnal-merge init` | Create the `song_data` and `hymns` tables if missing |
//! | `hymnal-merge audit` | Audit the primary store's reference graphs |
//! | `hymnal-merge merge` | Merge the Russian store into the primary store |
//! | `hymnal-merge probe` | Run the post-write smoke probe |
//!
//! Logs go to stderr and honour `RUST_LOG`; summaries go to stdout.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use hymnal_merge::{audit, config, merge_cmd, migrate, probe};

/// Hymnal Merge: weave the Russian hymnal into the multi-language hymnal
/// database and audit its cross-reference graphs.
#[derive(Parser)]
#[command(
    name = "hymnal-merge",
    about = "Merge the Russian hymnal into the hymnal database and audit its cross-references",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/hymnal.toml`.
    #[arg(long, global = true, default_value = "./config/hymnal.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the `song_data` and `hymns` tables in the configured stores.
    ///
    /// Idempotent.
    Init,

    /// Load the primary store and audit it without changing anything.
    Audit,

    /// Merge the Russian store into the primary store.
    ///
    /// Loads both stores, links every Russian hymn into the translation
    /// clique of its English original, and audits the result. Unless
    /// `--dry-run` is given, the primary store is then rewritten, its
    /// `user_version` stamped, and the smoke probe run.
    Merge {
        /// Merge and audit only; do not write the primary store.
        #[arg(long)]
        dry_run: bool,
    },

    /// Check a handful of well-known hymns in the primary store.
    Probe,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Audit => {
            audit::run_audit(&cfg).await?;
        }
        Commands::Merge { dry_run } => {
            merge_cmd::run_merge(&cfg, dry_run).await?;
        }
        Commands::Probe => {
            probe::run_probe_cmd(&cfg).await?;
        }
    }

    Ok(())
}
