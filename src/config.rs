use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub migration: MigrationConfig,
}

/// Locations of the two SQLite stores.
#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    /// Primary multi-language store (`song_data`). Rewritten by `merge`.
    pub hymnal: PathBuf,
    /// Russian source store (`hymns`). Only ever read.
    pub russian: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MigrationConfig {
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub user_version: Option<u32>,
    #[serde(default = "default_probe")]
    pub probe: bool,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            user_version: None,
            probe: default_probe(),
        }
    }
}

fn default_probe() -> bool {
    true
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.migration.user_version == Some(0) {
        anyhow::bail!("migration.user_version must be > 0");
    }

    if config.db.hymnal == config.db.russian {
        anyhow::bail!(
            "db.hymnal and db.russian must be different stores (both are '{}')",
            config.db.hymnal.display()
        );
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let file = write_config(
            r#"
            [db]
            hymnal = "data/hymnal.sqlite"
            russian = "data/russian.sqlite"
            "#,
        );
        let config = load_config(file.path()).unwrap();
        assert!(!config.migration.dry_run);
        assert!(config.migration.probe);
        assert_eq!(config.migration.user_version, None);
    }

    #[test]
    fn test_migration_section() {
        let file = write_config(
            r#"
            [db]
            hymnal = "a.sqlite"
            russian = "b.sqlite"

            [migration]
            dry_run = true
            user_version = 19
            probe = false
            "#,
        );
        let config = load_config(file.path()).unwrap();
        assert!(config.migration.dry_run);
        assert!(!config.migration.probe);
        assert_eq!(config.migration.user_version, Some(19));
    }

    #[test]
    fn test_zero_user_version_rejected() {
        let file = write_config(
            r#"
            [db]
            hymnal = "a.sqlite"
            russian = "b.sqlite"
            [migration]
            user_version = 0
            "#,
        );
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("user_version"));
    }

    #[test]
    fn test_same_store_rejected() {
        let file = write_config(
            r#"
            [db]
            hymnal = "same.sqlite"
            russian = "same.sqlite"
            "#,
        );
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/hymnal.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
