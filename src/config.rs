use std::path::{Path, PathBuf};

use anyhow::Context;
use challengeme_core::Database;
use directories::ProjectDirs;

const DB_FILE: &str = "challenges.db";
const DEFAULTS_DIR: &str = "defaults";

/// Where the store lives and where a new store is seeded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub seed_dir: PathBuf,
}

/// Platform data directory for challengeme, e.g. `~/.local/share/challengeme`.
pub fn data_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "challengeme").map(|dirs| dirs.data_dir().to_path_buf())
}

impl Config {
    /// Builds the config from command-line overrides, falling back to the
    /// platform data directory.
    pub fn resolve(db_path: Option<PathBuf>, seed_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        Self::resolve_in(data_dir().as_deref(), db_path, seed_dir)
    }

    fn resolve_in(
        data_dir: Option<&Path>,
        db_path: Option<PathBuf>,
        seed_dir: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let db_path = match db_path {
            Some(path) => path,
            None => data_dir
                .map(|dir| dir.join(DB_FILE))
                .context("Could not determine a data directory; pass --db")?,
        };

        let seed_dir = seed_dir.unwrap_or_else(|| {
            data_dir
                .map(|dir| dir.join(DEFAULTS_DIR))
                .filter(|dir| dir.is_dir())
                .unwrap_or_else(|| PathBuf::from(DEFAULTS_DIR))
        });

        Ok(Self { db_path, seed_dir })
    }

    /// Opens the store, creating the directory that holds it if needed.
    pub fn open_database(&self) -> anyhow::Result<Database> {
        if let Some(parent) = self.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        tracing::debug!(
            "Opening {} (seeds from {})",
            self.db_path.display(),
            self.seed_dir.display()
        );
        Ok(Database::open_at(&self.seed_dir, &self.db_path)?)
    }
}
