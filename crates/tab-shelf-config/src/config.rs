/// Shelf configuration: load, save, and sanitize.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::scope::StorageScope;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "TAB_SHELF_DATA_DIR";

/// Upper bound for the undo/redo history length.
const MAX_HISTORY_LIMIT: usize = 1000;

/// Top-level tab shelf configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfConfig {
    /// Number of undo/redo snapshots kept (1..=1000).
    pub max_history_length: usize,
    /// Storage area used when an operation does not name one.
    pub default_scope: StorageScope,
    /// Directory for the storage database. Empty = platform data directory.
    pub data_dir: String,
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            max_history_length: 30,
            default_scope: StorageScope::Local,
            data_dir: String::new(),
        }
    }
}

impl ShelfConfig {
    /// Returns the config file path: exe directory + `tab-shelf.json`.
    pub fn config_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|d| d.join("tab-shelf.json")))
            .unwrap_or_else(|| PathBuf::from("tab-shelf.json"))
    }

    /// Loads config from `path`, creating a default file if it doesn't exist.
    /// Returns defaults on any error (missing file, parse error, etc.).
    pub fn load_or_create(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match serde_json::from_str::<ShelfConfig>(&contents) {
                    Ok(mut config) => {
                        config.sanitize();
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {}: {e}", path.display());
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {}: {e}", path.display());
                }
            }
            // Broken files are left on disk untouched
            Self::default()
        } else {
            let config = Self::default();
            if let Err(e) = config.save(path) {
                tracing::warn!("Failed to create default config at {}: {e:#}", path.display());
            }
            config
        }
    }

    /// Saves config to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config: {}", path.display()))
    }

    /// Clamps values to valid ranges.
    pub fn sanitize(&mut self) {
        self.max_history_length = self.max_history_length.clamp(1, MAX_HISTORY_LIMIT);
        self.data_dir = self.data_dir.trim().to_string();
    }

    /// Resolves the directory holding the storage database.
    ///
    /// Resolution order:
    /// 1. `TAB_SHELF_DATA_DIR` environment variable
    /// 2. `data_dir` (if non-empty)
    /// 3. Platform data directory + `tab-shelf`
    /// 4. `.data/` in the working directory
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.is_empty() {
                return PathBuf::from(dir);
            }
        }
        if !self.data_dir.is_empty() {
            return PathBuf::from(&self.data_dir);
        }
        dirs::data_dir()
            .map(|d| d.join("tab-shelf"))
            .unwrap_or_else(|| PathBuf::from(".data"))
    }
}
