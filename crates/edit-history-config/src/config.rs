/// Application configuration: load, save, and sanitize.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Smallest idle window accepted, in milliseconds.
const MIN_IDLE_TIMEOUT_MS: u64 = 50;

/// Top-level configuration for the edit history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Milliseconds without key activity before the next key press starts
    /// a new undo step.
    pub idle_timeout_ms: u64,
    /// Maximum number of snapshots kept per document. Oldest are evicted first.
    pub max_history_depth: usize,
    /// Whether history is saved to the on-disk store between sessions.
    pub persist_history: bool,
    /// Directory for the history database. Empty = resolved default.
    pub data_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: 1000,
            max_history_depth: 1000,
            persist_history: false,
            data_dir: String::new(),
        }
    }
}

impl AppConfig {
    /// Returns the config file path: exe directory + `edit-history.json`,
    /// falling back to the user's config directory.
    pub fn config_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|d| d.join("edit-history.json")))
            .or_else(|| dirs::config_dir().map(|d| d.join("edit-history").join("edit-history.json")))
            .unwrap_or_else(|| PathBuf::from("edit-history.json"))
    }

    /// Loads config from `path`, creating a default file if it doesn't exist.
    /// Returns defaults on any error (missing file, parse error, etc.).
    pub fn load_or_create(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match serde_json::from_str::<AppConfig>(&contents) {
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
            // Don't overwrite a broken file
            Self::default()
        } else {
            let config = Self::default();
            if let Err(e) = config.save(path) {
                tracing::warn!("Failed to create default config at {}: {e}", path.display());
            }
            config
        }
    }

    /// Saves config to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// The configured data directory, or `None` to use the default location.
    pub fn data_dir(&self) -> Option<PathBuf> {
        if self.data_dir.trim().is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.data_dir))
        }
    }

    /// Clamps values to valid ranges.
    pub fn sanitize(&mut self) {
        self.idle_timeout_ms = self.idle_timeout_ms.max(MIN_IDLE_TIMEOUT_MS);
        self.max_history_depth = self.max_history_depth.max(1);
    }
}
