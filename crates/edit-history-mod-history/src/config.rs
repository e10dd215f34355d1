/// Configuration and utility functions for the history system.
use std::collections::hash_map::DefaultHasher;
use std::ffi::OsString;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::Duration;

use edit_history_config::AppConfig;

/// Idle window in milliseconds after which the next key press starts a
/// new undo step.
const DEFAULT_IDLE_TIMEOUT_MS: u64 = 1000;

/// Maximum number of snapshots kept per document.
const DEFAULT_MAX_HISTORY_DEPTH: usize = 1000;

/// Configuration for the history system.
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Idle window in milliseconds.
    pub idle_timeout_ms: u64,
    /// Max snapshots per document.
    pub max_history_depth: usize,
    /// Root directory for the persistence database.
    pub data_dir: PathBuf,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: DEFAULT_IDLE_TIMEOUT_MS,
            max_history_depth: DEFAULT_MAX_HISTORY_DEPTH,
            data_dir: resolve_data_dir(),
        }
    }
}

impl HistoryConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }
}

impl From<&AppConfig> for HistoryConfig {
    fn from(app: &AppConfig) -> Self {
        Self {
            idle_timeout_ms: app.idle_timeout_ms,
            max_history_depth: app.max_history_depth,
            data_dir: app.data_dir().unwrap_or_else(resolve_data_dir),
        }
    }
}

/// Environment variable that overrides the history store location.
pub const DATA_DIR_ENV: &str = "EDIT_HISTORY_DATA_DIR";

/// Directory holding the history store: `EDIT_HISTORY_DATA_DIR` when set
/// and non-blank, otherwise `.data/` next to the executable.
pub fn resolve_data_dir() -> PathBuf {
    data_dir_from(std::env::var_os(DATA_DIR_ENV))
}

fn data_dir_from(env_value: Option<OsString>) -> PathBuf {
    match env_value {
        Some(dir) if !dir.to_string_lossy().trim().is_empty() => PathBuf::from(dir),
        _ => {
            let exe = std::env::current_exe().unwrap_or_else(|_| PathBuf::from("."));
            exe.parent().unwrap_or(Path::new(".")).join(".data")
        }
    }
}

/// Store key for the document a script edits.
///
/// The readable part is the file stem reduced to `[A-Za-z0-9_-]`, so a key
/// never contains the store's `#`/`$` range delimiters. The suffix hashes
/// the canonical path to keep same-named files in different folders apart.
pub fn doc_id_for_path(path: &Path) -> String {
    let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let mut hasher = DefaultHasher::new();
    canonical.hash(&mut hasher);

    let stem: String = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = if stem.is_empty() { "doc" } else { stem.as_str() };
    format!("{stem}-{:08x}", hasher.finish() as u32)
}
