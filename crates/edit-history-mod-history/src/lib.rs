/// Snapshot history storage for editable text regions.
///
/// Provides a `HistoryStack` of content+selection snapshots with a movable
/// cursor, plus an embedded key-value store (redb) and a JSON file format
/// so a document's history can survive across sessions.
pub mod config;
pub mod file;
pub mod persistence;
pub mod snapshot;
pub mod stack;

pub use config::HistoryConfig;
pub use file::{HistoryFile, SnapshotRecord};
pub use persistence::PersistenceLayer;
pub use snapshot::Snapshot;
pub use stack::HistoryStack;
