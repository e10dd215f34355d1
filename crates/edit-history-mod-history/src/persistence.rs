/// Disk persistence layer backed by redb.
///
/// Uses a single redb database file with two tables:
/// - `snapshots`: stores serialized `Snapshot` entries keyed by `"{doc_id}#{index:020}"`
/// - `meta`: stores per-document metadata (length and cursor) keyed by `doc_id`
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};

use crate::snapshot::Snapshot;
use crate::stack::HistoryStack;

/// Snapshot table: composite string key → bincode-serialized Snapshot.
const SNAPSHOT_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("snapshots");

/// Metadata table: doc_id → bincode-serialized DocumentMeta.
const META_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("meta");

/// Per-document metadata persisted alongside the snapshots.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct DocumentMeta {
    len: u64,
    cursor: Option<u64>,
}

/// Formats a snapshot table key from doc_id and position in the stack.
///
/// The index is zero-padded to 20 digits to keep lexicographic ordering
/// in the B-tree equal to stack order.
fn snapshot_key(doc_id: &str, index: usize) -> String {
    format!("{doc_id}#{index:020}")
}

/// Returns the exclusive range bounds for all snapshots of a document.
///
/// `$` is one ASCII codepoint above the `#` separator, so the range holds
/// exactly the entries for the given doc_id.
fn doc_range(doc_id: &str) -> (String, String) {
    let start = format!("{doc_id}#");
    let end = format!("{doc_id}$");
    (start, end)
}

/// Persistence layer for snapshot history backed by redb.
///
/// Shared across documents via `Arc<PersistenceLayer>`.
pub struct PersistenceLayer {
    db: Database,
}

impl std::fmt::Debug for PersistenceLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceLayer").finish()
    }
}

impl PersistenceLayer {
    /// Opens or creates the history database in the given directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the database
    /// cannot be opened.
    pub fn open(data_dir: &Path) -> Result<Arc<Self>> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let db_path = data_dir.join("history.redb");
        let db = Database::create(&db_path)
            .with_context(|| format!("Failed to open history database: {}", db_path.display()))?;

        // Ensure tables exist
        let write_txn = db
            .begin_write()
            .context("Failed to begin initial write transaction")?;
        {
            let _ = write_txn
                .open_table(SNAPSHOT_TABLE)
                .context("Failed to create snapshots table")?;
            let _ = write_txn
                .open_table(META_TABLE)
                .context("Failed to create meta table")?;
        }
        write_txn
            .commit()
            .context("Failed to commit initial transaction")?;

        Ok(Arc::new(Self { db }))
    }

    /// Replaces the stored history of a document with `stack`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write transaction fails.
    pub fn save_history(&self, doc_id: &str, stack: &HistoryStack) -> Result<()> {
        let meta = DocumentMeta {
            len: stack.len() as u64,
            cursor: stack.cursor().map(|c| c as u64),
        };
        let meta_bytes = bincode::serialize(&meta).context("Failed to serialize document metadata")?;

        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        remove_snapshots(&write_txn, doc_id)?;
        {
            let mut table = write_txn
                .open_table(SNAPSHOT_TABLE)
                .context("Failed to open snapshots table")?;
            for (index, snapshot) in stack.snapshots().iter().enumerate() {
                let key = snapshot_key(doc_id, index);
                let bytes = bincode::serialize(snapshot).context("Failed to serialize snapshot")?;
                table
                    .insert(key.as_str(), bytes.as_slice())
                    .context("Failed to insert snapshot")?;
            }
        }
        {
            let mut meta_table = write_txn
                .open_table(META_TABLE)
                .context("Failed to open meta table")?;
            meta_table
                .insert(doc_id, meta_bytes.as_slice())
                .context("Failed to insert metadata")?;
        }
        write_txn
            .commit()
            .context("Failed to commit write transaction")?;

        tracing::debug!(doc_id, len = stack.len(), "saved history");
        Ok(())
    }

    /// Loads the stored history of a document.
    ///
    /// Returns `None` if no history exists for this document.
    ///
    /// # Errors
    ///
    /// Returns an error if the read transaction or deserialization fails.
    pub fn load_history(&self, doc_id: &str, max_depth: usize) -> Result<Option<HistoryStack>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;

        let meta = {
            let table = read_txn
                .open_table(META_TABLE)
                .context("Failed to open meta table")?;
            match table.get(doc_id).context("Failed to read metadata")? {
                Some(guard) => bincode::deserialize::<DocumentMeta>(guard.value())
                    .context("Failed to deserialize metadata")?,
                None => return Ok(None),
            }
        };

        let table = read_txn
            .open_table(SNAPSHOT_TABLE)
            .context("Failed to open snapshots table")?;
        let (start, end) = doc_range(doc_id);
        let mut snapshots = Vec::with_capacity(meta.len as usize);
        for entry in table
            .range::<&str>(start.as_str()..end.as_str())
            .context("Failed to range query snapshots table")?
        {
            let (_, value_guard) = entry.context("Failed to read snapshot entry")?;
            let snapshot: Snapshot = bincode::deserialize(value_guard.value())
                .context("Failed to deserialize snapshot")?;
            snapshots.push(snapshot);
        }

        if snapshots.len() as u64 != meta.len {
            tracing::warn!(
                doc_id,
                expected = meta.len,
                found = snapshots.len(),
                "stored history length mismatch"
            );
        }

        let cursor = meta.cursor.map(|c| c as usize);
        Ok(Some(HistoryStack::restore(snapshots, cursor, max_depth)))
    }

    /// Counts the number of snapshots stored for a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the read transaction fails.
    pub fn count_snapshots(&self, doc_id: &str) -> Result<usize> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(SNAPSHOT_TABLE)
            .context("Failed to open snapshots table")?;

        let (start, end) = doc_range(doc_id);
        let count = table
            .range::<&str>(start.as_str()..end.as_str())
            .context("Failed to range query for count")?
            .count();

        Ok(count)
    }

    /// Removes all snapshots and metadata for a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the write transaction fails.
    pub fn delete_document(&self, doc_id: &str) -> Result<()> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        remove_snapshots(&write_txn, doc_id)?;
        {
            let mut meta_table = write_txn
                .open_table(META_TABLE)
                .context("Failed to open meta table")?;
            let _ = meta_table.remove(doc_id);
        }
        write_txn.commit().context("Failed to commit deletion")?;
        Ok(())
    }

    /// Lists all document IDs that have stored history.
    ///
    /// # Errors
    ///
    /// Returns an error if the read transaction fails.
    pub fn list_documents(&self) -> Result<Vec<String>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(META_TABLE)
            .context("Failed to open meta table")?;

        let mut doc_ids = Vec::new();
        for entry in table.iter().context("Failed to iterate meta table")? {
            let (key_guard, _) = entry.context("Failed to read meta entry")?;
            doc_ids.push(key_guard.value().to_string());
        }
        Ok(doc_ids)
    }
}

/// Removes every snapshot row of `doc_id` inside an open write transaction.
fn remove_snapshots(write_txn: &WriteTransaction, doc_id: &str) -> Result<()> {
    let mut table = write_txn
        .open_table(SNAPSHOT_TABLE)
        .context("Failed to open snapshots table")?;

    let (start, end) = doc_range(doc_id);
    let keys_to_remove: Vec<String> = table
        .range::<&str>(start.as_str()..end.as_str())
        .context("Failed to range query for deletion")?
        .filter_map(|entry| entry.ok().map(|(k, _)| k.value().to_string()))
        .collect();

    for key in &keys_to_remove {
        table
            .remove(key.as_str())
            .context("Failed to remove snapshot")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_test_db() -> (Arc<PersistenceLayer>, TempDir) {
        let dir = TempDir::new().expect("create temp dir");
        let pl = PersistenceLayer::open(dir.path()).expect("open db");
        (pl, dir)
    }

    fn stack_of(texts: &[&str]) -> HistoryStack {
        let entries = texts
            .iter()
            .map(|t| Snapshot::with_caret(*t, t.len()))
            .collect();
        HistoryStack::from_snapshots(entries, 100)
    }

    #[test]
    fn test_open_creates_database() {
        let (pl, _dir) = open_test_db();
        let docs = pl.list_documents().expect("list docs");
        assert!(docs.is_empty());
    }

    #[test]
    fn test_save_and_load_history() {
        let (pl, _dir) = open_test_db();
        let mut stack = stack_of(&["a", "ab", "abc"]);
        stack.back();
        pl.save_history("doc", &stack).expect("save");

        let loaded = pl.load_history("doc", 100).expect("load").expect("exists");
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.cursor(), Some(1));
        assert_eq!(loaded.current().map(|s| s.content.as_str()), Some("ab"));
        assert_eq!(loaded.snapshots(), stack.snapshots());
    }

    #[test]
    fn test_load_missing_document_is_none() {
        let (pl, _dir) = open_test_db();
        assert!(pl.load_history("nope", 100).expect("load").is_none());
    }

    #[test]
    fn test_save_replaces_previous_history() {
        let (pl, _dir) = open_test_db();
        pl.save_history("doc", &stack_of(&["a", "b", "c", "d"]))
            .expect("save");
        pl.save_history("doc", &stack_of(&["x"])).expect("overwrite");

        assert_eq!(pl.count_snapshots("doc").expect("count"), 1);
        let loaded = pl.load_history("doc", 100).expect("load").expect("exists");
        assert_eq!(loaded.snapshots()[0].content, "x");
    }

    #[test]
    fn test_save_empty_stack() {
        let (pl, _dir) = open_test_db();
        pl.save_history("empty", &HistoryStack::new(10))
            .expect("save");

        let loaded = pl.load_history("empty", 10).expect("load").expect("exists");
        assert!(loaded.is_empty());
        assert!(loaded.current().is_none());
    }

    #[test]
    fn test_load_applies_max_depth() {
        let (pl, _dir) = open_test_db();
        pl.save_history("doc", &stack_of(&["a", "b", "c", "d", "e"]))
            .expect("save");

        let loaded = pl.load_history("doc", 2).expect("load").expect("exists");
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.max_depth(), 2);
        assert_eq!(loaded.current().map(|s| s.content.as_str()), Some("e"));
    }

    #[test]
    fn test_delete_document() {
        let (pl, _dir) = open_test_db();
        pl.save_history("delete-doc", &stack_of(&["a"]))
            .expect("save");

        pl.delete_document("delete-doc").expect("delete");

        assert_eq!(pl.count_snapshots("delete-doc").expect("count"), 0);
        assert!(pl.load_history("delete-doc", 10).expect("load").is_none());
    }

    #[test]
    fn test_multi_document_isolation() {
        let (pl, _dir) = open_test_db();

        pl.save_history("doc-a", &stack_of(&["a1", "a2"]))
            .expect("save a");
        pl.save_history("doc-b", &stack_of(&["b1"]))
            .expect("save b");

        assert_eq!(pl.count_snapshots("doc-a").expect("count a"), 2);
        assert_eq!(pl.count_snapshots("doc-b").expect("count b"), 1);

        pl.delete_document("doc-a").expect("delete a");
        assert_eq!(pl.count_snapshots("doc-a").expect("count a"), 0);
        assert_eq!(pl.count_snapshots("doc-b").expect("count b"), 1);
    }

    #[test]
    fn test_list_documents() {
        let (pl, _dir) = open_test_db();

        pl.save_history("doc-x", &stack_of(&["x"])).expect("save");
        pl.save_history("doc-y", &stack_of(&["y"])).expect("save");

        let mut docs = pl.list_documents().expect("list");
        docs.sort();
        assert_eq!(docs, vec!["doc-x", "doc-y"]);
    }

    #[test]
    fn test_reopen_database_preserves_data() {
        let dir = TempDir::new().expect("create temp dir");

        {
            let pl = PersistenceLayer::open(dir.path()).expect("open");
            pl.save_history("doc", &stack_of(&["persistent"]))
                .expect("save");
        }

        {
            let pl = PersistenceLayer::open(dir.path()).expect("reopen");
            let loaded = pl.load_history("doc", 10).expect("load").expect("exists");
            assert_eq!(loaded.snapshots()[0].content, "persistent");
            assert_eq!(loaded.snapshots()[0].start, Some(10));
        }
    }
}
