//! Durable key-value storage of session log snapshots and feed positions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};

use crate::events::AuditRecord;

use super::error::StorageError;
use super::schema::SCHEMA;

/// Key-value store of whole-log snapshots and feed positions, keyed by
/// session ID.
///
/// The position is the number of feed items the session has processed. It
/// outlives the snapshot: deleting a session's records keeps its position, so
/// a cleared session does not reread what it already acknowledged.
/// Writes replace the previous value; last writer wins.
pub trait LogStorage {
    /// Read the snapshot for `session`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read or the snapshot
    /// cannot be decoded.
    fn get(&self, session: &str) -> Result<Option<Vec<AuditRecord>>, StorageError>;

    /// Read the feed position stored for `session`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn position(&self, session: &str) -> Result<Option<usize>, StorageError>;

    /// Replace the snapshot and the feed position for `session` together.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be encoded or written.
    fn put(
        &mut self,
        session: &str,
        records: &[AuditRecord],
        position: usize,
    ) -> Result<(), StorageError>;

    /// Replace only the feed position for `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn put_position(&mut self, session: &str, position: usize) -> Result<(), StorageError>;

    /// Remove the snapshot for `session`, keeping its feed position.
    /// Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn delete(&mut self, session: &str) -> Result<(), StorageError>;
}

impl<S: LogStorage + ?Sized> LogStorage for Box<S> {
    fn get(&self, session: &str) -> Result<Option<Vec<AuditRecord>>, StorageError> {
        (**self).get(session)
    }

    fn position(&self, session: &str) -> Result<Option<usize>, StorageError> {
        (**self).position(session)
    }

    fn put(
        &mut self,
        session: &str,
        records: &[AuditRecord],
        position: usize,
    ) -> Result<(), StorageError> {
        (**self).put(session, records, position)
    }

    fn put_position(&mut self, session: &str, position: usize) -> Result<(), StorageError> {
        (**self).put_position(session, position)
    }

    fn delete(&mut self, session: &str) -> Result<(), StorageError> {
        (**self).delete(session)
    }
}

/// In-process storage, lost on exit.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    snapshots: HashMap<String, Vec<AuditRecord>>,
    positions: HashMap<String, usize>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions with a snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether no session has a snapshot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl LogStorage for MemoryStorage {
    fn get(&self, session: &str) -> Result<Option<Vec<AuditRecord>>, StorageError> {
        Ok(self.snapshots.get(session).cloned())
    }

    fn position(&self, session: &str) -> Result<Option<usize>, StorageError> {
        Ok(self.positions.get(session).copied())
    }

    fn put(
        &mut self,
        session: &str,
        records: &[AuditRecord],
        position: usize,
    ) -> Result<(), StorageError> {
        self.snapshots.insert(session.to_string(), records.to_vec());
        self.positions.insert(session.to_string(), position);
        Ok(())
    }

    fn put_position(&mut self, session: &str, position: usize) -> Result<(), StorageError> {
        self.positions.insert(session.to_string(), position);
        Ok(())
    }

    fn delete(&mut self, session: &str) -> Result<(), StorageError> {
        self.snapshots.remove(session);
        Ok(())
    }
}

fn to_sql_count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

const UPSERT_POSITION: &str =
    "INSERT OR REPLACE INTO session_positions (session_id, position, updated_at) VALUES (?1, ?2, ?3)";

/// `SQLite`-backed storage holding one JSON snapshot per session.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteStorage {
    /// Open storage at the specified path.
    ///
    /// Creates parent directories if they don't exist and initializes the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema cannot be applied.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| StorageError::StoreDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let conn = Connection::open(&path).map_err(|source| StorageError::OpenStore {
            path: path.clone(),
            source,
        })?;
        conn.execute_batch(SCHEMA)?;
        tracing::debug!(path = %path.display(), "Opened session log storage");

        Ok(Self {
            conn,
            path: Some(path),
        })
    }

    /// Open an in-memory database for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created or the schema cannot be applied.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn, path: None })
    }

    /// Returns the path to the database, if opened from a file.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Session IDs with a stored snapshot, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn sessions(&self) -> Result<Vec<String>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT session_id FROM session_logs ORDER BY updated_at DESC, session_id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }
}

impl LogStorage for SqliteStorage {
    fn get(&self, session: &str) -> Result<Option<Vec<AuditRecord>>, StorageError> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT records FROM session_logs WHERE session_id = ?1",
                params![session],
                |row| row.get(0),
            )
            .optional()?;

        json.map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(StorageError::from)
    }

    fn position(&self, session: &str) -> Result<Option<usize>, StorageError> {
        let position: Option<i64> = self
            .conn
            .query_row(
                "SELECT position FROM session_positions WHERE session_id = ?1",
                params![session],
                |row| row.get(0),
            )
            .optional()?;
        Ok(position.map(|n| usize::try_from(n).unwrap_or(0)))
    }

    fn put(
        &mut self,
        session: &str,
        records: &[AuditRecord],
        position: usize,
    ) -> Result<(), StorageError> {
        let json = serde_json::to_string(records)?;
        let updated_at = chrono::Utc::now().to_rfc3339();

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO session_logs (session_id, records, record_count, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![session, json, to_sql_count(records.len()), updated_at],
        )?;
        tx.execute(UPSERT_POSITION, params![session, to_sql_count(position), updated_at])?;
        tx.commit()?;
        Ok(())
    }

    fn put_position(&mut self, session: &str, position: usize) -> Result<(), StorageError> {
        let updated_at = chrono::Utc::now().to_rfc3339();
        self.conn.execute(
            UPSERT_POSITION,
            params![session, to_sql_count(position), updated_at],
        )?;
        Ok(())
    }

    fn delete(&mut self, session: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "DELETE FROM session_logs WHERE session_id = ?1",
            params![session],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventDetails, EventKind};
    use chrono::Utc;
    use serde_json::json;

    fn records(session: &str, n: usize) -> Vec<AuditRecord> {
        (0..n)
            .map(|i| {
                AuditRecord::new(
                    Utc::now(),
                    session,
                    EventDetails::from_payload(
                        EventKind::SupervisorStart,
                        &json!({"message": format!("m{i}")}),
                    ),
                )
            })
            .collect()
    }

    #[test]
    fn test_memory_put_get_delete() {
        let mut storage = MemoryStorage::new();
        assert!(storage.get("s1").unwrap().is_none());

        let recs = records("s1", 2);
        storage.put("s1", &recs, 4).unwrap();
        assert_eq!(storage.get("s1").unwrap(), Some(recs));
        assert_eq!(storage.position("s1").unwrap(), Some(4));
        assert_eq!(storage.len(), 1);

        storage.delete("s1").unwrap();
        assert!(storage.get("s1").unwrap().is_none());
        storage.delete("s1").unwrap();
        assert!(storage.is_empty());
        assert_eq!(storage.position("s1").unwrap(), Some(4));
    }

    #[test]
    fn test_sqlite_open_in_memory() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        assert!(storage.path().is_none());
        assert!(storage.sessions().unwrap().is_empty());
    }

    #[test]
    fn test_sqlite_put_get_roundtrip() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        let recs = records("s1", 3);
        storage.put("s1", &recs, 5).unwrap();

        let restored = storage.get("s1").unwrap().unwrap();
        assert_eq!(restored, recs);
        assert_eq!(storage.position("s1").unwrap(), Some(5));
        assert!(storage.get("s2").unwrap().is_none());
        assert!(storage.position("s2").unwrap().is_none());
    }

    #[test]
    fn test_sqlite_put_replaces_snapshot() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        storage.put("s1", &records("s1", 3), 3).unwrap();
        storage.put("s1", &records("s1", 1), 6).unwrap();

        assert_eq!(storage.get("s1").unwrap().unwrap().len(), 1);
        assert_eq!(storage.position("s1").unwrap(), Some(6));
        assert_eq!(storage.sessions().unwrap(), vec!["s1".to_string()]);
    }

    #[test]
    fn test_sqlite_delete() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        storage.put("s1", &records("s1", 1), 2).unwrap();
        storage.put("s2", &records("s2", 1), 2).unwrap();

        storage.delete("s1").unwrap();
        assert!(storage.get("s1").unwrap().is_none());
        assert!(storage.get("s2").unwrap().is_some());
        assert_eq!(storage.sessions().unwrap(), vec!["s2".to_string()]);
    }

    #[test]
    fn test_sqlite_position_outlives_snapshot() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        storage.put("s1", &records("s1", 2), 2).unwrap();
        storage.delete("s1").unwrap();
        storage.put_position("s1", 7).unwrap();

        assert!(storage.get("s1").unwrap().is_none());
        assert_eq!(storage.position("s1").unwrap(), Some(7));

        storage.put_position("s2", 1).unwrap();
        assert_eq!(storage.position("s2").unwrap(), Some(1));
        assert!(storage.get("s2").unwrap().is_none());
    }

    #[test]
    fn test_sqlite_corrupt_snapshot_is_error() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        storage
            .conn
            .execute(
                "INSERT INTO session_logs (session_id, records) VALUES ('bad', 'not json')",
                [],
            )
            .unwrap();
        assert!(matches!(storage.get("bad"), Err(StorageError::Snapshot(_))));
        storage.delete("bad").unwrap();
    }
}
