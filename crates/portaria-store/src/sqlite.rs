//! SQLite implementation of the Storage trait.
//!
//! This is the primary storage backend. It uses rusqlite with bundled
//! SQLite behind a mutex; the handful of key/value operations are cheap
//! enough that no connection pool is warranted.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::storage::Storage;

/// SQLite-based storage implementation.
///
/// Thread-safe via internal Mutex.
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Execute an operation on the connection.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        f(&conn)
    }
}

impl Storage for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM kv_entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(StoreError::from)
        })
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at",
                params![key, value, now_millis()],
            )?;
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM kv_entries WHERE key = ?1", params![key])?;
            Ok(())
        })
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::keys;

    #[test]
    fn test_put_get_roundtrip() {
        let storage = SqliteStorage::open_memory().unwrap();

        storage.put(keys::GRANTS, "[]").unwrap();
        assert_eq!(storage.get(keys::GRANTS).unwrap(), Some("[]".to_string()));
        assert_eq!(storage.get(keys::SCREENS).unwrap(), None);
    }

    #[test]
    fn test_put_replaces() {
        let storage = SqliteStorage::open_memory().unwrap();

        storage.put(keys::GRANTS, "[1]").unwrap();
        storage.put(keys::GRANTS, "[2]").unwrap();
        assert_eq!(storage.get(keys::GRANTS).unwrap(), Some("[2]".to_string()));
    }

    #[test]
    fn test_remove() {
        let storage = SqliteStorage::open_memory().unwrap();

        storage.put(keys::GRANTS, "[]").unwrap();
        storage.remove(keys::GRANTS).unwrap();
        assert_eq!(storage.get(keys::GRANTS).unwrap(), None);

        // Absent key removal is not an error
        storage.remove(keys::GRANTS).unwrap();
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portaria.db");

        {
            let storage = SqliteStorage::open(&path).unwrap();
            storage.put(keys::SCREENS, r#"{"atos":1}"#).unwrap();
        }

        let storage = SqliteStorage::open(&path).unwrap();
        assert_eq!(
            storage.get(keys::SCREENS).unwrap(),
            Some(r#"{"atos":1}"#.to_string())
        );
    }
}
