//! SQLite-backed storage.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::{Storage, StorageResult, SCHEMA};

/// Key-value slots kept in a single SQLite table.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open storage at path, creating the file if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        let storage = Self { conn };
        storage.initialize()?;
        Ok(storage)
    }

    /// Create in-memory storage (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self { conn };
        storage.initialize()?;
        Ok(storage)
    }

    fn initialize(&self) -> StorageResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    #[cfg(test)]
    fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl Storage for SqliteStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv_store WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(Into::into)
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        self.conn.execute("DELETE FROM kv_store WHERE key = ?", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_initialized() {
        let storage = SqliteStorage::open_in_memory().unwrap();

        let tables: Vec<String> = storage
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"kv_store".to_string()));
    }

    #[test]
    fn test_upsert_and_remove() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();

        storage.set_item("cabinet_medical_users", "[]").unwrap();
        storage
            .set_item("cabinet_medical_users", r#"[{"id":"u1"}]"#)
            .unwrap();
        assert_eq!(
            storage.get_item("cabinet_medical_users").unwrap(),
            Some(r#"[{"id":"u1"}]"#.to_string())
        );

        storage.remove_item("cabinet_medical_users").unwrap();
        assert_eq!(storage.get_item("cabinet_medical_users").unwrap(), None);

        // Removing again is fine
        storage.remove_item("cabinet_medical_users").unwrap();
    }

    #[test]
    fn test_reopen_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cabinet.db");

        {
            let mut storage = SqliteStorage::open(&path).unwrap();
            storage.set_item("k", "v").unwrap();
        }

        let storage = SqliteStorage::open(&path).unwrap();
        assert_eq!(storage.get_item("k").unwrap(), Some("v".to_string()));
    }
}
