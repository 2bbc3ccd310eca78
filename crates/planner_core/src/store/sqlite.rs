//! SQLite-backed key-value store.

use super::{KeyValueStore, StoreResult};
use crate::db::migrations::ensure_latest;
use rusqlite::{params, Connection, OptionalExtension};

/// Key-value store over the `kv_store` table.
///
/// Cheap to copy; several collection repositories can share one connection.
#[derive(Debug, Clone, Copy)]
pub struct SqliteKvStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvStore<'conn> {
    /// Wraps a connection opened through `db::open_db`.
    ///
    /// # Errors
    /// - Returns an error when the storage table is missing or newer than
    ///   this binary supports.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_latest(conn)?;
        Ok(Self { conn })
    }

    /// Lists stored keys in ascending order.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv_store ORDER BY key ASC;")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}

impl KeyValueStore for SqliteKvStore<'_> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", params![key])?;
        Ok(())
    }
}
