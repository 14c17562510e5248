//! Raw key-value operations.

use rusqlite::{Connection, OptionalExtension};

use super::{Database, DbResult};

impl Database {
    /// Read the value stored under `key`.
    pub fn get_value(&self, key: &str) -> DbResult<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv_store WHERE key = ?", [key], |row| row.get(0))
            .optional()
            .map_err(Into::into)
    }
}

/// Insert or replace the value stored under `key`. Takes a plain connection
/// so it can run inside a transaction.
pub(super) fn upsert(conn: &Connection, key: &str, value: &str) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO kv_store (key, value, updated_at)
        VALUES (?1, ?2, datetime('now'))
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = datetime('now')
        "#,
        [key, value],
    )?;
    Ok(())
}
