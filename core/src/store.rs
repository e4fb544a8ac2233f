//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! The persistence adapter calls store methods — it never executes SQL directly.

use crate::{error::GameResult, persistence::KeyValueStorage};
use rusqlite::{params, Connection, OptionalExtension};

pub struct GameStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl GameStore {
    /// Open (or create) the game database at `path`.
    pub fn open(path: &str) -> GameResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> GameResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, path: None })
    }

    /// Open + migrate in one step.
    pub fn open_migrated(path: &str) -> GameResult<Self> {
        let store = Self::open(path)?;
        store.migrate()?;
        Ok(store)
    }

    /// Reopen a new connection to the same database.
    /// For in-memory databases this returns a new, empty database.
    pub fn reopen(&self) -> GameResult<Self> {
        match &self.path {
            Some(p) => Self::open(p),
            None => Self::in_memory(),
        }
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> GameResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Keyed values ───────────────────────────────────────────

    pub fn get_value(&self, key: &str) -> GameResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Upsert several keys in one transaction.
    pub fn put_values(&self, entries: &[(&str, String)]) -> GameResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, strftime('%s','now'))
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                                updated_at = excluded.updated_at",
            )?;
            for (key, value) in entries {
                stmt.execute(params![key, value])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Delete the given keys in one transaction.
    pub fn delete_values(&self, keys: &[&str]) -> GameResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for key in keys {
            tx.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Number of stored keys (for tests).
    pub fn value_count(&self) -> GameResult<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl KeyValueStorage for GameStore {
    fn get(&self, key: &str) -> GameResult<Option<String>> {
        self.get_value(key)
    }

    fn put_all(&mut self, entries: &[(&str, String)]) -> GameResult<()> {
        self.put_values(entries)
    }

    fn clear(&mut self, keys: &[&str]) -> GameResult<()> {
        self.delete_values(keys)
    }
}
