//! Local key-value cache.
//!
//! The cache stores JSON text under a handful of fixed keys. The engine only
//! needs get/set/remove, so the storage mechanism sits behind
//! [`KeyValueStore`]: SQLite for the CLI, a shared in-memory map for tests.

use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use rusqlite::{OptionalExtension, params};
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub const SHIFTS_KEY: &str = "shifts";
pub const LEGACY_SHIFTS_KEY: &str = "entries";
pub const TEMPLATES_KEY: &str = "shiftTemplates";
pub const WORK_INFOS_KEY: &str = "prevWorkInfos";
pub const CHECK_IN_KEY: &str = "checkInTime";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&mut self, key: &str) -> AppResult<()>;
}

/// Read and decode the JSON stored under `key`.
pub fn read_json<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> AppResult<Option<Value>> {
    match store.get(key)? {
        None => Ok(None),
        Some(text) => serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| AppError::Storage(format!("key '{key}' holds invalid JSON: {e}"))),
    }
}

/// Encode `value` as JSON and store it under `key`.
pub fn write_json<S: KeyValueStore + ?Sized, T: Serialize + ?Sized>(
    store: &mut S,
    key: &str,
    value: &T,
) -> AppResult<()> {
    let text = serde_json::to_string(value)?;
    store.set(key, &text)
}

// ---------------------------
// SQLite backend
// ---------------------------

pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    /// Open (and migrate) the cache database at `path`.
    pub fn open(path: &str) -> AppResult<Self> {
        let pool = DbPool::new(path)?;
        init_db(&pool.conn)?;
        Ok(Self { pool })
    }

    pub fn in_memory() -> AppResult<Self> {
        let pool = DbPool::in_memory()?;
        init_db(&pool.conn)?;
        Ok(Self { pool })
    }

    pub fn conn(&self) -> &rusqlite::Connection {
        &self.pool.conn
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let value = self
            .pool
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> AppResult<()> {
        self.pool.conn.execute(
            r#"
            INSERT INTO kv (key, value, updated_at)
            VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> AppResult<()> {
        self.pool
            .conn
            .execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }
}

// ---------------------------
// In-memory backend
// ---------------------------

/// Clones share the same entries, so a test can keep a handle and inspect
/// what an owner of another clone has persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> AppResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> AppResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
