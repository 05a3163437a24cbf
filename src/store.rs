use crate::app_dirs::AppDirs;
use rusqlite::{params, Connection};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Key-value persistence boundary. Values are JSON strings. Callers read
/// through [`load_or`] and write through [`save`], which degrade to the
/// supplied default / a no-op when storage misbehaves, so a broken disk
/// costs cross-session memory rather than the session itself.
pub trait PersistentStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
    fn remove(&mut self, key: &str) -> io::Result<()>;
    fn clear(&mut self) -> io::Result<()>;
}

/// Read and deserialize a key, falling back to `default` when the key is
/// absent or the stored value no longer parses.
pub fn load_or<T: DeserializeOwned>(store: &dyn PersistentStore, key: &str, default: T) -> T {
    store
        .get(key)
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or(default)
}

/// Serialize and write a key, best-effort.
pub fn save<T: Serialize>(store: &mut dyn PersistentStore, key: &str, value: &T) {
    if let Ok(raw) = serde_json::to_string(value) {
        let _ = store.set(key, &raw);
    }
}

/// In-memory store for tests and for degraded runs when the database
/// cannot be opened.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistentStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        self.values.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.values.clear();
        Ok(())
    }
}

/// SQLite-backed store: a single `kv` table under the app state dir.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the store at its default location, creating parents as needed.
    pub fn new() -> rusqlite::Result<Self> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("wordbridge.db"));

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create directory: {}", e)),
                )
            })?;
        }

        Self::open(&db_path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> rusqlite::Result<Self> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> rusqlite::Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )?;
        Ok(SqliteStore { conn })
    }
}

impl PersistentStore for SqliteStore {
    fn get(&self, key: &str) -> Option<String> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .ok()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO kv (key, value) VALUES (?1, ?2)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value
                "#,
                params![key, value],
            )
            .map(|_| ())
            .map_err(io::Error::other)
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", [key])
            .map(|_| ())
            .map_err(io::Error::other)
    }

    fn clear(&mut self) -> io::Result<()> {
        self.conn
            .execute("DELETE FROM kv", [])
            .map(|_| ())
            .map_err(io::Error::other)
    }
}
