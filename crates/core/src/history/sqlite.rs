//! SQLite-backed history implementation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::{Collection, HistoryBackend, KeywordRecord, SelectionRecord, StorageFault};
use crate::catalog::CatalogSource;

const KEYWORD_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS keyword_history (
        position INTEGER PRIMARY KEY,
        keyword TEXT NOT NULL UNIQUE,
        recorded_at TEXT NOT NULL
    );
"#;

// `source` is '' when the selection carries no source, so the UNIQUE
// constraint also covers untagged selections.
const SELECTION_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS selection_history (
        position INTEGER PRIMARY KEY,
        id TEXT NOT NULL,
        source TEXT NOT NULL DEFAULT '',
        recorded_at TEXT NOT NULL,
        UNIQUE(id, source)
    );
"#;

/// SQLite-backed history.
///
/// Rows keep their original `recorded_at` across rewrites; only records
/// new to a write get the current timestamp.
pub struct SqliteBackend {
    conn: Mutex<Connection>,
    location: PathBuf,
}

fn db_fault(collection: Collection, err: impl std::fmt::Display) -> StorageFault {
    StorageFault::Database {
        collection,
        message: err.to_string(),
    }
}

fn table(collection: Collection) -> (&'static str, &'static str) {
    match collection {
        Collection::Keywords => ("keyword_history", KEYWORD_SCHEMA),
        Collection::Selections => ("selection_history", SELECTION_SCHEMA),
    }
}

impl SqliteBackend {
    /// Open (or create) the database file and tables.
    pub fn new(path: &Path) -> Result<Self, StorageFault> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StorageFault::Io {
                collection: Collection::Keywords,
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        let conn = Connection::open(path).map_err(|e| db_fault(Collection::Keywords, e))?;
        Self::from_connection(conn, path.to_path_buf())
    }

    /// Create an in-memory database (useful for testing).
    pub fn in_memory() -> Result<Self, StorageFault> {
        let conn = Connection::open_in_memory().map_err(|e| db_fault(Collection::Keywords, e))?;
        Self::from_connection(conn, PathBuf::from(":memory:"))
    }

    fn from_connection(conn: Connection, location: PathBuf) -> Result<Self, StorageFault> {
        conn.execute_batch(KEYWORD_SCHEMA)
            .map_err(|e| db_fault(Collection::Keywords, e))?;
        conn.execute_batch(SELECTION_SCHEMA)
            .map_err(|e| db_fault(Collection::Selections, e))?;
        Ok(Self {
            conn: Mutex::new(conn),
            location,
        })
    }

    fn with_conn<T>(
        &self,
        collection: Collection,
        f: impl FnOnce(&mut Connection) -> rusqlite::Result<T>,
    ) -> Result<T, StorageFault> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| db_fault(collection, "connection lock poisoned"))?;
        f(&mut *conn).map_err(|e| db_fault(collection, e))
    }
}

impl HistoryBackend for SqliteBackend {
    fn describe(&self) -> String {
        format!("sqlite database at {}", self.location.display())
    }

    fn ensure(&self, collection: Collection) -> Result<bool, StorageFault> {
        let (name, schema) = table(collection);
        self.with_conn(collection, |conn| {
            let existing: Option<String> = conn
                .query_row(
                    "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
                    params![name],
                    |row| row.get(0),
                )
                .optional()?;
            if existing.is_some() {
                return Ok(false);
            }
            conn.execute_batch(schema)?;
            Ok(true)
        })
    }

    fn read_keywords(&self) -> Result<Vec<KeywordRecord>, StorageFault> {
        let rows: Vec<String> = self.with_conn(Collection::Keywords, |conn| {
            let mut stmt = conn.prepare("SELECT keyword FROM keyword_history ORDER BY position")?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            rows.collect()
        })?;

        rows.into_iter()
            .map(|k| {
                KeywordRecord::new(k).ok_or_else(|| StorageFault::Malformed {
                    collection: Collection::Keywords,
                    message: "empty keyword row".to_string(),
                })
            })
            .collect()
    }

    fn read_selections(&self) -> Result<Vec<SelectionRecord>, StorageFault> {
        let rows: Vec<(String, String)> = self.with_conn(Collection::Selections, |conn| {
            let mut stmt =
                conn.prepare("SELECT id, source FROM selection_history ORDER BY position")?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            rows.collect()
        })?;

        rows.into_iter()
            .map(|(id, source)| {
                let malformed = |message: String| StorageFault::Malformed {
                    collection: Collection::Selections,
                    message,
                };
                let source = if source.is_empty() {
                    None
                } else {
                    Some(source.parse::<CatalogSource>().map_err(malformed)?)
                };
                SelectionRecord::new(id, source)
                    .ok_or_else(|| malformed("empty selection id".to_string()))
            })
            .collect()
    }

    fn write_keywords(&self, records: &[KeywordRecord]) -> Result<(), StorageFault> {
        self.with_conn(Collection::Keywords, |conn| {
            let tx = conn.transaction()?;
            let recorded: HashMap<String, String> = {
                let mut stmt = tx.prepare("SELECT keyword, recorded_at FROM keyword_history")?;
                let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
                rows.collect::<rusqlite::Result<_>>()?
            };
            let now = Utc::now().to_rfc3339();

            tx.execute("DELETE FROM keyword_history", [])?;
            for (position, record) in records.iter().enumerate() {
                let recorded_at = recorded.get(record.as_str()).unwrap_or(&now);
                tx.execute(
                    "INSERT INTO keyword_history (position, keyword, recorded_at) VALUES (?, ?, ?)",
                    params![position as i64, record.as_str(), recorded_at],
                )?;
            }
            tx.commit()
        })
    }

    fn write_selections(&self, records: &[SelectionRecord]) -> Result<(), StorageFault> {
        self.with_conn(Collection::Selections, |conn| {
            let tx = conn.transaction()?;
            let recorded: HashMap<(String, String), String> = {
                let mut stmt = tx.prepare("SELECT id, source, recorded_at FROM selection_history")?;
                let rows =
                    stmt.query_map([], |row| Ok(((row.get(0)?, row.get(1)?), row.get(2)?)))?;
                rows.collect::<rusqlite::Result<_>>()?
            };
            let now = Utc::now().to_rfc3339();

            tx.execute("DELETE FROM selection_history", [])?;
            for (position, record) in records.iter().enumerate() {
                let source = record.source().map(|s| s.as_str()).unwrap_or("");
                let key = (record.id().to_string(), source.to_string());
                let recorded_at = recorded.get(&key).unwrap_or(&now);
                tx.execute(
                    "INSERT INTO selection_history (position, id, source, recorded_at) VALUES (?, ?, ?, ?)",
                    params![position as i64, record.id(), source, recorded_at],
                )?;
            }
            tx.commit()
        })
    }
}
