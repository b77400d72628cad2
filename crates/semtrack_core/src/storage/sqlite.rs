//! SQLite-backed persistence gateway.
//!
//! # Responsibility
//! - Persist the serialized tracker document under one fixed key.
//! - Keep SQL details inside the storage boundary.
//!
//! # Invariants
//! - One key maps to at most one document row.
//! - `save` replaces the document atomically (single upsert statement).

use super::{StorageGateway, StorageResult};
use crate::db::{open_db, open_db_in_memory};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Fixed storage key for the current document shape. A breaking change to
/// the persisted shape requires a new key so old data is never silently
/// misread.
pub const STORAGE_KEY: &str = "semtrack_v1";

/// Gateway storing the tracker document in a local SQLite file.
#[derive(Debug)]
pub struct SqliteStorageGateway {
    conn: Connection,
    key: &'static str,
}

impl SqliteStorageGateway {
    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
            key: STORAGE_KEY,
        })
    }

    /// Opens an in-memory database, mainly for tests.
    pub fn open_in_memory() -> StorageResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
            key: STORAGE_KEY,
        })
    }
}

impl StorageGateway for SqliteStorageGateway {
    fn load(&self) -> StorageResult<Option<String>> {
        let document = self
            .conn
            .query_row(
                "SELECT document FROM documents WHERE key = ?1;",
                [self.key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(document)
    }

    fn save(&self, document: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO documents (key, document, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                document = excluded.document,
                updated_at = excluded.updated_at;",
            params![self.key, document],
        )?;
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM documents WHERE key = ?1;", [self.key])?;
        Ok(())
    }
}
