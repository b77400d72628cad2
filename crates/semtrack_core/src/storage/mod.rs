//! Persistence gateway contracts and implementations.
//!
//! # Responsibility
//! - Define the capability the store uses to load, save and clear its
//!   serialized state.
//! - Keep backend details (SQLite, in-process memory) behind one trait.
//!
//! # Invariants
//! - Gateways move opaque JSON text; they never interpret record fields.
//! - Gateway failures are reported, never panicked on; the store decides
//!   whether to absorb them.

use crate::db::DbError;
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod sqlite;

pub use sqlite::{SqliteStorageGateway, STORAGE_KEY};

pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by a persistence gateway backend.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    Backend(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Backend(message) => write!(f, "storage backend failure: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Backend(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Capability consumed by the store for local persistence.
///
/// `load` yields the previously saved document, or `None` on first run.
/// `save` replaces the document wholesale; `clear` removes it.
pub trait StorageGateway {
    fn load(&self) -> StorageResult<Option<String>>;
    fn save(&self, document: &str) -> StorageResult<()>;
    fn clear(&self) -> StorageResult<()>;
}

/// In-process gateway for tests and smoke probes. Nothing survives the
/// process.
#[derive(Debug, Default)]
pub struct MemoryStorageGateway {
    document: RefCell<Option<String>>,
}

impl MemoryStorageGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway pre-loaded with a document, as if a previous
    /// session had saved it.
    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: RefCell::new(Some(document.into())),
        }
    }
}

impl StorageGateway for MemoryStorageGateway {
    fn load(&self) -> StorageResult<Option<String>> {
        Ok(self.document.borrow().clone())
    }

    fn save(&self, document: &str) -> StorageResult<()> {
        *self.document.borrow_mut() = Some(document.to_string());
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        *self.document.borrow_mut() = None;
        Ok(())
    }
}
