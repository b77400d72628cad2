//! Core domain logic for the semtrack semester tracker.
//! This crate is the single source of truth for business invariants.

pub mod codec;
pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod storage;
pub mod store;

pub use codec::{ExportError, ImportError, EXPORT_FILE_NAME};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::discipline::{default_semester, Discipline, DisciplineId, DEFAULT_KIND};
pub use model::normalize::{normalize_list, normalize_record, IdAllocator};
pub use query::{pending, view, Filter};
pub use storage::{
    MemoryStorageGateway, SqliteStorageGateway, StorageError, StorageGateway, StorageResult,
    STORAGE_KEY,
};
pub use store::{DisciplineStore, Summary};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
