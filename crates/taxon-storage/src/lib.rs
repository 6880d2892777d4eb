//! # taxon-storage
//!
//! Implementations of the collaborator traits the versioning core consumes:
//! a SQLite-backed [`PersistenceProvider`](taxon_core::traits::PersistenceProvider),
//! an in-memory one for tests, and an in-memory
//! [`IdentifierService`](taxon_core::traits::IdentifierService).

pub mod identifiers;
pub mod memory;
pub mod sqlite;

pub use identifiers::InMemoryIdentifierService;
pub use memory::MemoryPersistence;
pub use sqlite::SqlitePersistence;

use taxon_core::errors::{StorageError, TaxonError};

/// Helper to convert a SQLite failure message into a `TaxonError`.
pub(crate) fn to_storage_err(message: String) -> TaxonError {
    StorageError::SqliteError { message }.into()
}
