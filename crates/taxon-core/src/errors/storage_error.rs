//! Persistence provider errors.

use super::error_code::{self, TaxonErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("persistence write failed for key {key}: {reason}")]
    WriteFailed { key: i32, reason: String },

    #[error("identifier not registered: {0}")]
    UnknownIdentifier(String),
}

impl TaxonErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        error_code::STORAGE_ERROR
    }
}
