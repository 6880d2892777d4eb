//! Commit ledger errors.

use super::error_code::{self, TaxonErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    #[error("unknown or already finalized commit handle {0}")]
    UnknownHandle(u64),

    /// Persisting a finalized record failed. Nothing from the commit is visible.
    #[error("commit record persistence failed: {reason}")]
    PersistenceFailed { reason: String },

    #[error("no commit record stored under key {0}")]
    RecordNotFound(i32),
}

impl TaxonErrorCode for CommitError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::PersistenceFailed { .. } => error_code::COMMIT_PERSISTENCE_FAILED,
            _ => error_code::COMMIT_ERROR,
        }
    }
}
