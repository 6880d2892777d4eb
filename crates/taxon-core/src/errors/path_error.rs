//! Path registry errors.

use super::error_code::{self, TaxonErrorCode};
use crate::ids::Nid;

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// Two positions on the same path cannot be ordered because a time is malformed.
    #[error("invalid time {time} on path {path}")]
    InvalidTime { path: Nid, time: i64 },

    #[error("path source failed: {reason}")]
    SourceFailed { reason: String },
}

impl TaxonErrorCode for PathError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTime { .. } => error_code::INVALID_TIME,
            Self::SourceFailed { .. } => error_code::PATH_ERROR,
        }
    }
}
