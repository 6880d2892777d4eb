//! Stamp registry errors.

use super::error_code::{self, TaxonErrorCode};
use crate::ids::StampSequence;

#[derive(Debug, thiserror::Error)]
pub enum StampError {
    /// A stamp sequence was referenced that the registry never allocated.
    #[error("unknown stamp sequence {0}")]
    UnknownStamp(StampSequence),

    #[error("invalid alias {alias} -> {primordial}: {reason}")]
    InvalidAlias {
        alias: StampSequence,
        primordial: StampSequence,
        reason: String,
    },

    #[error("stamp {0} is not uncommitted")]
    NotUncommitted(StampSequence),

    #[error("commit time {0} is a reserved sentinel")]
    InvalidCommitTime(i64),
}

impl TaxonErrorCode for StampError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownStamp(_) => error_code::UNKNOWN_STAMP,
            Self::InvalidAlias { .. } => error_code::INVALID_ALIAS,
            Self::NotUncommitted(_) | Self::InvalidCommitTime(_) => error_code::STAMP_ERROR,
        }
    }
}
