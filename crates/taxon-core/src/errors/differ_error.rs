//! Binary differ errors.

use super::error_code::{self, TaxonErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum DifferError {
    #[error("failed reading {side} export: {reason}")]
    ReadFailed { side: String, reason: String },

    #[error("failed writing delta: {reason}")]
    WriteFailed { reason: String },

    #[error("failed writing analysis files: {reason}")]
    AnalysisFailed { reason: String },

    #[error("pipeline stage panicked: {stage}")]
    StagePanicked { stage: String },
}

impl TaxonErrorCode for DifferError {
    fn error_code(&self) -> &'static str {
        error_code::DIFFER_ERROR
    }
}
