//! Chronicle store errors.

use super::error_code::{self, TaxonErrorCode};
use crate::ids::{Nid, StampSequence};

#[derive(Debug, thiserror::Error)]
pub enum ChronicleError {
    /// More than one version is latest under the coordinate and none can be
    /// preferred. Callers choose a resolution policy.
    #[error("contradiction on {nid}: {} competing versions (stamps {candidates:?})", .candidates.len())]
    Contradiction {
        nid: Nid,
        candidates: Vec<StampSequence>,
    },

    #[error("unknown chronicle {0}")]
    UnknownChronicle(Nid),

    #[error("chronicle {0} already exists")]
    AlreadyExists(Nid),

    #[error("chronicle {nid} could not be decoded: {reason}")]
    Corrupt { nid: Nid, reason: String },
}

impl TaxonErrorCode for ChronicleError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Contradiction { .. } => error_code::CONTRADICTION,
            _ => error_code::CHRONICLE_ERROR,
        }
    }
}
