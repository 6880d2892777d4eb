//! Taxonomy record and tree errors.

use super::error_code::{self, TaxonErrorCode};
use crate::ids::{Nid, StampSequence};

#[derive(Debug, thiserror::Error)]
pub enum TaxonomyError {
    #[error("malformed taxonomy record at word {offset}: {reason}")]
    MalformedRecord { offset: usize, reason: String },

    #[error("stamp {0} does not fit the packed stamp field")]
    StampOutOfRange(StampSequence),

    #[error("taxonomy flags {0:#x} do not fit the packed flag field")]
    FlagsOutOfRange(u8),

    #[error("node {0} is not in the tree")]
    UnknownNode(Nid),
}

impl TaxonErrorCode for TaxonomyError {
    fn error_code(&self) -> &'static str {
        error_code::TAXONOMY_ERROR
    }
}
