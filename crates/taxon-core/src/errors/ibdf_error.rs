//! IBDF binary stream errors.

use super::error_code::{self, TaxonErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum IbdfError {
    /// The frame carried a tag no decoder is registered for. The frame has
    /// been consumed, so the stream can continue with the next record.
    #[error("unsupported object type tag {tag}")]
    UnsupportedObjectType { tag: u8 },

    #[error("unsupported data format version {version} for tag {tag}")]
    UnsupportedDataFormat { tag: u8, version: u8 },

    #[error("invalid frame length {length}")]
    InvalidLength { length: i64 },

    #[error("stream ended inside a frame ({read} of {expected} bytes)")]
    Truncated { read: usize, expected: usize },

    #[error("payload encode failed: {0}")]
    Encode(String),

    #[error("payload decode failed for tag {tag}: {reason}")]
    Decode { tag: u8, reason: String },

    #[error("unexpected object type: expected {expected}, found {found}")]
    UnexpectedObject { expected: String, found: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TaxonErrorCode for IbdfError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedObjectType { .. } => error_code::UNSUPPORTED_OBJECT_TYPE,
            _ => error_code::IBDF_ERROR,
        }
    }
}
