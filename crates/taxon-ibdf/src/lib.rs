//! # taxon-ibdf
//!
//! The binary externalizable object stream used for import, export, commit
//! records and deltas. Each record is framed as
//!
//! ```text
//! [object_type_tag: u8][data_format_version: u8][length: i32 BE][payload: length bytes]
//! ```
//!
//! Payloads are bincode-encoded, one shape per object type. End of stream is
//! a clean end-of-input at a frame boundary; there is no terminator record.

pub mod codec;
pub mod frame;
pub mod object;
pub mod object_type;
pub mod reader;
pub mod writer;

pub use frame::{FrameReader, FrameWriter, IbdfFrame};
pub use object::{
    ExternalChronology, ExternalCommitRecord, ExternalKind, ExternalStamp, ExternalStampAlias,
    ExternalStampComment, ExternalVersion, IbdfObject,
};
pub use object_type::IbdfObjectType;
pub use reader::IbdfReader;
pub use writer::IbdfWriter;

/// Result alias for stream-level operations.
pub type IbdfResult<T> = Result<T, taxon_core::errors::IbdfError>;
