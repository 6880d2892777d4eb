//! Object ↔ frame conversion.

use serde::de::DeserializeOwned;
use serde::Serialize;

use taxon_core::constants::IBDF_DATA_FORMAT_VERSION;
use taxon_core::errors::IbdfError;

use crate::frame::IbdfFrame;
use crate::object::{ExternalChronology, ExternalKind, IbdfObject};
use crate::object_type::IbdfObjectType;
use crate::IbdfResult;

/// Encode an object into a frame at the current data format version.
pub fn encode(object: &IbdfObject) -> IbdfResult<IbdfFrame> {
    let payload = match object {
        IbdfObject::Concept(c) | IbdfObject::Semantic(c) => to_bytes(c)?,
        IbdfObject::CommitRecord(r) => to_bytes(r)?,
        IbdfObject::StampAlias(a) => to_bytes(a)?,
        IbdfObject::StampComment(c) => to_bytes(c)?,
    };
    Ok(IbdfFrame {
        tag: object.object_type().tag(),
        format_version: IBDF_DATA_FORMAT_VERSION,
        payload,
    })
}

/// Decode a frame, dispatching on its tag.
pub fn decode(frame: &IbdfFrame) -> IbdfResult<IbdfObject> {
    let object_type = IbdfObjectType::from_tag(frame.tag)?;
    if frame.format_version != IBDF_DATA_FORMAT_VERSION {
        return Err(IbdfError::UnsupportedDataFormat {
            tag: frame.tag,
            version: frame.format_version,
        });
    }

    let object = match object_type {
        IbdfObjectType::Concept => {
            let chronology: ExternalChronology = from_bytes(frame)?;
            expect_kind(frame.tag, &chronology, false)?;
            IbdfObject::Concept(chronology)
        }
        IbdfObjectType::Semantic => {
            let chronology: ExternalChronology = from_bytes(frame)?;
            expect_kind(frame.tag, &chronology, true)?;
            IbdfObject::Semantic(chronology)
        }
        IbdfObjectType::CommitRecord => IbdfObject::CommitRecord(from_bytes(frame)?),
        IbdfObjectType::StampAlias => IbdfObject::StampAlias(from_bytes(frame)?),
        IbdfObjectType::StampComment => IbdfObject::StampComment(from_bytes(frame)?),
    };
    Ok(object)
}

/// Encode a single object straight to bytes (header included).
pub fn encode_to_vec(object: &IbdfObject) -> IbdfResult<Vec<u8>> {
    let frame = encode(object)?;
    let mut writer = crate::frame::FrameWriter::new(Vec::with_capacity(frame.payload.len() + 6));
    writer.write_frame(&frame)?;
    Ok(writer.into_inner())
}

/// Decode exactly one object from bytes produced by [`encode_to_vec`].
pub fn decode_from_slice(bytes: &[u8]) -> IbdfResult<IbdfObject> {
    let mut reader = crate::frame::FrameReader::new(bytes, bytes.len());
    match reader.read_next()? {
        Some(frame) => decode(&frame),
        None => Err(IbdfError::Truncated {
            read: 0,
            expected: crate::frame::FRAME_HEADER_LEN,
        }),
    }
}

fn to_bytes<T: Serialize>(value: &T) -> IbdfResult<Vec<u8>> {
    bincode::serialize(value).map_err(|e| IbdfError::Encode(e.to_string()))
}

fn from_bytes<T: DeserializeOwned>(frame: &IbdfFrame) -> IbdfResult<T> {
    bincode::deserialize(&frame.payload).map_err(|e| IbdfError::Decode {
        tag: frame.tag,
        reason: e.to_string(),
    })
}

fn expect_kind(tag: u8, chronology: &ExternalChronology, semantic: bool) -> IbdfResult<()> {
    let is_semantic = matches!(chronology.kind, ExternalKind::Semantic { .. });
    if is_semantic == semantic {
        Ok(())
    } else {
        Err(IbdfError::Decode {
            tag,
            reason: "chronology kind does not match object type".to_string(),
        })
    }
}
