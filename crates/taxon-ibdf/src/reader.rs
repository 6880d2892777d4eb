//! Streaming object reader.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use taxon_core::constants::MAX_IBDF_PAYLOAD_BYTES;
use taxon_core::errors::IbdfError;

use crate::codec;
use crate::frame::FrameReader;
use crate::object::IbdfObject;
use crate::IbdfResult;

/// Reads [`IbdfObject`]s one frame at a time.
///
/// An unsupported tag fails only the record that carried it: the frame has
/// been consumed, so the caller may keep reading. Any other error leaves the
/// stream position unknown and ends iteration.
pub struct IbdfReader<R> {
    frames: FrameReader<R>,
    records_read: u64,
    skipped: u64,
    poisoned: bool,
}

impl IbdfReader<BufReader<File>> {
    pub fn open(path: &Path) -> IbdfResult<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> IbdfReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            frames: FrameReader::new(reader, MAX_IBDF_PAYLOAD_BYTES),
            records_read: 0,
            skipped: 0,
            poisoned: false,
        }
    }

    /// Read the next object. `Ok(None)` at end of stream.
    pub fn read_object(&mut self) -> IbdfResult<Option<IbdfObject>> {
        if self.poisoned {
            return Ok(None);
        }
        let frame = match self.frames.read_next() {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(None),
            Err(e) => {
                self.poisoned = true;
                return Err(e);
            }
        };
        self.records_read += 1;
        match codec::decode(&frame) {
            Ok(object) => Ok(Some(object)),
            Err(e @ IbdfError::UnsupportedObjectType { .. }) => {
                self.skipped += 1;
                Err(e)
            }
            Err(e) => {
                self.poisoned = true;
                Err(e)
            }
        }
    }

    /// Read everything, skipping unsupported records. Returns the objects
    /// and the number skipped.
    pub fn read_all_skipping_unsupported(mut self) -> IbdfResult<(Vec<IbdfObject>, u64)> {
        let mut objects = Vec::new();
        loop {
            match self.read_object() {
                Ok(Some(object)) => objects.push(object),
                Ok(None) => break,
                Err(IbdfError::UnsupportedObjectType { tag }) => {
                    tracing::warn!(tag, "skipping unsupported ibdf record");
                }
                Err(e) => return Err(e),
            }
        }
        Ok((objects, self.skipped))
    }

    /// Frames consumed so far, including skipped ones.
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

impl<R: Read> Iterator for IbdfReader<R> {
    type Item = IbdfResult<IbdfObject>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_object().transpose()
    }
}
