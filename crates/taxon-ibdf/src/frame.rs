//! Record framing (tag + format version + big-endian length).

use std::io::{ErrorKind, Read, Write};

use taxon_core::errors::IbdfError;

use crate::IbdfResult;

pub const FRAME_HEADER_LEN: usize = 6;

/// One raw record: header fields plus undecoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IbdfFrame {
    pub tag: u8,
    pub format_version: u8,
    pub payload: Vec<u8>,
}

pub struct FrameReader<R> {
    reader: R,
    max_payload_bytes: usize,
}

impl<R: Read> FrameReader<R> {
    pub fn new(reader: R, max_payload_bytes: usize) -> Self {
        Self {
            reader,
            max_payload_bytes,
        }
    }

    /// Read the next frame. `Ok(None)` on a clean end of input at a frame
    /// boundary; end of input anywhere else is [`IbdfError::Truncated`].
    pub fn read_next(&mut self) -> IbdfResult<Option<IbdfFrame>> {
        let mut header = [0u8; FRAME_HEADER_LEN];
        let read = self.fill(&mut header)?;
        if read == 0 {
            return Ok(None);
        }
        if read < FRAME_HEADER_LEN {
            return Err(IbdfError::Truncated {
                read,
                expected: FRAME_HEADER_LEN,
            });
        }

        let tag = header[0];
        let format_version = header[1];
        let length = i32::from_be_bytes([header[2], header[3], header[4], header[5]]);
        if length < 0 || length as usize > self.max_payload_bytes {
            return Err(IbdfError::InvalidLength {
                length: i64::from(length),
            });
        }

        let length = length as usize;
        let mut payload = vec![0u8; length];
        let read = self.fill(&mut payload)?;
        if read < length {
            return Err(IbdfError::Truncated {
                read,
                expected: length,
            });
        }

        Ok(Some(IbdfFrame {
            tag,
            format_version,
            payload,
        }))
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Read until `buf` is full or input ends; returns bytes read.
    fn fill(&mut self, buf: &mut [u8]) -> IbdfResult<usize> {
        let mut read = 0usize;
        while read < buf.len() {
            match self.reader.read(&mut buf[read..]) {
                Ok(0) => break,
                Ok(n) => read += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(IbdfError::Io(e)),
            }
        }
        Ok(read)
    }
}

pub struct FrameWriter<W> {
    writer: W,
}

impl<W: Write> FrameWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_frame(&mut self, frame: &IbdfFrame) -> IbdfResult<()> {
        let length = i32::try_from(frame.payload.len()).map_err(|_| IbdfError::InvalidLength {
            length: frame.payload.len() as i64,
        })?;
        let mut header = [0u8; FRAME_HEADER_LEN];
        header[0] = frame.tag;
        header[1] = frame.format_version;
        header[2..].copy_from_slice(&length.to_be_bytes());
        self.writer.write_all(&header)?;
        self.writer.write_all(&frame.payload)?;
        Ok(())
    }

    pub fn flush(&mut self) -> IbdfResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
