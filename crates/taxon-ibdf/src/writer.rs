//! Streaming object writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::codec;
use crate::frame::FrameWriter;
use crate::object::IbdfObject;
use crate::IbdfResult;

pub struct IbdfWriter<W: Write> {
    frames: FrameWriter<W>,
    written: u64,
}

impl IbdfWriter<BufWriter<File>> {
    pub fn create(path: &Path) -> IbdfResult<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> IbdfWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            frames: FrameWriter::new(writer),
            written: 0,
        }
    }

    pub fn write(&mut self, object: &IbdfObject) -> IbdfResult<()> {
        let frame = codec::encode(object)?;
        self.frames.write_frame(&frame)?;
        self.written += 1;
        Ok(())
    }

    pub fn write_all<'a>(&mut self, objects: impl IntoIterator<Item = &'a IbdfObject>) -> IbdfResult<()> {
        for object in objects {
            self.write(object)?;
        }
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> IbdfResult<W> {
        self.frames.flush()?;
        Ok(self.frames.into_inner())
    }
}
