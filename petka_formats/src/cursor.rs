use byteorder::{ByteOrder, LittleEndian};

use crate::encoding::TextCodec;
use crate::error::FormatError;

/// Little-endian field reader over a fully-loaded resource file.
///
/// The offset is explicit state on the reader, so nested variable-length
/// records thread their position from field to field. Every read either
/// returns the decoded value with the cursor advanced past it, or fails
/// with `Truncated` naming the file, record, and offset.
#[derive(Debug)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
    file: &'static str,
    record: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8], file: &'static str) -> Self {
        Cursor {
            data,
            pos: 0,
            file,
            record: 0,
        }
    }

    /// Marks the record currently being decoded; reported in errors.
    pub fn enter_record(&mut self, record: usize) {
        self.record = record;
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Bytes past the cursor, without consuming them.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], FormatError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(FormatError::Truncated {
                file: self.file,
                record: self.record,
                offset: self.pos,
            })?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, FormatError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, FormatError> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32, FormatError> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], FormatError> {
        self.take(len)
    }

    /// Reads a length-prefixed text payload of `len` bytes.
    pub fn read_str(&mut self, len: usize, codec: TextCodec) -> Result<String, FormatError> {
        Ok(codec.decode(self.take(len)?))
    }
}
