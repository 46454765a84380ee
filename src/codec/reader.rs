//! Bounds-checked cursor over a binary frame.

use crate::error::{BouquetError, Result};

/// Sequential big-endian reader; every short read is a `TruncatedFrame`.
pub(crate) struct FrameReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> FrameReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Start reading after the tag byte
    pub(crate) fn after_tag(data: &'a [u8]) -> Result<Self> {
        let mut reader = Self::new(data);
        reader.u8("tag")?;
        Ok(reader)
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub(crate) fn bytes(&mut self, field: &'static str, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(BouquetError::TruncatedFrame {
                field,
                offset: self.pos,
                needed: len,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub(crate) fn u8(&mut self, field: &'static str) -> Result<u8> {
        Ok(self.bytes(field, 1)?[0])
    }

    pub(crate) fn u16_be(&mut self, field: &'static str) -> Result<u16> {
        let b = self.bytes(field, 2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    /// Length-prefixed text, decoded lossily
    pub(crate) fn text(&mut self, field: &'static str, len: usize) -> Result<String> {
        let raw = self.bytes(field, len)?;
        Ok(String::from_utf8_lossy(raw).into_owned())
    }

    /// Everything left in the frame
    pub(crate) fn rest(&mut self) -> &'a [u8] {
        let slice = &self.data[self.pos..];
        self.pos = self.data.len();
        slice
    }
}
