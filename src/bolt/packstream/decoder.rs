//! PackStream decoder.
//!
//! Produces a flat, single-pass stream of [`DecodedValue`] tokens. Nested
//! contents of lists, dictionaries and structures are not traversed; they
//! simply appear as the following tokens.

use bytes::Buf;

use super::marker::{classify, MarkerKind, SizeField};
use super::types::{DecodedValue, StructureTag};
use super::PackStreamError;

/// Cursor over a PackStream buffer.
///
/// Implements [`Iterator`]; once an error has been yielded the iterator is
/// exhausted.
#[derive(Debug, Clone)]
pub struct PackStreamDecoder<'a> {
    data: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> PackStreamDecoder<'a> {
    /// Create a new decoder for the given bytes.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            failed: false,
        }
    }

    /// Get the current position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Get remaining bytes count.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Check if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Decode the next token.
    pub fn decode(&mut self) -> Result<DecodedValue<'a>, PackStreamError> {
        let marker = self.read_u8()?;

        let value = match classify(marker) {
            MarkerKind::Null => DecodedValue::Null,
            MarkerKind::Boolean(b) => DecodedValue::Boolean(b),
            MarkerKind::TinyInt(i) => DecodedValue::Integer(i as i64),
            MarkerKind::Int8 => DecodedValue::Integer(self.read_u8()? as i8 as i64),
            MarkerKind::Int16 => DecodedValue::Integer(self.read_i16()? as i64),
            MarkerKind::Int32 => DecodedValue::Integer(self.read_i32()? as i64),
            MarkerKind::Int64 => {
                self.read_bytes(8)?;
                DecodedValue::Int64
            }
            MarkerKind::Float => {
                self.read_bytes(8)?;
                DecodedValue::Float
            }
            MarkerKind::Bytes(size) => {
                let len = self.read_size(size)?;
                DecodedValue::Bytes(self.read_bytes(len)?)
            }
            MarkerKind::String(size) => {
                let len = self.read_size(size)?;
                DecodedValue::String(self.read_bytes(len)?)
            }
            MarkerKind::List(size) => DecodedValue::List(self.read_size(size)?),
            MarkerKind::Map(size) => DecodedValue::Dictionary(self.read_size(size)?),
            MarkerKind::Structure(size) => {
                let fields = self.read_size(size)?;
                let tag = StructureTag::from_byte(self.read_u8()?);
                DecodedValue::Structure { tag, fields }
            }
            MarkerKind::Reserved => DecodedValue::Reserved(marker),
        };

        Ok(value)
    }

    /// Skip one complete value, including every nested element.
    ///
    /// Returns the token that started the skipped value.
    pub fn skip_value(&mut self) -> Result<DecodedValue<'a>, PackStreamError> {
        let head = self.decode()?;
        let mut pending = head.nested_values();
        while pending > 0 {
            let value = self.decode()?;
            pending = pending - 1 + value.nested_values();
        }
        Ok(head)
    }

    fn read_size(&mut self, size: SizeField) -> Result<usize, PackStreamError> {
        let len = match size {
            SizeField::Inline(len) => len,
            SizeField::U8 => self.read_u8()? as usize,
            SizeField::U16 => self.read_u16()? as usize,
            SizeField::U32 => self.read_u32()? as usize,
        };
        Ok(len)
    }

    fn read_u8(&mut self) -> Result<u8, PackStreamError> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_u16(&mut self) -> Result<u16, PackStreamError> {
        self.ensure(2)?;
        let value = (&self.data[self.pos..]).get_u16();
        self.pos += 2;
        Ok(value)
    }

    fn read_i16(&mut self) -> Result<i16, PackStreamError> {
        self.ensure(2)?;
        let value = (&self.data[self.pos..]).get_i16();
        self.pos += 2;
        Ok(value)
    }

    fn read_u32(&mut self) -> Result<u32, PackStreamError> {
        self.ensure(4)?;
        let value = (&self.data[self.pos..]).get_u32();
        self.pos += 4;
        Ok(value)
    }

    fn read_i32(&mut self) -> Result<i32, PackStreamError> {
        self.ensure(4)?;
        let value = (&self.data[self.pos..]).get_i32();
        self.pos += 4;
        Ok(value)
    }

    fn ensure(&self, len: usize) -> Result<(), PackStreamError> {
        if self.remaining() < len {
            return Err(PackStreamError::Truncated {
                needed: len,
                remaining: self.remaining(),
            });
        }
        Ok(())
    }

    fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], PackStreamError> {
        self.ensure(len)?;
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }
}

impl<'a> Iterator for PackStreamDecoder<'a> {
    type Item = Result<DecodedValue<'a>, PackStreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.is_empty() {
            return None;
        }
        let item = self.decode();
        if item.is_err() {
            self.failed = true;
        }
        Some(item)
    }
}

impl std::iter::FusedIterator for PackStreamDecoder<'_> {}

/// Decode a buffer into its token sequence.
pub fn decode_sequence(data: &[u8]) -> PackStreamDecoder<'_> {
    PackStreamDecoder::new(data)
}
