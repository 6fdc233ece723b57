//! PackStream encoder.
//!
//! Supports the subset of PackStream needed to build client requests: tiny
//! integers, strings up to 255 bytes, null, and tiny dictionaries and
//! structures. Anything outside that range is rejected before a byte is
//! written.

use bytes::{BufMut, BytesMut};

use super::marker::*;
use super::PackStreamError;

/// An open container and how many values it still expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenContainer {
    dictionary: bool,
    remaining: usize,
}

/// Append-only PackStream encoder writing into a reusable buffer.
///
/// Containers are opened with [`begin_structure`](Self::begin_structure) or
/// [`begin_dictionary`](Self::begin_dictionary) and are closed implicitly once
/// their declared number of values has been written.
#[derive(Debug)]
pub struct PackStreamEncoder {
    buffer: BytesMut,
    open: Vec<OpenContainer>,
}

impl PackStreamEncoder {
    /// Create a new encoder with default buffer capacity.
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create a new encoder with specified buffer capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
            open: Vec::with_capacity(4),
        }
    }

    /// Get the current buffer length.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Reset the encoder for the next message.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.open.clear();
    }

    /// Get the bytes as a slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Encoded bytes of a complete value.
    ///
    /// Fails if a structure or dictionary is still waiting for values.
    pub fn finish(&self) -> Result<&[u8], PackStreamError> {
        match self.open.iter().map(|c| c.remaining).sum::<usize>() {
            0 => Ok(&self.buffer),
            remaining => Err(PackStreamError::IncompleteValue { remaining }),
        }
    }

    /// Start a structure with `fields` values to follow.
    pub fn begin_structure(&mut self, tag: u8, fields: usize) -> Result<(), PackStreamError> {
        check_tiny("structure", fields)?;
        self.value_written();
        self.buffer.put_u8(TINY_STRUCT + fields as u8);
        self.buffer.put_u8(tag);
        self.open_container(false, fields);
        Ok(())
    }

    /// Start a dictionary with `entries` key/value pairs to follow.
    pub fn begin_dictionary(&mut self, entries: usize) -> Result<(), PackStreamError> {
        check_tiny("dictionary", entries)?;
        self.value_written();
        self.buffer.put_u8(TINY_MAP + entries as u8);
        self.open_container(true, entries * 2);
        Ok(())
    }

    /// Write null.
    pub fn write_null(&mut self) {
        self.value_written();
        self.buffer.put_u8(NULL);
    }

    /// Write a tiny integer (-16..=127).
    pub fn write_int(&mut self, value: i64) -> Result<(), PackStreamError> {
        if !is_tiny_int(value) {
            return Err(PackStreamError::IntegerOutOfRange(value));
        }
        self.value_written();
        self.buffer.put_i8(value as i8);
        Ok(())
    }

    /// Write a string of at most 255 bytes.
    pub fn write_string(&mut self, value: &str) -> Result<(), PackStreamError> {
        let bytes = value.as_bytes();
        let len = bytes.len();

        if len > u8::MAX as usize {
            return Err(PackStreamError::UnsupportedSize { kind: "string", size: len });
        }

        self.value_written();
        if len <= TINY_SIZE_MAX {
            self.buffer.put_u8(TINY_STRING + len as u8);
        } else {
            self.buffer.put_u8(STRING_8);
            self.buffer.put_u8(len as u8);
        }
        self.buffer.put_slice(bytes);
        Ok(())
    }

    /// Write a `key: int` pair into the open dictionary.
    pub fn write_keypair_int(&mut self, key: &str, value: i64) -> Result<(), PackStreamError> {
        self.check_key_position()?;
        if !is_tiny_int(value) {
            return Err(PackStreamError::IntegerOutOfRange(value));
        }
        self.write_string(key)?;
        self.write_int(value)
    }

    /// Write a `key: string` pair into the open dictionary.
    pub fn write_keypair_string(&mut self, key: &str, value: &str) -> Result<(), PackStreamError> {
        self.check_key_position()?;
        if value.len() > u8::MAX as usize {
            return Err(PackStreamError::UnsupportedSize { kind: "string", size: value.len() });
        }
        self.write_string(key)?;
        self.write_string(value)
    }

    /// Write a key whose value is a nested dictionary of `entries` pairs.
    pub fn write_keypair_dictionary(&mut self, key: &str, entries: usize) -> Result<(), PackStreamError> {
        self.check_key_position()?;
        check_tiny("dictionary", entries)?;
        self.write_string(key)?;
        self.begin_dictionary(entries)
    }

    // Pairs are validated up front so a rejected pair never leaves a
    // dangling key in the buffer.
    fn check_key_position(&self) -> Result<(), PackStreamError> {
        match self.open.last() {
            Some(top) if top.dictionary && top.remaining % 2 == 0 => Ok(()),
            _ => Err(PackStreamError::NoOpenDictionary),
        }
    }

    fn open_container(&mut self, dictionary: bool, remaining: usize) {
        if remaining > 0 {
            self.open.push(OpenContainer { dictionary, remaining });
        }
    }

    fn value_written(&mut self) {
        if let Some(top) = self.open.last_mut() {
            top.remaining -= 1;
            if top.remaining == 0 {
                self.open.pop();
            }
        }
    }
}

impl Default for PackStreamEncoder {
    fn default() -> Self {
        Self::new()
    }
}

fn check_tiny(kind: &'static str, size: usize) -> Result<(), PackStreamError> {
    if size > TINY_SIZE_MAX {
        return Err(PackStreamError::UnsupportedSize { kind, size });
    }
    Ok(())
}
