//! PackStream serialization format.
//!
//! PackStream is the binary serialization format used by the Bolt protocol
//! to encode values for transmission between client and server. Every value
//! is self-describing through its leading marker byte.
//!
//! # Encoding
//!
//! [`PackStreamEncoder`] writes the small subset a client needs to build
//! requests:
//!
//! - **Null**
//! - **Tiny integers** (-16 to 127)
//! - **Strings** up to 255 bytes
//! - **Dictionaries** and **structures** with up to 15 entries
//!
//! # Decoding
//!
//! [`PackStreamDecoder`] turns any PackStream buffer into a flat sequence of
//! [`DecodedValue`] tokens. Integers up to 32 bits are decoded; 64-bit
//! integers and floats are reported as placeholders. Lists, dictionaries and
//! structures report their declared size and their contents follow as
//! separate tokens. Unknown structure tags and unassigned markers are
//! reported rather than rejected; only a truncated buffer is an error.

pub mod decoder;
pub mod encoder;
pub mod marker;
pub mod types;

pub use decoder::{decode_sequence, PackStreamDecoder};
pub use encoder::PackStreamEncoder;
pub use types::{DecodedValue, StructureTag};

use thiserror::Error;

/// PackStream errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PackStreamError {
    /// Buffer ended inside a value
    #[error("Truncated PackStream data: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        /// Bytes the value needs
        needed: usize,
        /// Bytes left in the buffer
        remaining: usize,
    },

    /// Size outside what the encoder supports
    #[error("Unsupported {kind} size: {size}")]
    UnsupportedSize {
        /// Kind of value being written
        kind: &'static str,
        /// Requested size
        size: usize,
    },

    /// Integer outside the tiny-int range
    #[error("Integer out of range: {0} (supported: -16..=127)")]
    IntegerOutOfRange(i64),

    /// Key/value pair written outside a dictionary
    #[error("No open dictionary to write a key/value pair into")]
    NoOpenDictionary,

    /// Container still expecting values
    #[error("Incomplete value: {remaining} values still expected")]
    IncompleteValue {
        /// Values the open containers still expect
        remaining: usize,
    },
}

impl PackStreamError {
    /// Whether the error comes from encoding (caller input) rather than from
    /// a malformed buffer.
    pub fn is_encoding(&self) -> bool {
        !matches!(self, PackStreamError::Truncated { .. })
    }
}
