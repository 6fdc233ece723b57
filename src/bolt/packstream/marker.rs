//! PackStream marker bytes.
//!
//! Every PackStream value starts with a single marker byte. For the "tiny"
//! kinds the low nibble of the marker carries the size (or, for tiny
//! integers, the whole value); the remaining kinds are followed by an
//! explicit 1, 2 or 4 byte big-endian size field.

/// Null marker
pub const NULL: u8 = 0xC0;
/// 64-bit float marker
pub const FLOAT_64: u8 = 0xC1;

// Boolean markers
/// False
pub const FALSE: u8 = 0xC2;
/// True
pub const TRUE: u8 = 0xC3;

// Integer markers
/// Lower bound of the tiny integer range; tiny integers are the marker byte itself.
pub const TINY_INT_MIN: i64 = -16;
/// Upper bound of the tiny integer range.
pub const TINY_INT_MAX: i64 = 127;
/// 8-bit integer
pub const INT_8: u8 = 0xC8;
/// 16-bit integer
pub const INT_16: u8 = 0xC9;
/// 32-bit integer
pub const INT_32: u8 = 0xCA;
/// 64-bit integer
pub const INT_64: u8 = 0xCB;

// Byte array markers
/// Byte array, 8-bit size
pub const BYTES_8: u8 = 0xCC;
/// Byte array, 16-bit size
pub const BYTES_16: u8 = 0xCD;
/// Byte array, 32-bit size
pub const BYTES_32: u8 = 0xCE;

// String markers
/// Tiny string, size in the low nibble
pub const TINY_STRING: u8 = 0x80;
/// String, 8-bit size
pub const STRING_8: u8 = 0xD0;
/// String, 16-bit size
pub const STRING_16: u8 = 0xD1;
/// String, 32-bit size
pub const STRING_32: u8 = 0xD2;

// List markers
/// Tiny list, size in the low nibble
pub const TINY_LIST: u8 = 0x90;
/// List, 8-bit size
pub const LIST_8: u8 = 0xD4;
/// List, 16-bit size
pub const LIST_16: u8 = 0xD5;
/// List, 32-bit size
pub const LIST_32: u8 = 0xD6;

// Map markers
/// Tiny map, size in the low nibble
pub const TINY_MAP: u8 = 0xA0;
/// Map, 8-bit size
pub const MAP_8: u8 = 0xD8;
/// Map, 16-bit size
pub const MAP_16: u8 = 0xD9;
/// Map, 32-bit size
pub const MAP_32: u8 = 0xDA;

// Structure markers
/// Tiny structure, field count in the low nibble
pub const TINY_STRUCT: u8 = 0xB0;
/// Structure, 8-bit field count
pub const STRUCT_8: u8 = 0xDC;
/// Structure, 16-bit field count
pub const STRUCT_16: u8 = 0xDD;

/// Largest size that fits in the low nibble of a tiny marker.
pub const TINY_SIZE_MAX: usize = 15;

/// Width of the explicit size field that follows a sized marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeField {
    /// Size is packed into the marker's low nibble
    Inline(usize),
    /// One byte unsigned size
    U8,
    /// Two byte big-endian unsigned size
    U16,
    /// Four byte big-endian unsigned size
    U32,
}

/// What a marker byte announces, before any payload is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// Null value
    Null,
    /// Boolean carried in the marker
    Boolean(bool),
    /// Integer carried in the marker
    TinyInt(i8),
    /// 1-byte signed integer follows
    Int8,
    /// 2-byte signed integer follows
    Int16,
    /// 4-byte signed integer follows
    Int32,
    /// 8-byte signed integer follows
    Int64,
    /// 8-byte float follows
    Float,
    /// Byte array
    Bytes(SizeField),
    /// UTF-8 string
    String(SizeField),
    /// List header
    List(SizeField),
    /// Map header
    Map(SizeField),
    /// Structure header; a tag byte follows the size
    Structure(SizeField),
    /// Marker not assigned by PackStream
    Reserved,
}

/// Classify a marker byte.
pub fn classify(marker: u8) -> MarkerKind {
    match marker {
        0x00..=0x7F | 0xF0..=0xFF => MarkerKind::TinyInt(marker as i8),
        0x80..=0x8F => MarkerKind::String(SizeField::Inline(tiny_size(marker))),
        0x90..=0x9F => MarkerKind::List(SizeField::Inline(tiny_size(marker))),
        0xA0..=0xAF => MarkerKind::Map(SizeField::Inline(tiny_size(marker))),
        0xB0..=0xBF => MarkerKind::Structure(SizeField::Inline(tiny_size(marker))),
        NULL => MarkerKind::Null,
        FLOAT_64 => MarkerKind::Float,
        FALSE => MarkerKind::Boolean(false),
        TRUE => MarkerKind::Boolean(true),
        INT_8 => MarkerKind::Int8,
        INT_16 => MarkerKind::Int16,
        INT_32 => MarkerKind::Int32,
        INT_64 => MarkerKind::Int64,
        BYTES_8 => MarkerKind::Bytes(SizeField::U8),
        BYTES_16 => MarkerKind::Bytes(SizeField::U16),
        BYTES_32 => MarkerKind::Bytes(SizeField::U32),
        STRING_8 => MarkerKind::String(SizeField::U8),
        STRING_16 => MarkerKind::String(SizeField::U16),
        STRING_32 => MarkerKind::String(SizeField::U32),
        LIST_8 => MarkerKind::List(SizeField::U8),
        LIST_16 => MarkerKind::List(SizeField::U16),
        LIST_32 => MarkerKind::List(SizeField::U32),
        MAP_8 => MarkerKind::Map(SizeField::U8),
        MAP_16 => MarkerKind::Map(SizeField::U16),
        MAP_32 => MarkerKind::Map(SizeField::U32),
        STRUCT_8 => MarkerKind::Structure(SizeField::U8),
        STRUCT_16 => MarkerKind::Structure(SizeField::U16),
        _ => MarkerKind::Reserved,
    }
}

#[inline]
fn tiny_size(marker: u8) -> usize {
    (marker & 0x0F) as usize
}

/// Check if an integer can be written as a single marker byte.
#[inline]
pub fn is_tiny_int(value: i64) -> bool {
    (TINY_INT_MIN..=TINY_INT_MAX).contains(&value)
}
