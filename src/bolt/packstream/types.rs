//! Decoded PackStream tokens.

use std::fmt;

/// Known structure tags.
///
/// The table is closed: anything else decodes as [`StructureTag::Unknown`]
/// carrying the raw tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureTag {
    /// Graph node (0x4E)
    Node,
    /// Relationship (0x52)
    Relationship,
    /// Relationship without endpoints (0x72)
    UnboundRelationship,
    /// Path (0x50)
    Path,
    /// Date (0x44)
    Date,
    /// Time with offset (0x54)
    Time,
    /// Local time (0x74)
    LocalTime,
    /// Date-time with offset (0x49)
    DateTime,
    /// Date-time with zone id (0x69)
    DateTimeZoneId,
    /// Local date-time (0x64)
    LocalDateTime,
    /// Duration (0x45)
    Duration,
    /// 2D point (0x58)
    Point2D,
    /// 3D point (0x59)
    Point3D,
    /// SUCCESS reply (0x70)
    Success,
    /// RECORD reply (0x71)
    Record,
    /// IGNORED reply (0x7E)
    Ignored,
    /// FAILURE reply (0x7F)
    Failure,
    /// Tag outside the table
    Unknown(u8),
}

impl StructureTag {
    /// Map a raw tag byte through the structure table.
    pub fn from_byte(tag: u8) -> Self {
        match tag {
            0x4E => StructureTag::Node,
            0x52 => StructureTag::Relationship,
            0x72 => StructureTag::UnboundRelationship,
            0x50 => StructureTag::Path,
            0x44 => StructureTag::Date,
            0x54 => StructureTag::Time,
            0x74 => StructureTag::LocalTime,
            0x49 => StructureTag::DateTime,
            0x69 => StructureTag::DateTimeZoneId,
            0x64 => StructureTag::LocalDateTime,
            0x45 => StructureTag::Duration,
            0x58 => StructureTag::Point2D,
            0x59 => StructureTag::Point3D,
            0x70 => StructureTag::Success,
            0x71 => StructureTag::Record,
            0x7E => StructureTag::Ignored,
            0x7F => StructureTag::Failure,
            other => StructureTag::Unknown(other),
        }
    }

    /// The raw tag byte.
    pub fn as_byte(self) -> u8 {
        match self {
            StructureTag::Node => 0x4E,
            StructureTag::Relationship => 0x52,
            StructureTag::UnboundRelationship => 0x72,
            StructureTag::Path => 0x50,
            StructureTag::Date => 0x44,
            StructureTag::Time => 0x54,
            StructureTag::LocalTime => 0x74,
            StructureTag::DateTime => 0x49,
            StructureTag::DateTimeZoneId => 0x69,
            StructureTag::LocalDateTime => 0x64,
            StructureTag::Duration => 0x45,
            StructureTag::Point2D => 0x58,
            StructureTag::Point3D => 0x59,
            StructureTag::Success => 0x70,
            StructureTag::Record => 0x71,
            StructureTag::Ignored => 0x7E,
            StructureTag::Failure => 0x7F,
            StructureTag::Unknown(tag) => tag,
        }
    }

    /// Display name, or `None` for unknown tags.
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            StructureTag::Node => "Node",
            StructureTag::Relationship => "Relationship",
            StructureTag::UnboundRelationship => "UnboundRelationship",
            StructureTag::Path => "Path",
            StructureTag::Date => "Date",
            StructureTag::Time => "Time",
            StructureTag::LocalTime => "LocalTime",
            StructureTag::DateTime => "DateTime",
            StructureTag::DateTimeZoneId => "DateTimeZoneId",
            StructureTag::LocalDateTime => "LocalDateTime",
            StructureTag::Duration => "Duration",
            StructureTag::Point2D => "Point2D",
            StructureTag::Point3D => "Point3D",
            StructureTag::Success => "SUCCESS",
            StructureTag::Record => "RECORD",
            StructureTag::Ignored => "IGNORED",
            StructureTag::Failure => "FAILURE",
            StructureTag::Unknown(_) => return None,
        };
        Some(name)
    }
}

impl fmt::Display for StructureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{:02X}", self.as_byte()),
        }
    }
}

/// One token produced by [`PackStreamDecoder`](super::PackStreamDecoder).
///
/// Containers are shallow: a list, dictionary or structure reports only its
/// declared size, and its contents follow as separate tokens. Strings and
/// byte arrays borrow from the decoded buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedValue<'a> {
    /// Null value
    Null,
    /// Boolean value
    Boolean(bool),
    /// Tiny, 8, 16 or 32 bit integer
    Integer(i64),
    /// 64-bit integer, payload skipped
    Int64,
    /// 64-bit float, payload skipped
    Float,
    /// Byte array
    Bytes(&'a [u8]),
    /// String payload (not null-terminated, not validated as UTF-8)
    String(&'a [u8]),
    /// List header with its element count
    List(usize),
    /// Dictionary header with its key/value pair count
    Dictionary(usize),
    /// Structure header with its tag and field count
    Structure {
        /// Structure tag
        tag: StructureTag,
        /// Number of nested fields that follow
        fields: usize,
    },
    /// Unassigned marker byte, skipped
    Reserved(u8),
}

impl<'a> DecodedValue<'a> {
    /// String payload as text, if valid UTF-8.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            DecodedValue::String(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }

    /// Integer value, if this is a decoded integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            DecodedValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Structure tag and field count, if this is a structure header.
    pub fn as_structure(&self) -> Option<(StructureTag, usize)> {
        match self {
            DecodedValue::Structure { tag, fields } => Some((*tag, *fields)),
            _ => None,
        }
    }

    /// Number of nested values that follow this token in the stream.
    pub fn nested_values(&self) -> usize {
        match self {
            DecodedValue::List(len) => *len,
            DecodedValue::Dictionary(len) => len * 2,
            DecodedValue::Structure { fields, .. } => *fields,
            _ => 0,
        }
    }

    /// Get the type name for debugging.
    pub fn type_name(&self) -> &'static str {
        match self {
            DecodedValue::Null => "Null",
            DecodedValue::Boolean(_) => "Boolean",
            DecodedValue::Integer(_) => "Integer",
            DecodedValue::Int64 => "Int64",
            DecodedValue::Float => "Float",
            DecodedValue::Bytes(_) => "Bytes",
            DecodedValue::String(_) => "String",
            DecodedValue::List(_) => "List",
            DecodedValue::Dictionary(_) => "Dictionary",
            DecodedValue::Structure { .. } => "Structure",
            DecodedValue::Reserved(_) => "Reserved",
        }
    }
}

impl fmt::Display for DecodedValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedValue::Null => f.write_str("NULL"),
            DecodedValue::Boolean(b) => write!(f, "{}", b),
            DecodedValue::Integer(i) => write!(f, "{}", i),
            DecodedValue::Int64 => f.write_str("INT64"),
            DecodedValue::Float => f.write_str("FLOAT"),
            DecodedValue::Bytes(bytes) => {
                f.write_str("[")?;
                for (i, b) in bytes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{:02X}", b)?;
                }
                f.write_str("]")
            }
            DecodedValue::String(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
            DecodedValue::List(len) => write!(f, "L({})", len),
            DecodedValue::Dictionary(len) => write!(f, "D({})", len),
            DecodedValue::Structure { tag, fields } => write!(f, "S({}, {})", tag, fields),
            DecodedValue::Reserved(marker) => write!(f, "?({:02X})", marker),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_tag_table() {
        assert_eq!(StructureTag::from_byte(0x4E), StructureTag::Node);
        assert_eq!(StructureTag::from_byte(0x70), StructureTag::Success);
        assert_eq!(StructureTag::from_byte(0x7F), StructureTag::Failure);
        assert_eq!(StructureTag::from_byte(0x13), StructureTag::Unknown(0x13));

        for byte in 0..=u8::MAX {
            assert_eq!(StructureTag::from_byte(byte).as_byte(), byte);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(DecodedValue::Null.to_string(), "NULL");
        assert_eq!(DecodedValue::Integer(-16).to_string(), "-16");
        assert_eq!(DecodedValue::Bytes(&[0x01, 0xAB]).to_string(), "[01,AB]");
        assert_eq!(DecodedValue::String(b"Alice").to_string(), "Alice");
        assert_eq!(DecodedValue::List(2).to_string(), "L(2)");
        assert_eq!(DecodedValue::Dictionary(1).to_string(), "D(1)");

        let node = DecodedValue::Structure { tag: StructureTag::Node, fields: 3 };
        assert_eq!(node.to_string(), "S(Node, 3)");

        let unknown = DecodedValue::Structure { tag: StructureTag::Unknown(0x13), fields: 2 };
        assert_eq!(unknown.to_string(), "S(13, 2)");
    }

    #[test]
    fn test_nested_values() {
        assert_eq!(DecodedValue::List(3).nested_values(), 3);
        assert_eq!(DecodedValue::Dictionary(2).nested_values(), 4);
        assert_eq!(DecodedValue::Integer(5).nested_values(), 0);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(DecodedValue::String(b"code").as_str(), Some("code"));
        assert_eq!(DecodedValue::String(&[0xFF]).as_str(), None);
        assert_eq!(DecodedValue::Integer(7).as_int(), Some(7));
        assert_eq!(
            DecodedValue::Structure { tag: StructureTag::Record, fields: 1 }.as_structure(),
            Some((StructureTag::Record, 1))
        );
    }
}
