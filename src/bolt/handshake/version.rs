//! Bolt protocol version.

use std::fmt;

/// A Bolt protocol version as exchanged in the handshake.
///
/// On the wire a version occupies 4 bytes: `[reserved, range, minor, major]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoltVersion {
    /// Major version number
    pub major: u8,
    /// Minor version number
    pub minor: u8,
}

impl BoltVersion {
    /// Bolt 5.0, the only version this client speaks.
    pub const V5_0: BoltVersion = BoltVersion::new(5, 0);

    /// Create a version.
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Encode as a handshake version slot (no range).
    pub fn to_bytes(self) -> [u8; 4] {
        [0x00, 0x00, self.minor, self.major]
    }

    /// Parse a server handshake reply.
    ///
    /// Returns `None` for the all-zero "no version agreed" reply.
    pub fn from_bytes(bytes: [u8; 4]) -> Option<Self> {
        match (bytes[3], bytes[2]) {
            (0, 0) => None,
            (major, minor) => Some(Self::new(major, minor)),
        }
    }
}

impl fmt::Display for BoltVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
