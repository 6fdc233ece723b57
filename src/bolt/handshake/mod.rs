//! Bolt protocol handshake.
//!
//! The handshake consists of:
//! 1. Client sends the 4-byte magic number (0x6060B017)
//! 2. Client sends 4 x 4-byte version slots; only the first is used here
//! 3. Server responds with the 4-byte agreed version (or zeros if none)
//!
//! Exactly one version is proposed and there is no fallback: any reply other
//! than 5.0 ends the session.

mod version;

pub use version::BoltVersion;

use super::{BoltError, BoltResult};

/// Bolt protocol magic number: 0x6060B017
pub const BOLT_MAGIC: [u8; 4] = [0x60, 0x60, 0xB0, 0x17];

/// Size of the complete handshake message from client (magic + 4 versions)
pub const HANDSHAKE_SIZE: usize = 20;

/// Size of server response (negotiated version)
pub const HANDSHAKE_RESPONSE_SIZE: usize = 4;

/// The single protocol version this client proposes.
pub const SUPPORTED_VERSION: BoltVersion = BoltVersion::V5_0;

/// Build the handshake preamble: magic, the supported version, then three
/// empty version slots.
pub fn preamble() -> [u8; HANDSHAKE_SIZE] {
    let mut buf = [0u8; HANDSHAKE_SIZE];
    buf[0..4].copy_from_slice(&BOLT_MAGIC);
    buf[4..8].copy_from_slice(&SUPPORTED_VERSION.to_bytes());
    buf
}

/// Validate the server's handshake reply.
pub fn check_reply(reply: [u8; HANDSHAKE_RESPONSE_SIZE]) -> BoltResult<BoltVersion> {
    if reply[3] != SUPPORTED_VERSION.major {
        return Err(BoltError::UnsupportedVersion(reply));
    }
    BoltVersion::from_bytes(reply).ok_or(BoltError::UnsupportedVersion(reply))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preamble_layout() {
        let buf = preamble();
        assert_eq!(buf.len(), 20);
        assert_eq!(&buf[0..4], &[0x60, 0x60, 0xB0, 0x17]);
        assert_eq!(&buf[4..8], &[0x00, 0x00, 0x00, 0x05]);
        assert!(buf[8..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_check_reply() {
        assert_eq!(check_reply([0, 0, 0, 5]).unwrap(), BoltVersion::V5_0);
        assert!(matches!(
            check_reply([0, 0, 0, 4]),
            Err(BoltError::UnsupportedVersion([0, 0, 0, 4]))
        ));
        assert!(matches!(check_reply([0, 0, 0, 0]), Err(BoltError::UnsupportedVersion(_))));
    }

    #[test]
    fn test_handshake_sizes() {
        assert_eq!(HANDSHAKE_SIZE, 20);
        assert_eq!(HANDSHAKE_RESPONSE_SIZE, 4);
    }
}
