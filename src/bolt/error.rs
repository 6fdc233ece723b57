//! Bolt protocol error types.

use std::io;

use thiserror::Error;

use super::message::ServerFailure;
use super::packstream::PackStreamError;

/// Result type for Bolt operations.
pub type BoltResult<T> = Result<T, BoltError>;

/// Bolt protocol errors.
///
/// Only [`BoltError::Query`] and encoding-constraint errors leave the session
/// usable; see [`BoltError::is_fatal`].
#[derive(Error, Debug)]
pub enum BoltError {
    /// Byte-stream failure while sending or receiving
    #[error("Transport error: {0}")]
    Transport(#[from] io::Error),

    /// Transport reported end of stream
    #[error("Connection closed by server")]
    ConnectionClosed,

    /// Outbound message does not fit in one chunk of the working buffer
    #[error("Message too large: {size} bytes (max: {max})")]
    MessageTooLarge {
        /// Payload size
        size: usize,
        /// Largest payload that fits
        max: usize,
    },

    /// Inbound message does not fit in the reassembly buffer
    #[error("Reply too large: {size} bytes (max: {max})")]
    ReplyTooLarge {
        /// Reassembled size so far
        size: usize,
        /// Reassembly capacity
        max: usize,
    },

    /// Malformed reply or rejected request value
    #[error("PackStream error: {0}")]
    PackStream(#[from] PackStreamError),

    /// Server did not agree to the only supported protocol version
    #[error("Server version not supported: {0:02X?}")]
    UnsupportedVersion([u8; 4]),

    /// HELLO was not answered with SUCCESS
    #[error("Authentication failure: {0}")]
    Authentication(ServerFailure),

    /// RUN or PULL was not answered with SUCCESS/RECORD
    #[error("Query failure: {0}")]
    Query(ServerFailure),

    /// Reply is not a message envelope at all
    #[error("Unexpected reply: {0}")]
    UnexpectedReply(String),

    /// Operation not allowed in the current session state
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl BoltError {
    /// Whether the session must be torn down after this error.
    ///
    /// Query failures are recovered with RESET, and encoding-constraint
    /// errors are raised before any byte reaches the transport.
    pub fn is_fatal(&self) -> bool {
        match self {
            BoltError::Query(_) | BoltError::InvalidState(_) => false,
            BoltError::PackStream(e) => !e.is_encoding(),
            _ => true,
        }
    }

    /// Server-reported failure detail, if any.
    pub fn failure(&self) -> Option<&ServerFailure> {
        match self {
            BoltError::Authentication(f) | BoltError::Query(f) => Some(f),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bolt_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        let bolt_err: BoltError = io_err.into();
        assert!(matches!(bolt_err, BoltError::Transport(_)));
        assert!(bolt_err.is_fatal());
    }

    #[test]
    fn test_fatality() {
        assert!(!BoltError::Query(ServerFailure::default()).is_fatal());
        assert!(BoltError::Authentication(ServerFailure::default()).is_fatal());
        assert!(BoltError::ConnectionClosed.is_fatal());
        assert!(BoltError::MessageTooLarge { size: 600, max: 508 }.is_fatal());
        assert!(BoltError::UnsupportedVersion([0, 0, 0, 4]).is_fatal());
        assert!(!BoltError::from(PackStreamError::IntegerOutOfRange(300)).is_fatal());
        assert!(BoltError::from(PackStreamError::Truncated { needed: 2, remaining: 0 }).is_fatal());
    }

    #[test]
    fn test_display() {
        let err = BoltError::UnsupportedVersion([0, 0, 0, 4]);
        assert_eq!(err.to_string(), "Server version not supported: [00, 00, 00, 04]");

        let err = BoltError::ReplyTooLarge { size: 600, max: 512 };
        assert!(err.to_string().contains("600"));
    }
}
