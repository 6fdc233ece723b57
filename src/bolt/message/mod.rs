//! Bolt protocol message types.
//!
//! Only the messages needed for single auto-commit queries are built:
//! HELLO, RESET, RUN and PULL. Replies are classified by their envelope
//! structure tag.

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;

/// Bolt message tags.
pub mod tag {
    /// HELLO message tag (0x01)
    pub const HELLO: u8 = 0x01;
    /// RESET message tag (0x0F)
    pub const RESET: u8 = 0x0F;
    /// RUN message tag (0x10)
    pub const RUN: u8 = 0x10;
    /// PULL message tag (0x3F)
    pub const PULL: u8 = 0x3F;

    /// SUCCESS response tag (0x70)
    pub const SUCCESS: u8 = 0x70;
    /// RECORD response tag (0x71)
    pub const RECORD: u8 = 0x71;
    /// IGNORED response tag (0x7E)
    pub const IGNORED: u8 = 0x7E;
    /// FAILURE response tag (0x7F)
    pub const FAILURE: u8 = 0x7F;
}
