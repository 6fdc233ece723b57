//! # Bolt Protocol Implementation
//!
//! Low-level pieces of the Bolt protocol, independent of any transport.
//!
//! ## Overview
//!
//! - **PackStream** - Tagged binary encoding of request values and decoding
//!   of reply tokens
//! - **Codec** - Chunk framing of messages
//! - **Handshake** - Preamble and version check
//! - **Message Types** - HELLO, RESET, RUN, PULL requests and reply envelopes
//!
//! ## Submodules
//!
//! - [`packstream`] - Binary serialization/deserialization
//! - [`message`] - Bolt message types
//! - [`handshake`] - Version handshake
//! - [`codec`] - Chunk codec for `tokio_util`
//! - [`error`] - Protocol error types
//!
//! ## Note
//!
//! Most users should use [`crate::driver::Session`] instead of interacting
//! with these pieces directly.

pub mod codec;
pub mod error;
pub mod handshake;
pub mod message;
pub mod packstream;

pub use codec::{ChunkCodec, DEFAULT_BUFFER_SIZE};
pub use error::{BoltError, BoltResult};
pub use handshake::{BoltVersion, BOLT_MAGIC, HANDSHAKE_RESPONSE_SIZE};
pub use message::{
    AuthToken, BoltRequest, HelloMessage, PullMessage, Reply, ReplyKind, RunMessage, ServerFailure,
};
pub use packstream::{
    decode_sequence, DecodedValue, PackStreamDecoder, PackStreamEncoder, PackStreamError,
    StructureTag,
};
