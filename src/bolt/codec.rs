//! Bolt chunk framing for tokio_util.
//!
//! A message travels as one or more chunks, each prefixed with a 2-byte
//! big-endian length, followed by a zero-length chunk that terminates the
//! message. Outbound messages always fit in a single chunk; inbound messages
//! may arrive split across any number of chunks and transport reads.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use super::BoltError;

/// Size of a chunk length header.
pub const CHUNK_HEADER_SIZE: usize = 2;

/// End of message marker (0x00 0x00)
pub const END_MARKER: [u8; 2] = [0x00, 0x00];

/// Framing overhead of a single-chunk message: header plus terminator.
pub const FRAME_OVERHEAD: usize = CHUNK_HEADER_SIZE + END_MARKER.len();

/// Default working buffer size.
pub const DEFAULT_BUFFER_SIZE: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkState {
    /// Waiting for a chunk length header
    Header,
    /// Inside a chunk, this many payload bytes still to come
    Payload(usize),
}

/// Bolt chunk codec with fixed outbound and inbound limits.
///
/// Decoding copies chunk payload into the reassembly area as soon as it
/// arrives, so the caller's read buffer never has to hold a whole chunk.
#[derive(Debug)]
pub struct ChunkCodec {
    /// Largest outbound payload
    max_payload: usize,
    /// Largest reassembled inbound message
    max_message: usize,
    /// Reassembly area for the message being received
    message: BytesMut,
    state: ChunkState,
}

impl ChunkCodec {
    /// Create a codec sized for a working buffer of `buffer_size` bytes.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            max_payload: buffer_size.saturating_sub(FRAME_OVERHEAD),
            max_message: buffer_size,
            message: BytesMut::with_capacity(buffer_size),
            state: ChunkState::Header,
        }
    }

    /// Largest payload [`encode`](Encoder::encode) accepts.
    pub fn max_payload(&self) -> usize {
        self.max_payload
    }

    /// Largest message [`decode`](Decoder::decode) reassembles.
    pub fn max_message(&self) -> usize {
        self.max_message
    }

    /// Drop any partially received message.
    pub fn reset(&mut self) {
        self.message.clear();
        self.state = ChunkState::Header;
    }
}

impl Default for ChunkCodec {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE)
    }
}

impl Decoder for ChunkCodec {
    type Item = Bytes;
    type Error = BoltError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            match self.state {
                ChunkState::Header => {
                    if src.len() < CHUNK_HEADER_SIZE {
                        return Ok(None);
                    }

                    let chunk_size = src.get_u16() as usize;
                    if chunk_size == 0 {
                        // An empty message is a NOOP; the caller decides what to do with it.
                        return Ok(Some(self.message.split().freeze()));
                    }

                    let size = self.message.len() + chunk_size;
                    if size > self.max_message {
                        self.reset();
                        return Err(BoltError::ReplyTooLarge {
                            size,
                            max: self.max_message,
                        });
                    }
                    self.state = ChunkState::Payload(chunk_size);
                }
                ChunkState::Payload(remaining) => {
                    if src.is_empty() {
                        return Ok(None);
                    }

                    let n = remaining.min(src.len());
                    self.message.extend_from_slice(&src[..n]);
                    src.advance(n);

                    self.state = match remaining - n {
                        0 => ChunkState::Header,
                        left => ChunkState::Payload(left),
                    };
                }
            }
        }
    }
}

impl<'a> Encoder<&'a [u8]> for ChunkCodec {
    type Error = BoltError;

    fn encode(&mut self, payload: &'a [u8], dst: &mut BytesMut) -> Result<(), Self::Error> {
        if payload.len() > self.max_payload {
            return Err(BoltError::MessageTooLarge {
                size: payload.len(),
                max: self.max_payload,
            });
        }

        dst.reserve(payload.len() + FRAME_OVERHEAD);
        if !payload.is_empty() {
            dst.put_u16(payload.len() as u16);
            dst.put_slice(payload);
        }
        dst.put_slice(&END_MARKER);
        Ok(())
    }
}
