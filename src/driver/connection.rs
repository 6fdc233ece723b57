//! Bolt protocol connection for client-side use.
//!
//! Owns the transport plus one send buffer and one receive buffer, and
//! handles message framing. Protocol rules live in [`super::session`].

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

use crate::bolt::{BoltError, BoltRequest, BoltResult, ChunkCodec, PackStreamEncoder, Reply};

use super::transport::Transport;

/// Client-side Bolt connection.
pub struct Connection<T> {
    /// Byte stream
    transport: T,
    /// Chunk codec (frames requests, reassembles replies)
    codec: ChunkCodec,
    /// Read buffer
    read_buffer: BytesMut,
    /// Write buffer
    write_buffer: BytesMut,
    /// Request payload builder
    encoder: PackStreamEncoder,
    /// Working buffer size
    buffer_size: usize,
}

impl<T: Transport> Connection<T> {
    /// Wrap an already connected transport.
    pub fn new(transport: T, buffer_size: usize) -> Self {
        Self {
            transport,
            codec: ChunkCodec::new(buffer_size),
            read_buffer: BytesMut::with_capacity(buffer_size),
            write_buffer: BytesMut::with_capacity(buffer_size),
            encoder: PackStreamEncoder::with_capacity(buffer_size),
            buffer_size,
        }
    }

    /// Send unframed bytes (handshake preamble).
    pub fn send_raw(&mut self, bytes: &[u8]) -> BoltResult<()> {
        self.transport.send(bytes)?;
        Ok(())
    }

    /// Read exactly `N` unframed bytes (handshake reply).
    pub fn read_exact<const N: usize>(&mut self) -> BoltResult<[u8; N]> {
        while self.read_buffer.len() < N {
            self.fill()?;
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.read_buffer.split_to(N));
        Ok(out)
    }

    /// Encode, frame and send a request as a single transport write.
    ///
    /// Encoding and size checks run before anything is written, so a
    /// rejected request leaves the connection untouched.
    pub fn send_request(&mut self, request: BoltRequest<'_>) -> BoltResult<()> {
        let payload = request.encode(&mut self.encoder)?;

        self.write_buffer.clear();
        self.codec.encode(payload, &mut self.write_buffer)?;

        debug!(message = request.name(), bytes = payload.len(), "Sending request");
        self.transport.send(&self.write_buffer)?;
        Ok(())
    }

    /// Receive one reassembled message payload, which may be empty (NOOP).
    pub fn receive_message(&mut self) -> BoltResult<bytes::Bytes> {
        loop {
            // Try to decode from existing buffer
            if let Some(message) = self.codec.decode(&mut self.read_buffer)? {
                return Ok(message);
            }

            // Need more data
            self.fill()?;
        }
    }

    /// Receive the next reply, skipping NOOP messages.
    pub fn receive_reply(&mut self) -> BoltResult<Reply> {
        loop {
            let message = self.receive_message()?;
            if message.is_empty() {
                debug!("Skipping NOOP");
                continue;
            }

            let bytes = message.len();
            let reply = Reply::parse(message)?;
            debug!(message = reply.kind().name(), bytes, "Received reply");
            return Ok(reply);
        }
    }

    /// Send a request and receive a single reply.
    pub fn request(&mut self, request: BoltRequest<'_>) -> BoltResult<Reply> {
        self.send_request(request)?;
        self.receive_reply()
    }

    /// Working buffer size.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Give back the transport.
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Append one transport read to the read buffer.
    fn fill(&mut self) -> BoltResult<()> {
        let start = self.read_buffer.len();
        let want = self.buffer_size.saturating_sub(start).max(1);
        self.read_buffer.resize(start + want, 0);

        let n = match self.transport.receive(&mut self.read_buffer[start..]) {
            Ok(n) => n,
            Err(e) => {
                self.read_buffer.truncate(start);
                return Err(e.into());
            }
        };
        self.read_buffer.truncate(start + n);

        if n == 0 {
            return Err(BoltError::ConnectionClosed);
        }
        Ok(())
    }
}

impl<T> std::fmt::Debug for Connection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("buffer_size", &self.buffer_size)
            .field("buffered", &self.read_buffer.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bolt::{PullMessage, ReplyKind, RunMessage};
    use crate::driver::transport::testing::ScriptedTransport;

    #[test]
    fn test_send_request_single_write() {
        let mut conn = Connection::new(ScriptedTransport::new(), 512);
        conn.send_request(BoltRequest::Reset).unwrap();

        let transport = conn.into_inner();
        assert_eq!(transport.written, vec![0x00, 0x02, 0xB0, 0x0F, 0x00, 0x00]);
        assert_eq!(transport.writes, 1);
    }

    #[test]
    fn test_send_request_too_large() {
        let query = "x".repeat(40);
        let mut conn = Connection::new(ScriptedTransport::new(), 32);
        let err = conn.send_request(BoltRequest::Run(RunMessage::new(&query))).unwrap_err();

        assert!(matches!(err, BoltError::MessageTooLarge { max: 28, .. }));
        assert!(err.is_fatal());
        assert!(conn.into_inner().written.is_empty());
    }

    #[test]
    fn test_receive_reply_fragmented() {
        for fragment in 1..=8 {
            let mut transport = ScriptedTransport::new().with_fragment(fragment);
            transport.push_record(&[1, 2, -1]).push_success();

            let mut conn = Connection::new(transport, 512);
            let record = conn.receive_reply().unwrap();
            assert_eq!(record.kind(), ReplyKind::Record);
            assert_eq!(record.to_string(), "S(RECORD, 1) L(3) 1 2 -1");
            assert!(conn.receive_reply().unwrap().is_success());
        }
    }

    #[test]
    fn test_receive_reply_skips_noop() {
        let mut transport = ScriptedTransport::new();
        transport.push_raw(&[0x00, 0x00, 0x00, 0x00]).push_success();

        let mut conn = Connection::new(transport, 512);
        assert!(conn.receive_reply().unwrap().is_success());
    }

    #[test]
    fn test_receive_connection_closed() {
        let mut transport = ScriptedTransport::new();
        transport.push_raw(&[0x00, 0x03, 0xB1]);

        let mut conn = Connection::new(transport, 512);
        assert!(matches!(conn.receive_reply(), Err(BoltError::ConnectionClosed)));
    }

    #[test]
    fn test_receive_reply_too_large() {
        let mut transport = ScriptedTransport::new();
        transport.push_message(&[0x00; 40]);

        let mut conn = Connection::new(transport, 32);
        assert!(matches!(
            conn.receive_reply(),
            Err(BoltError::ReplyTooLarge { size: 40, max: 32 })
        ));
    }

    #[test]
    fn test_read_exact_keeps_remainder() {
        let mut transport = ScriptedTransport::new().with_fragment(3);
        transport.push_raw(&[0, 0, 0, 5]).push_success();

        let mut conn = Connection::new(transport, 512);
        assert_eq!(conn.read_exact::<4>().unwrap(), [0, 0, 0, 5]);
        assert!(conn.receive_reply().unwrap().is_success());
    }

    #[test]
    fn test_request_round_trip() {
        let mut transport = ScriptedTransport::new();
        transport.push_success();

        let mut conn = Connection::new(transport, 512);
        let reply = conn.request(BoltRequest::Pull(PullMessage::all())).unwrap();
        assert!(reply.is_success());
        assert_eq!(conn.into_inner().sent_tags(), vec![0x3F]);
    }
}
