//! Byte transport boundary.
//!
//! The session consumes an already connected, reliable, ordered byte stream.
//! Any blocking `Read + Write` stream (such as `std::net::TcpStream`) is a
//! transport.

use std::io::{self, ErrorKind, Read, Write};

/// Blocking duplex byte stream.
pub trait Transport {
    /// Send all of `bytes`.
    fn send(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Receive at most `buf.len()` bytes, blocking until at least one byte
    /// is available. `Ok(0)` means the peer closed the stream.
    fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

impl<S: Read + Write> Transport for S {
    fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.write_all(bytes)?;
        self.flush()
    }

    fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            match self.read(buf) {
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                result => return result,
            }
        }
    }
}

/// Scripted in-memory transport for tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;

    use bytes::Buf;
    use std::io::{self, Read, Write};

    /// Serves preloaded server bytes and records everything written.
    ///
    /// Reads hand out at most `fragment` bytes at a time so that partial
    /// reads are exercised; an exhausted script reads as end of stream.
    #[derive(Debug, Default)]
    pub struct ScriptedTransport {
        incoming: VecDeque<u8>,
        pub written: Vec<u8>,
        pub writes: usize,
        fragment: usize,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self {
                fragment: usize::MAX,
                ..Self::default()
            }
        }

        pub fn with_fragment(mut self, fragment: usize) -> Self {
            self.fragment = fragment.max(1);
            self
        }

        /// Queue raw bytes from the server.
        pub fn push_raw(&mut self, bytes: &[u8]) -> &mut Self {
            self.incoming.extend(bytes);
            self
        }

        /// Queue one single-chunk message from the server.
        pub fn push_message(&mut self, payload: &[u8]) -> &mut Self {
            self.incoming.extend((payload.len() as u16).to_be_bytes());
            self.incoming.extend(payload);
            self.incoming.extend([0x00, 0x00]);
            self
        }

        pub fn push_success(&mut self) -> &mut Self {
            self.push_message(&[0xB1, 0x70, 0xA0])
        }

        pub fn push_failure(&mut self, code: &str, message: &str) -> &mut Self {
            let mut payload = vec![0xB1, 0x7F, 0xA2, 0x84];
            payload.extend_from_slice(b"code");
            payload.extend(tiny_or_8(code));
            payload.push(0x87);
            payload.extend_from_slice(b"message");
            payload.extend(tiny_or_8(message));
            self.push_message(&payload)
        }

        pub fn push_ignored(&mut self) -> &mut Self {
            self.push_message(&[0xB0, 0x7E])
        }

        pub fn push_record(&mut self, values: &[i8]) -> &mut Self {
            let mut payload = vec![0xB1, 0x71, 0x90 + values.len() as u8];
            payload.extend(values.iter().map(|v| *v as u8));
            self.push_message(&payload)
        }

        /// Message tags of every request written, in order.
        pub fn sent_tags(&self) -> Vec<u8> {
            message_tags(&self.written)
        }
    }

    /// Tags of the framed messages in `bytes`, in order.
    pub fn message_tags(bytes: &[u8]) -> Vec<u8> {
        let mut tags = Vec::new();
        let mut rest = bytes;
        let mut in_message = false;
        while rest.len() >= 2 {
            let len = rest.get_u16() as usize;
            if len == 0 {
                in_message = false;
                continue;
            }
            if !in_message && rest.len() >= 2 {
                tags.push(rest[1]);
            }
            in_message = true;
            rest = &rest[len.min(rest.len())..];
        }
        tags
    }

    fn tiny_or_8(text: &str) -> Vec<u8> {
        let mut out = if text.len() < 16 {
            vec![0x80 + text.len() as u8]
        } else {
            vec![0xD0, text.len() as u8]
        };
        out.extend_from_slice(text.as_bytes());
        out
    }

    impl Read for ScriptedTransport {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(self.fragment).min(self.incoming.len());
            for (slot, byte) in buf.iter_mut().zip(self.incoming.drain(..n)) {
                *slot = byte;
            }
            Ok(n)
        }
    }

    impl Write for ScriptedTransport {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes += 1;
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedTransport;
    use super::*;

    #[test]
    fn test_transport_for_read_write() {
        let mut transport = ScriptedTransport::new().with_fragment(2);
        transport.push_raw(&[1, 2, 3]);

        Transport::send(&mut transport, &[9, 9]).unwrap();
        assert_eq!(transport.written, vec![9, 9]);

        let mut buf = [0u8; 8];
        assert_eq!(Transport::receive(&mut transport, &mut buf).unwrap(), 2);
        assert_eq!(Transport::receive(&mut transport, &mut buf).unwrap(), 1);
        assert_eq!(buf[0], 3);
        assert_eq!(Transport::receive(&mut transport, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_sent_tags() {
        let mut transport = ScriptedTransport::new();
        transport.written = vec![0x00, 0x02, 0xB0, 0x0F, 0x00, 0x00, 0x00, 0x02, 0xB0, 0x3F, 0x00, 0x00];
        assert_eq!(transport.sent_tags(), vec![0x0F, 0x3F]);
    }
}
