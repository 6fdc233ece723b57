//! Bolt protocol request messages.
//!
//! Request messages are sent from the client to the server. Each request
//! encodes itself straight into a [`PackStreamEncoder`]; no intermediate
//! value tree is built.

use super::tag;
use crate::bolt::packstream::{PackStreamEncoder, PackStreamError};

/// Authentication token carried by HELLO.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    /// Authentication scheme (e.g., "basic", "none")
    pub scheme: String,
    /// Principal (username)
    pub principal: Option<String>,
    /// Credentials (password)
    pub credentials: Option<String>,
}

impl AuthToken {
    /// Create a basic auth token.
    pub fn basic(principal: &str, credentials: &str) -> Self {
        Self {
            scheme: "basic".to_string(),
            principal: Some(principal.to_string()),
            credentials: Some(credentials.to_string()),
        }
    }

    /// Create an anonymous auth token (no auth).
    pub fn none() -> Self {
        Self {
            scheme: "none".to_string(),
            principal: None,
            credentials: None,
        }
    }

    fn entries(&self) -> usize {
        1 + self.principal.is_some() as usize + self.credentials.is_some() as usize
    }
}

impl Default for AuthToken {
    fn default() -> Self {
        Self::none()
    }
}

/// HELLO message - Initialize and authenticate the connection.
#[derive(Debug, Clone, Copy)]
pub struct HelloMessage<'a> {
    /// User agent string
    pub user_agent: &'a str,
    /// Authentication token
    pub auth: &'a AuthToken,
}

impl<'a> HelloMessage<'a> {
    /// Create a new HELLO message.
    pub fn new(user_agent: &'a str, auth: &'a AuthToken) -> Self {
        Self { user_agent, auth }
    }

    fn encode(&self, enc: &mut PackStreamEncoder) -> Result<(), PackStreamError> {
        enc.begin_structure(tag::HELLO, 1)?;
        enc.begin_dictionary(self.auth.entries() + 1)?;
        enc.write_keypair_string("scheme", &self.auth.scheme)?;
        if let Some(principal) = &self.auth.principal {
            enc.write_keypair_string("principal", principal)?;
        }
        if let Some(credentials) = &self.auth.credentials {
            enc.write_keypair_string("credentials", credentials)?;
        }
        enc.write_keypair_string("user_agent", self.user_agent)
    }
}

/// RUN message - Execute an auto-commit query without parameters.
#[derive(Debug, Clone, Copy)]
pub struct RunMessage<'a> {
    /// Query text
    pub query: &'a str,
}

impl<'a> RunMessage<'a> {
    /// Create a new RUN message.
    pub fn new(query: &'a str) -> Self {
        Self { query }
    }

    fn encode(&self, enc: &mut PackStreamEncoder) -> Result<(), PackStreamError> {
        enc.begin_structure(tag::RUN, 3)?;
        enc.write_string(self.query)?;
        // parameters
        enc.begin_dictionary(0)?;
        // extra
        enc.begin_dictionary(0)
    }
}

/// PULL message - Pull query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullMessage {
    /// Number of records to pull (-1 for all)
    pub n: i64,
}

impl PullMessage {
    /// Create a PULL ALL message.
    pub fn all() -> Self {
        Self { n: -1 }
    }

    fn encode(&self, enc: &mut PackStreamEncoder) -> Result<(), PackStreamError> {
        enc.begin_structure(tag::PULL, 1)?;
        enc.begin_dictionary(1)?;
        enc.write_keypair_int("n", self.n)
    }
}

/// Bolt request messages used by the client.
#[derive(Debug, Clone, Copy)]
pub enum BoltRequest<'a> {
    /// HELLO - Initialize connection
    Hello(HelloMessage<'a>),
    /// RESET - Clear a failed server state
    Reset,
    /// RUN - Execute a query
    Run(RunMessage<'a>),
    /// PULL - Pull results
    Pull(PullMessage),
}

impl BoltRequest<'_> {
    /// Get the message tag.
    pub fn tag(&self) -> u8 {
        match self {
            BoltRequest::Hello(_) => tag::HELLO,
            BoltRequest::Reset => tag::RESET,
            BoltRequest::Run(_) => tag::RUN,
            BoltRequest::Pull(_) => tag::PULL,
        }
    }

    /// Get message name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            BoltRequest::Hello(_) => "HELLO",
            BoltRequest::Reset => "RESET",
            BoltRequest::Run(_) => "RUN",
            BoltRequest::Pull(_) => "PULL",
        }
    }

    /// Encode the request into a cleared encoder and return the payload.
    pub fn encode<'e>(&self, enc: &'e mut PackStreamEncoder) -> Result<&'e [u8], PackStreamError> {
        enc.clear();
        match self {
            BoltRequest::Hello(msg) => msg.encode(enc)?,
            BoltRequest::Reset => enc.begin_structure(tag::RESET, 0)?,
            BoltRequest::Run(msg) => msg.encode(enc)?,
            BoltRequest::Pull(msg) => msg.encode(enc)?,
        }
        enc.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bolt::packstream::{decode_sequence, DecodedValue, StructureTag};

    fn encoded(request: BoltRequest<'_>) -> Vec<u8> {
        let mut enc = PackStreamEncoder::new();
        request.encode(&mut enc).unwrap().to_vec()
    }

    #[test]
    fn test_reset_message() {
        assert_eq!(encoded(BoltRequest::Reset), vec![0xB0, 0x0F]);
    }

    #[test]
    fn test_pull_message() {
        assert_eq!(
            encoded(BoltRequest::Pull(PullMessage::all())),
            vec![0xB1, 0x3F, 0xA1, 0x81, b'n', 0xFF]
        );
    }

    #[test]
    fn test_run_message() {
        let bytes = encoded(BoltRequest::Run(RunMessage::new("RETURN 1")));
        let mut expected = vec![0xB3, 0x10, 0x88];
        expected.extend_from_slice(b"RETURN 1");
        expected.extend_from_slice(&[0xA0, 0xA0]);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_run_query_too_long() {
        let query = "x".repeat(256);
        let mut enc = PackStreamEncoder::new();
        let err = BoltRequest::Run(RunMessage::new(&query)).encode(&mut enc).unwrap_err();
        assert!(matches!(err, PackStreamError::UnsupportedSize { kind: "string", .. }));
    }

    #[test]
    fn test_hello_basic_message() {
        let auth = AuthToken::basic("neo4j", "secret");
        let bytes = encoded(BoltRequest::Hello(HelloMessage::new("tinybolt/0.1", &auth)));

        let tokens: Vec<_> = decode_sequence(&bytes).collect::<Result<_, _>>().unwrap();
        assert_eq!(
            tokens[0],
            DecodedValue::Structure { tag: StructureTag::Unknown(0x01), fields: 1 }
        );
        assert_eq!(tokens[1], DecodedValue::Dictionary(4));
        let keys: Vec<_> = tokens[2..].iter().step_by(2).filter_map(|t| t.as_str()).collect();
        assert_eq!(keys, vec!["scheme", "principal", "credentials", "user_agent"]);
        assert_eq!(tokens[3].as_str(), Some("basic"));
        assert_eq!(tokens[5].as_str(), Some("neo4j"));
        assert_eq!(tokens[7].as_str(), Some("secret"));
        assert_eq!(tokens[9].as_str(), Some("tinybolt/0.1"));
    }

    #[test]
    fn test_hello_none_message() {
        let auth = AuthToken::none();
        let bytes = encoded(BoltRequest::Hello(HelloMessage::new("ua", &auth)));
        assert_eq!(&bytes[..3], &[0xB1, 0x01, 0xA2]);
    }

    #[test]
    fn test_bolt_request_tags() {
        assert_eq!(BoltRequest::Reset.tag(), 0x0F);
        assert_eq!(BoltRequest::Pull(PullMessage::all()).tag(), 0x3F);
        assert_eq!(BoltRequest::Run(RunMessage::new("")).name(), "RUN");
    }
}
