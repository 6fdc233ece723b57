//! Bolt protocol response messages.
//!
//! Response messages are sent from the server to the client. A reply is kept
//! as its raw payload and only its envelope is inspected; record fields and
//! metadata are left to the token decoder.

use std::fmt;

use bytes::Bytes;

use crate::bolt::packstream::{decode_sequence, DecodedValue, PackStreamDecoder, StructureTag};
use crate::bolt::{BoltError, BoltResult};

/// Reply envelope kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// SUCCESS - Operation completed successfully
    Success,
    /// RECORD - Query result record
    Record,
    /// FAILURE - Operation failed
    Failure,
    /// IGNORED - Message was ignored (connection in FAILED state)
    Ignored,
    /// Structure with a tag that is not a reply envelope
    Other(StructureTag),
}

impl ReplyKind {
    /// Get message name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            ReplyKind::Success => "SUCCESS",
            ReplyKind::Record => "RECORD",
            ReplyKind::Failure => "FAILURE",
            ReplyKind::Ignored => "IGNORED",
            ReplyKind::Other(_) => "UNKNOWN",
        }
    }
}

/// One complete reply message.
#[derive(Debug, Clone)]
pub struct Reply {
    kind: ReplyKind,
    fields: usize,
    payload: Bytes,
}

impl Reply {
    /// Classify a reassembled message by its envelope structure.
    pub fn parse(payload: Bytes) -> BoltResult<Self> {
        let head = decode_sequence(&payload).decode()?;
        let (tag, fields) = head.as_structure().ok_or_else(|| {
            BoltError::UnexpectedReply(format!("expected a structure, got {}", head.type_name()))
        })?;

        let kind = match tag {
            StructureTag::Success => ReplyKind::Success,
            StructureTag::Record => ReplyKind::Record,
            StructureTag::Failure => ReplyKind::Failure,
            StructureTag::Ignored => ReplyKind::Ignored,
            other => ReplyKind::Other(other),
        };

        Ok(Self { kind, fields, payload })
    }

    /// Envelope kind.
    pub fn kind(&self) -> ReplyKind {
        self.kind
    }

    /// Number of envelope fields.
    pub fn fields(&self) -> usize {
        self.fields
    }

    /// Check if this is a success response.
    pub fn is_success(&self) -> bool {
        self.kind == ReplyKind::Success
    }

    /// Check if this is a record response.
    pub fn is_record(&self) -> bool {
        self.kind == ReplyKind::Record
    }

    /// Raw message payload, envelope included.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Every token of the message, starting with the envelope header.
    pub fn tokens(&self) -> PackStreamDecoder<'_> {
        decode_sequence(&self.payload)
    }

    /// Failure detail extracted from this reply.
    pub fn failure(&self) -> ServerFailure {
        ServerFailure::from_reply(self)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match token {
                Ok(value) => write!(f, "{}", value)?,
                Err(_) => return f.write_str("<truncated>"),
            }
        }
        Ok(())
    }
}

/// Failure detail reported by the server.
///
/// `code` and `message` are taken from the first string values that follow
/// keys of the same name; `detail` is the whole reply rendered as tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerFailure {
    /// Kind of reply that carried the failure
    pub reply: Option<ReplyKind>,
    /// Server error code, e.g. `Neo.ClientError.Statement.SyntaxError`
    pub code: Option<String>,
    /// Human readable message
    pub message: Option<String>,
    /// Rendered token line of the reply
    pub detail: String,
}

impl ServerFailure {
    /// Extract failure detail from any reply.
    pub fn from_reply(reply: &Reply) -> Self {
        let mut code = None;
        let mut message = None;
        let mut previous: Option<DecodedValue<'_>> = None;

        for token in reply.tokens() {
            let Ok(value) = token else { break };
            if let (Some(key), Some(text)) = (previous.and_then(|p| p.as_str()), value.as_str()) {
                match key {
                    "code" if code.is_none() => code = Some(text.to_string()),
                    "message" if message.is_none() => message = Some(text.to_string()),
                    _ => {}
                }
            }
            previous = Some(value);
        }

        Self {
            reply: Some(reply.kind()),
            code,
            message,
            detail: reply.to_string(),
        }
    }
}

impl fmt::Display for ServerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => write!(f, "{}: {}", code, message),
            (Some(code), None) => f.write_str(code),
            (None, Some(message)) => f.write_str(message),
            (None, None) => match self.reply {
                Some(kind) if self.detail.is_empty() => f.write_str(kind.name()),
                _ => f.write_str(&self.detail),
            },
        }
    }
}
