//! Session management.
//!
//! A session drives one connection through handshake, authentication and
//! the query cycle:
//!
//! ```text
//! Disconnected -> Handshaking -> Authenticated
//! Authenticated -> AwaitingReply(Run) -> AwaitingReply(Pull) -> Authenticated
//! Authenticated -> AwaitingReply(Run | Pull) -> Recovering -> Authenticated
//! any -> Failed
//! ```
//!
//! Query failures are recovered by sending RESET until the server answers
//! SUCCESS. Every other error except a rejected request value is fatal:
//! the session moves to `Failed` and refuses further work.

use tracing::{debug, error, info, warn};

use crate::bolt::handshake::{self, HANDSHAKE_RESPONSE_SIZE};
use crate::bolt::{
    BoltError, BoltRequest, BoltResult, BoltVersion, HelloMessage, PullMessage, Reply, ReplyKind,
    RunMessage,
};

use super::config::SessionConfig;
use super::connection::Connection;
use super::query::unescape_query;
use super::transport::Transport;

// ============================================================================
// SessionState
// ============================================================================

/// Request a session is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// RUN
    Run,
    /// PULL
    Pull,
}

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Transport connected, no handshake yet
    Disconnected,
    /// Handshake started or agreed; not yet authenticated
    Handshaking,
    /// Ready for a query
    Authenticated,
    /// Query in flight
    AwaitingReply(RequestKind),
    /// Sending RESET after a query failure
    Recovering,
    /// Fatal error seen; unusable
    Failed,
}

// ============================================================================
// ResultSummary
// ============================================================================

/// Outcome of a completed query.
#[derive(Debug, Clone)]
pub struct ResultSummary {
    /// Number of RECORD replies handed to the caller
    pub records: usize,
    /// SUCCESS reply that ended the record stream
    pub summary: Reply,
}

// ============================================================================
// Session
// ============================================================================

/// Blocking Bolt session over a single connection.
pub struct Session<T> {
    connection: Connection<T>,
    config: SessionConfig,
    state: SessionState,
    version: Option<BoltVersion>,
}

impl<T: Transport> Session<T> {
    /// Wrap an already connected transport.
    pub fn new(transport: T, config: SessionConfig) -> Self {
        Self {
            connection: Connection::new(transport, config.buffer_size),
            config,
            state: SessionState::Disconnected,
            version: None,
        }
    }

    /// Handshake and authenticate in one go.
    pub fn open(transport: T, config: SessionConfig) -> BoltResult<Self> {
        let mut session = Self::new(transport, config);
        session.handshake()?;
        session.authenticate()?;
        Ok(session)
    }

    /// Send the preamble and check the server's version reply.
    pub fn handshake(&mut self) -> BoltResult<BoltVersion> {
        self.expect_state(SessionState::Disconnected, "handshake")?;
        self.state = SessionState::Handshaking;

        let result = self.exchange_preamble();
        let version = self.settle(result)?;

        info!(version = %version, "Handshake complete");
        self.version = Some(version);
        Ok(version)
    }

    /// Send HELLO; anything but SUCCESS is fatal.
    pub fn authenticate(&mut self) -> BoltResult<()> {
        self.expect_state(SessionState::Handshaking, "authenticate")?;

        let hello = HelloMessage::new(&self.config.user_agent, &self.config.auth);
        let result = self
            .connection
            .request(BoltRequest::Hello(hello))
            .and_then(|reply| match reply.kind() {
                ReplyKind::Success => Ok(()),
                _ => Err(BoltError::Authentication(reply.failure())),
            });
        self.settle(result)?;

        self.state = SessionState::Authenticated;
        info!(
            scheme = %self.config.auth.scheme,
            user_agent = %self.config.user_agent,
            "Authenticated"
        );
        Ok(())
    }

    /// Run a query as given and stream its records to `on_record`.
    ///
    /// A server-side failure is recovered with RESET before it is returned,
    /// so the session accepts the next query either way.
    pub fn run<F>(&mut self, query: &str, on_record: F) -> BoltResult<ResultSummary>
    where
        F: FnMut(&Reply),
    {
        self.expect_state(SessionState::Authenticated, "run a query")?;

        match self.run_cycle(query, on_record) {
            Ok(summary) => {
                self.state = SessionState::Authenticated;
                debug!(records = summary.records, "Query complete");
                Ok(summary)
            }
            Err(BoltError::Query(failure)) => {
                warn!(failure = %failure, "Query failed");
                self.state = SessionState::Recovering;
                let result = self.recover();
                self.settle(result)?;
                Err(BoltError::Query(failure))
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Unescape a line of user input and run it.
    pub fn execute<F>(&mut self, line: &str, on_record: F) -> BoltResult<ResultSummary>
    where
        F: FnMut(&Reply),
    {
        self.run(&unescape_query(line), on_record)
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Agreed protocol version, once the handshake succeeded.
    pub fn protocol_version(&self) -> Option<BoltVersion> {
        self.version
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// End the session and give back the transport.
    ///
    /// No GOODBYE is sent; dropping the transport closes the stream.
    pub fn close(self) -> T {
        debug!(state = ?self.state, "Closing session");
        self.connection.into_inner()
    }

    fn exchange_preamble(&mut self) -> BoltResult<BoltVersion> {
        self.connection.send_raw(&handshake::preamble())?;
        let reply = self.connection.read_exact::<HANDSHAKE_RESPONSE_SIZE>()?;
        handshake::check_reply(reply)
    }

    fn run_cycle<F>(&mut self, query: &str, mut on_record: F) -> BoltResult<ResultSummary>
    where
        F: FnMut(&Reply),
    {
        self.state = SessionState::AwaitingReply(RequestKind::Run);
        let reply = self.connection.request(BoltRequest::Run(RunMessage::new(query)))?;
        if !reply.is_success() {
            return Err(BoltError::Query(reply.failure()));
        }

        self.state = SessionState::AwaitingReply(RequestKind::Pull);
        self.connection.send_request(BoltRequest::Pull(PullMessage::all()))?;

        let mut records = 0;
        loop {
            let reply = self.connection.receive_reply()?;
            match reply.kind() {
                ReplyKind::Record => {
                    records += 1;
                    on_record(&reply);
                }
                ReplyKind::Success => return Ok(ResultSummary { records, summary: reply }),
                _ => return Err(BoltError::Query(reply.failure())),
            }
        }
    }

    /// Send RESET until the server answers SUCCESS.
    fn recover(&mut self) -> BoltResult<()> {
        let mut attempts = 1u32;
        loop {
            let reply = self.connection.request(BoltRequest::Reset)?;
            if reply.is_success() {
                break;
            }
            warn!(attempts, reply = reply.kind().name(), "Retrying reset...");
            attempts += 1;
        }

        self.state = SessionState::Authenticated;
        debug!(attempts, "Session reset");
        Ok(())
    }

    fn expect_state(&self, expected: SessionState, action: &str) -> BoltResult<()> {
        if self.state != expected {
            return Err(BoltError::InvalidState(format!(
                "Cannot {} in state {:?}",
                action, self.state
            )));
        }
        Ok(())
    }

    fn settle<R>(&mut self, result: BoltResult<R>) -> BoltResult<R> {
        result.map_err(|e| self.fail(e))
    }

    /// Record the consequence of an error on the session state.
    fn fail(&mut self, e: BoltError) -> BoltError {
        if e.is_fatal() {
            error!(error = %e, state = ?self.state, "Session failed");
            self.state = SessionState::Failed;
        } else if self.state != SessionState::Handshaking && self.state != SessionState::Disconnected {
            self.state = SessionState::Authenticated;
        }
        e
    }
}

impl<T> std::fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("version", &self.version)
            .field("connection", &self.connection)
            .finish()
    }
}
