//! Driver Module
//!
//! Blocking client side of the protocol: one session over one connection.
//!
//! - [`transport`] - Byte stream boundary (`Transport`)
//! - [`connection`] - Framed request/reply exchange with fixed-size buffers
//! - [`session`] - Handshake, authentication, query cycle and RESET recovery
//! - [`config`] - Session configuration (`SessionConfig`)
//! - [`query`] - Bracket escapes for line-oriented input
//!
//! # Example
//!
//! ```no_run
//! use std::net::TcpStream;
//! use tinybolt::driver::{Session, SessionConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let stream = TcpStream::connect("localhost:7687")?;
//! let config = SessionConfig::builder()
//!     .with_basic_auth("neo4j", "password")
//!     .build();
//!
//! let mut session = Session::open(stream, config)?;
//! session.run("MATCH (n) RETURN n LIMIT 10", |record| println!("{}", record))?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connection;
pub mod query;
pub mod session;
pub mod transport;

// Re-exports
pub use config::{SessionConfig, SessionConfigBuilder, MIN_BUFFER_SIZE};
pub use connection::Connection;
pub use query::unescape_query;
pub use session::{RequestKind, ResultSummary, Session, SessionState};
pub use transport::Transport;
