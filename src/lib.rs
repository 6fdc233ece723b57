//! # tinybolt
//!
//! A minimal, blocking client for the Bolt graph database protocol.
//!
//! ## Features
//!
//! - **Bolt 5.0** - Handshake, HELLO, RUN, PULL and RESET
//! - **Blocking I/O** - Works over any `Read + Write` stream, no runtime needed
//! - **Fixed buffers** - One send buffer and one reply buffer per session
//! - **Tolerant decoding** - Replies are decoded into a flat token sequence;
//!   unknown structures are reported, not rejected
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use std::net::TcpStream;
//! use tinybolt::{AuthToken, Session, SessionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let stream = TcpStream::connect("localhost:7687")?;
//!     let config = SessionConfig::new(AuthToken::basic("neo4j", "password"));
//!     let mut session = Session::open(stream, config)?;
//!
//!     let summary = session.run("UNWIND range(1, 3) AS x RETURN x", |record| {
//!         println!("{}", record);
//!     })?;
//!     println!("{} records", summary.records);
//!
//!     session.close();
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Query failures are recovered inside the session and returned as
//! [`BoltError::Query`]; the session stays usable. Anything else that
//! [`BoltError::is_fatal`] reports ends the session:
//!
//! ```rust,no_run
//! # use tinybolt::{BoltError, Session, SessionConfig};
//! # fn example(session: &mut Session<std::net::TcpStream>) {
//! match session.run("RETURN 1", |_| {}) {
//!     Ok(_) => {}
//!     Err(BoltError::Query(failure)) => eprintln!("Query failed: {}", failure),
//!     Err(e) => eprintln!("Session lost: {}", e),
//! }
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`driver`] - Session, connection and transport
//! - [`bolt`] - Low-level Bolt protocol implementation
//!

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod bolt;
pub mod driver;

// Re-exports for convenience
pub use driver::{
    ResultSummary, Session, SessionConfig, SessionConfigBuilder, SessionState, Transport,
};

pub use bolt::{AuthToken, BoltError, BoltResult, BoltVersion, DecodedValue, Reply, ServerFailure};
