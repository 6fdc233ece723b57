use std::io::{self, BufRead, Write};
use std::net::TcpStream;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use tinybolt::{AuthToken, BoltError, Session, SessionConfig};
use tracing::{debug, info};

/// Errors that end the shell.
#[derive(Error, Debug)]
enum ShellError {
    /// Session or server connection failure
    #[error(transparent)]
    Bolt(#[from] BoltError),

    /// Failure reading queries from stdin or writing the prompt
    #[error("Terminal I/O error: {0}")]
    Terminal(#[source] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "tinybolt")]
#[command(about = "Interactive Bolt query shell", version)]
struct Args {
    /// Server host name or address
    #[arg(long, env = "TINYBOLT_HOST", default_value = "localhost")]
    host: String,

    /// Server port
    #[arg(short, long, env = "TINYBOLT_PORT", default_value_t = 7687)]
    port: u16,

    /// User name for basic authentication
    #[arg(short, long, env = "TINYBOLT_USER", default_value = "neo4j")]
    user: String,

    /// Password for basic authentication
    #[arg(long, env = "TINYBOLT_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,

    /// Connect without credentials
    #[arg(long)]
    anonymous: bool,

    /// User agent sent with HELLO
    #[arg(long, env = "TINYBOLT_USER_AGENT")]
    user_agent: Option<String>,

    /// Send and reply buffer size in bytes
    #[arg(long, env = "TINYBOLT_BUFFER_SIZE", default_value_t = 512)]
    buffer_size: usize,
}

impl Args {
    fn session_config(&self) -> SessionConfig {
        let auth = if self.anonymous {
            AuthToken::none()
        } else {
            AuthToken::basic(&self.user, &self.password)
        };

        let mut builder = SessionConfig::builder()
            .with_auth(auth)
            .with_buffer_size(self.buffer_size);
        if let Some(user_agent) = &self.user_agent {
            builder = builder.with_user_agent(user_agent.as_str());
        }
        builder.build()
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let ShellError::Bolt(bolt) = &e {
                if let Some(failure) = bolt.failure() {
                    println!("- {}", failure.detail);
                }
            }
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), ShellError> {
    let address = format!("{}:{}", args.host, args.port);
    info!(%address, "Connecting");

    let stream = TcpStream::connect(&address).map_err(BoltError::from)?;
    // Enable TCP nodelay for lower latency
    stream.set_nodelay(true).map_err(BoltError::from)?;

    let mut session = Session::open(stream, args.session_config())?;
    if let Some(version) = session.protocol_version() {
        println!("Connected to {} (Bolt {})", address, version);
    }

    let mut input = io::stdin().lock();
    let mut output = io::stdout();
    while let Some(line) = next_query(&mut input, &mut output)? {
        let query = line.trim();
        if query.is_empty() {
            continue;
        }

        match session.execute(query, |record| println!("- {}", record)) {
            Ok(summary) => {
                debug!(records = summary.records, "Query done");
                println!("- {}", summary.summary);
            }
            Err(e) if !e.is_fatal() => println!("- {}", e),
            Err(e) => return Err(e.into()),
        }
    }

    session.close();
    Ok(())
}

/// Prompt for and read one line; `None` at end of input.
fn next_query(input: &mut impl BufRead, output: &mut impl Write) -> Result<Option<String>, ShellError> {
    write!(output, "Enter your query: ").map_err(ShellError::Terminal)?;
    output.flush().map_err(ShellError::Terminal)?;

    let mut line = String::new();
    match input.read_line(&mut line).map_err(ShellError::Terminal)? {
        0 => Ok(None),
        _ => Ok(Some(line)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["tinybolt"]);
        assert_eq!(args.host, "localhost");
        assert_eq!(args.port, 7687);
        assert_eq!(args.user, "neo4j");
        assert_eq!(args.buffer_size, 512);
    }

    #[test]
    fn test_session_config_from_args() {
        let args = Args::parse_from([
            "tinybolt",
            "--user",
            "admin",
            "--password",
            "pw",
            "--user-agent",
            "shell/1.0.0",
            "--buffer-size",
            "1024",
        ]);
        let config = args.session_config();
        assert_eq!(config.auth, AuthToken::basic("admin", "pw"));
        assert_eq!(config.user_agent, "shell/1.0.0");
        assert_eq!(config.buffer_size, 1024);
    }

    struct BrokenInput;

    impl io::Read for BrokenInput {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdin closed"))
        }
    }

    #[test]
    fn test_next_query_reads_lines() {
        let mut input = io::Cursor::new("RETURN 1\n");
        let mut output = Vec::new();

        assert_eq!(next_query(&mut input, &mut output).unwrap().as_deref(), Some("RETURN 1\n"));
        assert!(next_query(&mut input, &mut output).unwrap().is_none());
        assert_eq!(output, b"Enter your query: Enter your query: ");
    }

    #[test]
    fn test_terminal_errors_are_not_transport_errors() {
        let mut input = io::BufReader::new(BrokenInput);
        let err = next_query(&mut input, &mut Vec::<u8>::new()).unwrap_err();

        assert!(matches!(err, ShellError::Terminal(_)));
        assert_eq!(err.to_string(), "Terminal I/O error: stdin closed");
    }

    #[test]
    fn test_bolt_errors_pass_through() {
        let err = ShellError::from(BoltError::ConnectionClosed);
        assert_eq!(err.to_string(), "Connection closed by server");
    }

    #[test]
    fn test_anonymous() {
        let args = Args::parse_from(["tinybolt", "--anonymous"]);
        assert_eq!(args.session_config().auth, AuthToken::none());
    }
}
