//! Session configuration.

use crate::bolt::{AuthToken, DEFAULT_BUFFER_SIZE};

/// Smallest accepted working buffer size.
pub const MIN_BUFFER_SIZE: usize = 16;

// ============================================================================
// SessionConfig
// ============================================================================

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Authentication token sent with HELLO
    pub auth: AuthToken,
    /// User agent sent with HELLO
    pub user_agent: String,
    /// Capacity of the send buffer and of the reply reassembly area
    pub buffer_size: usize,
}

impl SessionConfig {
    /// Configuration with the given credentials and defaults otherwise.
    pub fn new(auth: AuthToken) -> Self {
        Self {
            auth,
            ..Self::default()
        }
    }

    /// Start a builder.
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder {
            config: Self::default(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auth: AuthToken::default(),
            user_agent: concat!("tinybolt/", env!("CARGO_PKG_VERSION")).to_string(),
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

// ============================================================================
// SessionConfigBuilder
// ============================================================================

/// Session configuration builder.
#[derive(Debug, Clone)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    /// Set the authentication token.
    pub fn with_auth(mut self, auth: AuthToken) -> Self {
        self.config.auth = auth;
        self
    }

    /// Use basic authentication.
    pub fn with_basic_auth(self, user: &str, password: &str) -> Self {
        self.with_auth(AuthToken::basic(user, password))
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the working buffer size; values below [`MIN_BUFFER_SIZE`] are raised to it.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.config.buffer_size = size.max(MIN_BUFFER_SIZE);
        self
    }

    /// Build
    pub fn build(self) -> SessionConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.auth, AuthToken::none());
        assert!(config.user_agent.starts_with("tinybolt/"));
        assert_eq!(config.buffer_size, 512);
    }

    #[test]
    fn test_builder() {
        let config = SessionConfig::builder()
            .with_basic_auth("neo4j", "secret")
            .with_user_agent("shell/1.0.0")
            .with_buffer_size(1024)
            .build();

        assert_eq!(config.auth, AuthToken::basic("neo4j", "secret"));
        assert_eq!(config.user_agent, "shell/1.0.0");
        assert_eq!(config.buffer_size, 1024);
    }

    #[test]
    fn test_buffer_size_minimum() {
        let config = SessionConfig::builder().with_buffer_size(4).build();
        assert_eq!(config.buffer_size, MIN_BUFFER_SIZE);
    }

    #[test]
    fn test_new_keeps_defaults() {
        let config = SessionConfig::new(AuthToken::basic("a", "b"));
        assert_eq!(config.buffer_size, DEFAULT_BUFFER_SIZE);
    }
}
