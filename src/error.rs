use serde::Serialize;
use thiserror::Error;

/// Failures that stop a check run before or while it executes
///
/// Per-link failures never show up here; they are recorded as
/// [`Outcome::Unreachable`](crate::results::Outcome) results instead.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckError {
    /// The seed cannot be turned into an absolute http(s) URL with a host
    #[error("malformed seed URL '{url}': {reason}")]
    MalformedSeedUrl { url: String, reason: String },

    /// The rendering backend could not allocate a session
    #[error("rendering session unavailable: {message}")]
    SessionUnavailable { message: String },

    /// The seed page itself could not be loaded, so nothing was discovered
    ///
    /// Fails the run (exit code 1) so an unreachable site is never reported
    /// as having no broken links.
    #[error("seed page {url} could not be loaded: {message}")]
    SeedUnreachable { url: String, message: String },

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// A single navigation failed (timeout, DNS, TLS, server error, ...)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct NavigationError {
    pub message: String,
}

impl NavigationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors raised by a renderer while managing its session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{0}")]
    Unavailable(String),

    #[error("failed to close session: {0}")]
    Close(String),
}

impl From<SessionError> for CheckError {
    fn from(err: SessionError) -> Self {
        CheckError::SessionUnavailable {
            message: err.to_string(),
        }
    }
}

/// Errors loading or validating a checker configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid exclude pattern: {0}")]
    Pattern(#[from] regex::Error),
}
