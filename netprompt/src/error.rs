//! Error types for netprompt.

use std::io;
use thiserror::Error;

/// Main error type for netprompt operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Channel operation errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Session lifecycle errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Prompt pattern definition errors
    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),
}

impl Error {
    /// The session-level failure kind, if this is one.
    ///
    /// ```rust
    /// use netprompt::error::{Error, SessionError};
    ///
    /// let err = Error::from(SessionError::PromptUnknown);
    /// assert!(matches!(err.session_error(), Some(SessionError::PromptUnknown)));
    /// ```
    pub fn session_error(&self) -> Option<&SessionError> {
        match self {
            Error::Session(e) => Some(e),
            _ => None,
        }
    }
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Host key is not in known_hosts and verification is strict
    #[error("Unknown host key for {host}:{port}")]
    HostKeyUnknown { host: String, port: u16 },

    /// Host key does not match the known_hosts entry
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// Failure reading or writing known_hosts
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Channel layer errors (PTY operations, reads).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Failed to open PTY channel
    #[error("Failed to open PTY channel")]
    PtyOpenFailed,

    /// Failed to request shell
    #[error("Failed to request shell")]
    ShellRequestFailed,

    /// Channel closed unexpectedly
    #[error("Channel closed")]
    Closed,

    /// SSH protocol error on the channel
    #[error("Channel SSH error: {0}")]
    Ssh(russh::Error),
}

/// Session lifecycle errors.
///
/// Every precondition failure of `connect`, `exec` and `disconnect` maps to
/// exactly one variant.
#[derive(Error, Debug)]
pub enum SessionError {
    /// A required configuration field is absent or empty
    #[error("Missing required field '{field}'")]
    MissingField { field: &'static str },

    /// `connect` called on a session that already holds a transport
    #[error("Session already connected")]
    AlreadyConnected,

    /// Operation requires a connected session
    #[error("Session not connected - call connect() first")]
    NotConnected,

    /// The TCP reachability probe did not complete in time
    #[error("Unable to probe port {port} on host {host}")]
    ProbeFailed { host: String, port: u16 },

    /// The transport rejected the credentials
    #[error("Authentication failed for user '{user}'")]
    AuthFailed { user: String },

    /// No candidate prompt survived validation
    #[error("Unable to match prompt of host after {attempts} attempts")]
    PromptNotFound { attempts: usize },

    /// `exec` called before a prompt was discovered
    #[error("Prompt is unknown")]
    PromptUnknown,
}

/// Prompt pattern definition errors.
#[derive(Error, Debug)]
pub enum PatternError {
    /// Invalid regex in a detect expression or built match expression
    #[error("Invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// Pattern definition is structurally wrong
    #[error("Invalid pattern '{device_type}': {message}")]
    InvalidDefinition {
        device_type: String,
        message: String,
    },

    /// A pattern file could not be parsed
    #[error("Failed to parse pattern data: {0}")]
    Parse(#[from] serde_json::Error),

    /// A pattern file could not be read
    #[error("Failed to read pattern file: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias using netprompt's Error.
pub type Result<T> = std::result::Result<T, Error>;
