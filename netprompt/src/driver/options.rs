//! Deserializable session options.

use std::fmt;

use serde::Deserialize;

use crate::transport::config::{DEFAULT_PORT, DEFAULT_TIMEOUT};

/// The recognized construction options, as they appear in a config file.
///
/// Unknown keys are ignored. Missing `host`, `username` or `password` are
/// reported when the session is built, not here.
///
/// ```rust
/// use netprompt::{SessionBuilder, SessionOptions};
///
/// let options: SessionOptions = serde_json::from_str(
///     r#"{"host": "192.0.2.1", "username": "admin", "password": "secret"}"#,
/// ).unwrap();
/// assert_eq!(options.port, 22);
///
/// let session = SessionBuilder::from_options(options).build().unwrap();
/// assert_eq!(session.config().timeout.as_secs(), 5);
/// ```
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// Target host.
    pub host: Option<String>,

    /// SSH port.
    pub port: u16,

    /// Login username.
    pub username: Option<String>,

    /// Login password.
    pub password: Option<String>,

    /// Per-read timeout in seconds.
    pub timeout: u64,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
            username: None,
            password: None,
            timeout: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionOptions")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}
