//! Builder for creating sessions.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use super::options::SessionOptions;
use super::session::Session;
use crate::channel::DEFAULT_SEARCH_DEPTH;
use crate::error::{Result, SessionError};
use crate::platform::PatternRegistry;
use crate::transport::config::{DEFAULT_PORT, DEFAULT_PROBE_TIMEOUT, DEFAULT_TIMEOUT};
use crate::transport::{AuthMethod, Connector, HostKeyVerification, SshConfig, SshConnector};

/// Builder for constructing sessions.
///
/// Required fields (host, username, and a password or key) are checked by
/// [`build`](Self::build), which fails with
/// [`SessionError::MissingField`] naming the first one absent.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use netprompt::SessionBuilder;
///
/// # fn example() -> Result<(), netprompt::Error> {
/// let session = SessionBuilder::new("192.0.2.1")
///     .username("admin")
///     .password("secret")
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// assert!(!session.is_connected());
/// # Ok(())
/// # }
/// ```
pub struct SessionBuilder {
    host: String,
    port: u16,
    username: Option<String>,
    auth: Option<AuthMethod>,
    timeout: Duration,
    probe_timeout: Duration,
    terminal_width: u32,
    terminal_height: u32,
    search_depth: usize,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    patterns: Option<PatternRegistry>,
}

impl SessionBuilder {
    /// Create a new session builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            username: None,
            auth: None,
            timeout: DEFAULT_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            terminal_width: 511,
            terminal_height: 24,
            search_depth: DEFAULT_SEARCH_DEPTH,
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
            patterns: None,
        }
    }

    /// Create a builder from deserialized options.
    pub fn from_options(options: SessionOptions) -> Self {
        let mut builder = Self::new(options.host.unwrap_or_default())
            .port(options.port)
            .timeout(Duration::from_secs(options.timeout));
        if let Some(username) = options.username {
            builder = builder.username(username);
        }
        if let Some(password) = options.password {
            builder = builder.password(password);
        }
        builder
    }

    /// Set the SSH port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the username for authentication.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set password authentication.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.auth = Some(AuthMethod::password(password));
        self
    }

    /// Set private key authentication.
    pub fn private_key(mut self, key_path: impl Into<PathBuf>) -> Self {
        self.auth = Some(AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: None,
        });
        self
    }

    /// Set private key authentication with passphrase.
    pub fn private_key_with_passphrase(
        mut self,
        key_path: impl Into<PathBuf>,
        passphrase: impl Into<String>,
    ) -> Self {
        self.auth = Some(AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: Some(SecretString::from(passphrase.into())),
        });
        self
    }

    /// Set the per-read timeout (default: 5 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the reachability probe timeout (default: 2 seconds).
    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Set terminal dimensions.
    pub fn terminal_size(mut self, width: u32, height: u32) -> Self {
        self.terminal_width = width;
        self.terminal_height = height;
        self
    }

    /// Set how many trailing bytes of output are searched for the prompt.
    pub fn search_depth(mut self, depth: usize) -> Self {
        self.search_depth = depth;
        self
    }

    /// Set the host key verification mode.
    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.host_key_verification = mode;
        self
    }

    /// Accept any host key. For lab use only.
    pub fn danger_disable_host_key_verification(self) -> Self {
        self.host_key_verification(HostKeyVerification::Disabled)
    }

    /// Use a specific known_hosts file.
    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    /// Use these prompt patterns instead of the built-in set.
    pub fn patterns(mut self, registry: PatternRegistry) -> Self {
        self.patterns = Some(registry);
        self
    }

    /// Build an SSH session.
    ///
    /// This validates the configuration but does not connect. Call
    /// `connect()` on the returned session.
    pub fn build(self) -> Result<Session<SshConnector>> {
        self.build_with_connector(SshConnector)
    }

    /// Build a session on a custom transport connector.
    pub fn build_with_connector<C: Connector>(self, connector: C) -> Result<Session<C>> {
        if self.host.trim().is_empty() {
            return Err(SessionError::MissingField { field: "host" }.into());
        }
        let username = self
            .username
            .filter(|u| !u.is_empty())
            .ok_or(SessionError::MissingField { field: "username" })?;
        let auth = self
            .auth
            .ok_or(SessionError::MissingField { field: "password" })?;

        let config = SshConfig {
            host: self.host,
            port: self.port,
            username,
            auth,
            timeout: self.timeout,
            probe_timeout: self.probe_timeout,
            terminal_width: self.terminal_width,
            terminal_height: self.terminal_height,
            search_depth: self.search_depth,
            host_key_verification: self.host_key_verification,
            known_hosts_path: self.known_hosts_path,
        };
        config.validate()?;

        let registry = match self.patterns {
            Some(registry) => registry,
            None => PatternRegistry::builtin()?,
        };

        Ok(Session::new(config, registry, connector))
    }
}
