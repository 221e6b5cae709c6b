//! SSH connection configuration.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::SessionError;

/// Default SSH port.
pub const DEFAULT_PORT: u16 = 22;

/// Default per-read timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default reachability probe timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Host key verification mode, analogous to OpenSSH's `StrictHostKeyChecking`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HostKeyVerification {
    /// Reject unknown and changed keys. Connection fails if the host
    /// is not already in known_hosts.
    Strict,

    /// Accept and auto-learn unknown keys, but reject changed keys.
    /// This is the default and matches common SSH client behavior.
    #[default]
    AcceptNew,

    /// Accept all keys without checking. For testing and lab use only.
    Disabled,
}

/// SSH connection configuration.
#[derive(Debug)]
pub struct SshConfig {
    /// Target host (hostname or IP address).
    pub host: String,

    /// SSH port (default: 22).
    pub port: u16,

    /// Username for authentication.
    pub username: String,

    /// Authentication method.
    pub auth: AuthMethod,

    /// Per-read timeout, also used for the SSH handshake.
    pub timeout: Duration,

    /// Deadline for the TCP reachability probe.
    pub probe_timeout: Duration,

    /// Terminal width for PTY.
    pub terminal_width: u32,

    /// Terminal height for PTY.
    pub terminal_height: u32,

    /// Bytes from the end of the read buffer searched for patterns.
    pub search_depth: usize,

    /// Host key verification mode.
    pub host_key_verification: HostKeyVerification,

    /// Path to known_hosts file.
    pub known_hosts_path: Option<PathBuf>,
}

impl SshConfig {
    /// Get the socket address for connection.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check that host, username and secret are present.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.host.trim().is_empty() {
            return Err(SessionError::MissingField { field: "host" });
        }
        if self.username.is_empty() {
            return Err(SessionError::MissingField { field: "username" });
        }
        if !self.auth.has_secret() {
            return Err(SessionError::MissingField { field: "password" });
        }
        Ok(())
    }
}

/// Authentication method for SSH connections.
#[derive(Debug)]
pub enum AuthMethod {
    /// Password authentication.
    Password(SecretString),

    /// Private key authentication.
    PrivateKey {
        /// Path to the private key file.
        path: PathBuf,
        /// Optional passphrase for encrypted keys.
        passphrase: Option<SecretString>,
    },
}

impl AuthMethod {
    /// Password authentication from a plain string.
    pub fn password(password: impl Into<String>) -> Self {
        AuthMethod::Password(SecretString::from(password.into()))
    }

    /// Whether this method carries a usable secret.
    pub fn has_secret(&self) -> bool {
        match self {
            AuthMethod::Password(password) => !password.expose_secret().is_empty(),
            AuthMethod::PrivateKey { path, .. } => !path.as_os_str().is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SshConfig {
        SshConfig {
            host: "192.0.2.10".to_string(),
            port: DEFAULT_PORT,
            username: "admin".to_string(),
            auth: AuthMethod::password("secret"),
            timeout: DEFAULT_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            terminal_width: 511,
            terminal_height: 24,
            search_depth: 1000,
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
        }
    }

    #[test]
    fn test_validate_ok() {
        let config = config();
        assert!(config.validate().is_ok());
        assert_eq!(config.socket_addr(), "192.0.2.10:22");
    }

    #[test]
    fn test_validate_missing_fields() {
        let mut missing_host = config();
        missing_host.host = " ".to_string();
        assert!(matches!(
            missing_host.validate(),
            Err(SessionError::MissingField { field: "host" })
        ));

        let mut missing_user = config();
        missing_user.username.clear();
        assert!(matches!(
            missing_user.validate(),
            Err(SessionError::MissingField { field: "username" })
        ));

        let mut missing_secret = config();
        missing_secret.auth = AuthMethod::password("");
        assert!(matches!(
            missing_secret.validate(),
            Err(SessionError::MissingField { field: "password" })
        ));
    }

    #[test]
    fn test_secret_not_in_debug() {
        let rendered = format!("{:?}", AuthMethod::password("hunter2"));
        assert!(!rendered.contains("hunter2"));
    }
}
