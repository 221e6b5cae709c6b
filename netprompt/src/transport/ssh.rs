//! SSH transport implementation using russh.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, warn};
use regex::bytes::Regex;
use russh::Channel;
use russh::client::{self, Handle, Msg};
use russh::keys::{PrivateKeyWithHashAlg, PublicKey, load_secret_key};
use secrecy::ExposeSecret;

use super::config::{AuthMethod, HostKeyVerification, SshConfig};
use super::{Connector, Transport};
use crate::channel::{PtyChannel, ReadResult};
use crate::error::{ChannelError, Result, SessionError, TransportError};

/// Opens [`SshTransport`]s with russh.
#[derive(Debug, Clone, Copy, Default)]
pub struct SshConnector;

impl Connector for SshConnector {
    type Transport = SshTransport;

    async fn open(&self, config: &SshConfig) -> Result<SshTransport> {
        SshTransport::connect(config).await
    }
}

/// SSH transport wrapping russh client.
///
/// Created unauthenticated; a successful [`Transport::login`] opens the
/// PTY shell channel that reads and writes go through.
pub struct SshTransport {
    /// The russh session handle.
    session: Handle<SshHandler>,

    /// Shell channel, present after login.
    channel: Option<PtyChannel>,

    /// Per-read timeout.
    timeout: Duration,

    /// Tail search depth for the channel buffer.
    search_depth: usize,

    /// Terminal width for PTY.
    terminal_width: u32,

    /// Terminal height for PTY.
    terminal_height: u32,
}

impl SshTransport {
    /// Connect to the SSH server (key exchange and host key check only).
    pub async fn connect(config: &SshConfig) -> Result<Self> {
        let ssh_config = Arc::new(client::Config::default());

        let host_key_error: Arc<Mutex<Option<TransportError>>> = Arc::new(Mutex::new(None));

        let handler = SshHandler {
            host: config.host.clone(),
            port: config.port,
            host_key_verification: config.host_key_verification.clone(),
            known_hosts_path: config.known_hosts_path.clone(),
            host_key_error: host_key_error.clone(),
        };

        debug!("opening SSH connection to {}", config.socket_addr());

        let session = tokio::time::timeout(
            config.timeout,
            client::connect(ssh_config, (config.host.as_str(), config.port), handler),
        )
        .await
        .map_err(|_| TransportError::Timeout(config.timeout))?
        .map_err(|e| {
            // If check_server_key stored a detailed error, use that instead
            // of the generic russh::Error::UnknownKey
            match host_key_error.lock().ok().and_then(|mut slot| slot.take()) {
                Some(hk_err) => hk_err,
                None => TransportError::Ssh(e),
            }
        })?;

        Ok(Self {
            session,
            channel: None,
            timeout: config.timeout,
            search_depth: config.search_depth,
            terminal_width: config.terminal_width,
            terminal_height: config.terminal_height,
        })
    }

    /// Open a new PTY shell channel on this connection.
    async fn open_channel(&self) -> Result<Channel<Msg>> {
        let channel = self
            .session
            .channel_open_session()
            .await
            .map_err(|_| ChannelError::PtyOpenFailed)?;

        channel
            .request_pty(
                true,
                "xterm",
                self.terminal_width,
                self.terminal_height,
                0,
                0,
                &[],
            )
            .await
            .map_err(|_| ChannelError::PtyOpenFailed)?;

        channel
            .request_shell(true)
            .await
            .map_err(|_| ChannelError::ShellRequestFailed)?;

        Ok(channel)
    }

    /// Run the authentication exchange.
    async fn authenticate(&mut self, username: &str, auth: &AuthMethod) -> Result<bool> {
        let success = match auth {
            AuthMethod::Password(password) => self
                .session
                .authenticate_password(username, password.expose_secret())
                .await
                .map_err(TransportError::Ssh)?
                .success(),
            AuthMethod::PrivateKey { path, passphrase } => {
                let key = load_secret_key(path, passphrase.as_ref().map(|p| p.expose_secret()))
                    .map_err(|e| TransportError::Key(e.to_string()))?;

                // Get the best RSA hash algorithm supported by the server
                let hash_alg = self
                    .session
                    .best_supported_rsa_hash()
                    .await
                    .map_err(TransportError::Ssh)?
                    .flatten();

                self.session
                    .authenticate_publickey(
                        username,
                        PrivateKeyWithHashAlg::new(Arc::new(key), hash_alg),
                    )
                    .await
                    .map_err(TransportError::Ssh)?
                    .success()
            }
        };

        Ok(success)
    }

    fn channel_mut(&mut self) -> Result<&mut PtyChannel> {
        Ok(self.channel.as_mut().ok_or(SessionError::NotConnected)?)
    }
}

impl Transport for SshTransport {
    async fn login(&mut self, username: &str, auth: &AuthMethod) -> Result<bool> {
        if !self.authenticate(username, auth).await? {
            return Ok(false);
        }

        let channel = self.open_channel().await?;
        self.channel = Some(PtyChannel::new(channel, self.search_depth, self.timeout));
        Ok(true)
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        self.channel_mut()?.send(data).await
    }

    async fn read_until(&mut self, pattern: &Regex) -> Result<ReadResult> {
        self.channel_mut()?.read_until(pattern).await
    }

    fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
        if let Some(channel) = self.channel.as_mut() {
            channel.set_timeout(timeout);
        }
    }

    async fn close(self) -> Result<()> {
        // The device usually drops the session on its own after `exit`,
        // so failures here are expected and only logged.
        if let Some(channel) = self.channel {
            if let Err(e) = channel.close().await {
                debug!("channel EOF failed: {}", e);
            }
        }
        if let Err(e) = self
            .session
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await
        {
            debug!("SSH disconnect failed: {}", e);
        }
        Ok(())
    }
}

/// SSH client handler for russh.
struct SshHandler {
    host: String,
    port: u16,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    /// Stores a detailed host-key error so connect() can surface it
    /// instead of the generic russh::Error::UnknownKey.
    host_key_error: Arc<Mutex<Option<TransportError>>>,
}

impl SshHandler {
    /// Check the host key against known_hosts.
    ///
    /// Returns `Ok(true)` if matched, `Ok(false)` if host not found,
    /// `Err(TransportError::HostKeyChanged)` if key changed.
    fn check_known_hosts(&self, pubkey: &PublicKey) -> std::result::Result<bool, TransportError> {
        let result = if let Some(ref path) = self.known_hosts_path {
            russh::keys::check_known_hosts_path(&self.host, self.port, pubkey, path)
        } else {
            russh::keys::check_known_hosts(&self.host, self.port, pubkey)
        };

        match result {
            Ok(matched) => Ok(matched),
            Err(russh::keys::Error::KeyChanged { line }) => Err(TransportError::HostKeyChanged {
                host: self.host.clone(),
                port: self.port,
                line,
            }),
            Err(e) => Err(TransportError::KnownHosts(e.to_string())),
        }
    }

    /// Save a new host key to known_hosts.
    fn learn_host_key(&self, pubkey: &PublicKey) -> std::result::Result<(), TransportError> {
        let result = if let Some(ref path) = self.known_hosts_path {
            russh::keys::known_hosts::learn_known_hosts_path(&self.host, self.port, pubkey, path)
        } else {
            russh::keys::known_hosts::learn_known_hosts(&self.host, self.port, pubkey)
        };

        result.map_err(|e| TransportError::KnownHosts(e.to_string()))
    }

    fn reject(&self, error: TransportError) -> bool {
        if let Ok(mut slot) = self.host_key_error.lock() {
            *slot = Some(error);
        }
        false
    }
}

impl client::Handler for SshHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        match self.host_key_verification {
            HostKeyVerification::Disabled => Ok(true),

            HostKeyVerification::AcceptNew => match self.check_known_hosts(server_public_key) {
                Ok(true) => Ok(true),
                Ok(false) => {
                    // Unknown host, learn the key
                    if let Err(e) = self.learn_host_key(server_public_key) {
                        warn!("Failed to save host key: {}", e);
                    }
                    Ok(true)
                }
                Err(e) => Ok(self.reject(e)),
            },

            HostKeyVerification::Strict => match self.check_known_hosts(server_public_key) {
                Ok(true) => Ok(true),
                Ok(false) => Ok(self.reject(TransportError::HostKeyUnknown {
                    host: self.host.clone(),
                    port: self.port,
                })),
                Err(e) => Ok(self.reject(e)),
            },
        }
    }
}
