//! Transport layer: the SSH collaborator and the reachability probe.
//!
//! The session only relies on the [`Transport`] contract (login, blind
//! write, pattern-terminated read, per-read timeout). [`SshConnector`]
//! provides it on top of russh; tests substitute scripted implementations.

pub mod config;
mod probe;
mod ssh;

pub use config::{AuthMethod, HostKeyVerification, SshConfig};
pub use probe::probe;
pub use ssh::{SshConnector, SshTransport};

use std::future::Future;
use std::time::Duration;

use regex::bytes::Regex;

use crate::channel::ReadResult;
use crate::error::Result;

/// An interactive shell transport.
pub trait Transport: Send {
    /// Authenticate. `Ok(false)` means the credentials were rejected.
    fn login(
        &mut self,
        username: &str,
        auth: &AuthMethod,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Write bytes without waiting for a reply.
    fn write(&mut self, data: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Read until `pattern` matches or the per-read timeout elapses.
    fn read_until(&mut self, pattern: &Regex) -> impl Future<Output = Result<ReadResult>> + Send;

    /// Set the per-read timeout.
    fn set_timeout(&mut self, timeout: Duration);

    /// Release the transport.
    fn close(self) -> impl Future<Output = Result<()>> + Send
    where
        Self: Sized;
}

/// Opens unauthenticated transports for a session.
pub trait Connector: Send + Sync {
    /// The transport this connector produces.
    type Transport: Transport;

    /// Open a transport to the configured host.
    fn open(&self, config: &SshConfig) -> impl Future<Output = Result<Self::Transport>> + Send;
}
