//! Session lifecycle: probe, login, prompt discovery, execution.

use std::fmt;

use log::{debug, info};

use super::detect::{self, DiscoveredPrompt};
use super::exec::{self, DEFAULT_MAX_TRIES};
use super::response::Response;
use crate::error::{Result, SessionError};
use crate::platform::{PatternRegistry, PromptPattern};
use crate::transport::{Connector, SshConfig, SshConnector, Transport, probe};

/// Where a session is in its lifecycle.
///
/// ```text
/// Disconnected -> Probing -> Authenticating -> PromptUnknown -> Ready
///       ^                                           |            |
///       +------------------ disconnect() -----------+------------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No transport held.
    Disconnected,
    /// Reachability probe in flight.
    Probing,
    /// Transport opened, login in flight.
    Authenticating,
    /// Logged in, prompt not (yet) discovered.
    PromptUnknown,
    /// Prompt discovered; commands may be executed.
    Ready,
}

impl SessionState {
    /// Whether the session holds an authenticated transport.
    pub fn is_connected(self) -> bool {
        matches!(self, SessionState::PromptUnknown | SessionState::Ready)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Disconnected => "disconnected",
            SessionState::Probing => "probing",
            SessionState::Authenticating => "authenticating",
            SessionState::PromptUnknown => "prompt-unknown",
            SessionState::Ready => "ready",
        };
        f.write_str(name)
    }
}

/// An interactive CLI session with one network device.
///
/// The session owns its transport and discovered prompt; nothing is shared
/// between sessions. All operations take `&mut self` and run one after the
/// other. Use one session per task to drive several devices.
///
/// # Example
///
/// ```rust,no_run
/// use netprompt::SessionBuilder;
///
/// # async fn example() -> Result<(), netprompt::Error> {
/// let mut session = SessionBuilder::new("192.0.2.1")
///     .username("admin")
///     .password("secret")
///     .build()?;
///
/// session.connect().await?;
/// let response = session.exec("show version").await?;
/// if response.is_complete() {
///     println!("{}", response.body());
/// }
/// session.disconnect().await?;
/// # Ok(())
/// # }
/// ```
pub struct Session<C: Connector = SshConnector> {
    /// Connection configuration.
    config: SshConfig,

    /// Prompt patterns, in priority order.
    registry: PatternRegistry,

    /// Opens the transport on connect.
    connector: C,

    /// Transport (None when disconnected).
    transport: Option<C::Transport>,

    /// Current lifecycle state.
    state: SessionState,

    /// Prompt and pattern committed by discovery.
    discovered: Option<DiscoveredPrompt>,
}

impl<C: Connector> Session<C> {
    /// Create a disconnected session.
    pub fn new(config: SshConfig, registry: PatternRegistry, connector: C) -> Self {
        Self {
            config,
            registry,
            connector,
            transport: None,
            state: SessionState::Disconnected,
            discovered: None,
        }
    }

    /// Probe the host, log in, and discover the prompt.
    ///
    /// On [`SessionError::PromptNotFound`] the session stays logged in
    /// (`PromptUnknown`); call [`disconnect`](Self::disconnect) to release it.
    pub async fn connect(&mut self) -> Result<()> {
        if self.state.is_connected() {
            return Err(SessionError::AlreadyConnected.into());
        }
        self.config.validate()?;

        self.transition(SessionState::Probing);
        if !probe(&self.config.host, self.config.port, self.config.probe_timeout).await {
            self.transition(SessionState::Disconnected);
            return Err(SessionError::ProbeFailed {
                host: self.config.host.clone(),
                port: self.config.port,
            }
            .into());
        }

        self.transition(SessionState::Authenticating);
        let transport = match Self::open_authenticated(&self.connector, &self.config).await {
            Ok(transport) => transport,
            Err(e) => {
                self.transition(SessionState::Disconnected);
                return Err(e);
            }
        };

        self.transition(SessionState::PromptUnknown);
        let transport = self.transport.insert(transport);

        let discovered = detect::find_prompt(transport, &self.registry).await?;
        info!(
            "{} ready, prompt '{}' ({})",
            self.config.socket_addr(),
            discovered.prompt(),
            discovered.device_type()
        );
        self.discovered = Some(discovered);
        self.transition(SessionState::Ready);

        Ok(())
    }

    async fn open_authenticated(connector: &C, config: &SshConfig) -> Result<C::Transport> {
        let mut transport = connector.open(config).await?;
        transport.set_timeout(config.timeout);

        debug!("sending login credentials for user {}", config.username);
        if !transport.login(&config.username, &config.auth).await? {
            if let Err(e) = transport.close().await {
                debug!("closing rejected transport failed: {}", e);
            }
            return Err(SessionError::AuthFailed {
                user: config.username.clone(),
            }
            .into());
        }

        Ok(transport)
    }

    /// Run a command with the default retry budget.
    pub async fn exec(&mut self, command: &str) -> Result<Response> {
        self.exec_with_tries(command, DEFAULT_MAX_TRIES).await
    }

    /// Run a command, allowing up to `max_tries` reads beyond the first.
    pub async fn exec_with_tries(&mut self, command: &str, max_tries: usize) -> Result<Response> {
        let transport = self
            .transport
            .as_mut()
            .ok_or(SessionError::NotConnected)?;
        let discovered = self
            .discovered
            .as_ref()
            .ok_or(SessionError::PromptUnknown)?;

        exec::run_command(transport, discovered, command, max_tries, self.config.timeout).await
    }

    /// Send `exit` and release the transport.
    ///
    /// The session returns to `Disconnected` and may be connected again.
    pub async fn disconnect(&mut self) -> Result<()> {
        let mut transport = self.transport.take().ok_or(SessionError::NotConnected)?;
        self.discovered = None;
        self.transition(SessionState::Disconnected);

        let sent = transport.write(b"exit\n").await;
        transport.close().await?;
        sent
    }

    fn transition(&mut self, next: SessionState) {
        debug!("{}: {} -> {}", self.config.socket_addr(), self.state, next);
        self.state = next;
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Check if the session holds an authenticated transport.
    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// Check if commands can be executed.
    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    /// The discovered prompt.
    pub fn prompt(&self) -> Option<&str> {
        self.discovered.as_ref().map(DiscoveredPrompt::prompt)
    }

    /// Device type tag of the committed pattern.
    pub fn device_type(&self) -> Option<&str> {
        self.discovered.as_ref().map(DiscoveredPrompt::device_type)
    }

    /// The pattern committed by prompt discovery.
    pub fn committed_pattern(&self) -> Option<&PromptPattern> {
        self.discovered.as_ref().map(DiscoveredPrompt::pattern)
    }

    /// Get the connection configuration.
    pub fn config(&self) -> &SshConfig {
        &self.config
    }

    /// Get the pattern registry.
    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }
}

impl<C: Connector> fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .field("username", &self.config.username)
            .field("state", &self.state)
            .field("prompt", &self.prompt())
            .field("device_type", &self.device_type())
            .finish()
    }
}
