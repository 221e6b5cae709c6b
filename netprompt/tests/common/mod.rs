//! Scripted in-memory device shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use netprompt::channel::{PatternBuffer, ReadResult};
use netprompt::error::{ChannelError, Result, TransportError};
use netprompt::{AuthMethod, Connector, SshConfig, Transport};
use regex::bytes::Regex;
use tokio::net::TcpListener;

type Responder = Box<dyn FnMut(&str) -> Vec<u8> + Send>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A device that echoes `prompt_line` after a blank line and answers any
/// other command with one line of output followed by the prompt.
pub fn cli(prompt_line: &str) -> impl FnMut(&str) -> Vec<u8> + Send + 'static {
    let prompt_line = prompt_line.to_string();
    move |input| match input {
        "\n" => format!("\r\n{prompt_line}").into_bytes(),
        "exit\n" => Vec::new(),
        command => {
            let command = command.trim_end();
            format!("{command}\r\noutput of {command}\r\n{prompt_line}").into_bytes()
        }
    }
}

/// Recorded device state.
pub struct Device {
    pub banner: Vec<u8>,
    pub accept_login: bool,
    pub fail_open: bool,
    pub writes: Vec<String>,
    pub reads: usize,
    pub logins: usize,
    pub opens: usize,
    pub closed: bool,
    pub hung_up: bool,
    pub timeouts: Vec<Duration>,
    responder: Responder,
    pending: PatternBuffer,
    trickle: VecDeque<Vec<u8>>,
}

/// Handle to a scripted device, shared by its connector and transports.
#[derive(Clone)]
pub struct ScriptedDevice(Arc<Mutex<Device>>);

impl ScriptedDevice {
    pub fn new(banner: &str, responder: impl FnMut(&str) -> Vec<u8> + Send + 'static) -> Self {
        Self(Arc::new(Mutex::new(Device {
            banner: banner.as_bytes().to_vec(),
            accept_login: true,
            fail_open: false,
            writes: Vec::new(),
            reads: 0,
            logins: 0,
            opens: 0,
            closed: false,
            hung_up: false,
            timeouts: Vec::new(),
            responder: Box::new(responder),
            pending: PatternBuffer::default(),
            trickle: VecDeque::new(),
        })))
    }

    /// Device whose prompt line is `prompt_line`, shown after login.
    pub fn with_prompt(prompt_line: &str) -> Self {
        Self::new(&format!("\r\nUser Access Verification\r\n{prompt_line}"), cli(prompt_line))
    }

    pub fn reject_login(self) -> Self {
        self.state().accept_login = false;
        self
    }

    pub fn fail_open(self) -> Self {
        self.state().fail_open = true;
        self
    }

    /// Queue output that arrives during a later read.
    pub fn trickle(&self, chunk: &str) {
        self.state().trickle.push_back(chunk.as_bytes().to_vec());
    }

    /// Close the channel from the device side once buffered output is read.
    pub fn hang_up(&self) {
        self.state().hung_up = true;
    }

    pub fn state(&self) -> MutexGuard<'_, Device> {
        self.0.lock().unwrap()
    }

    pub fn connector(&self) -> ScriptedConnector {
        ScriptedConnector {
            device: self.clone(),
        }
    }

    /// A transport that has already logged in.
    pub fn logged_in(&self) -> ScriptedTransport {
        let mut device = self.state();
        let banner = device.banner.clone();
        device.pending.extend(&banner);
        ScriptedTransport {
            device: self.clone(),
        }
    }
}

pub struct ScriptedConnector {
    device: ScriptedDevice,
}

impl Connector for ScriptedConnector {
    type Transport = ScriptedTransport;

    async fn open(&self, _config: &SshConfig) -> Result<ScriptedTransport> {
        let mut device = self.device.state();
        if device.fail_open {
            return Err(TransportError::Timeout(Duration::from_secs(5)).into());
        }
        device.opens += 1;
        device.closed = false;
        Ok(ScriptedTransport {
            device: self.device.clone(),
        })
    }
}

pub struct ScriptedTransport {
    device: ScriptedDevice,
}

impl Transport for ScriptedTransport {
    async fn login(&mut self, _username: &str, _auth: &AuthMethod) -> Result<bool> {
        let mut device = self.device.state();
        device.logins += 1;
        if !device.accept_login {
            return Ok(false);
        }
        let banner = device.banner.clone();
        device.pending.extend(&banner);
        Ok(true)
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        let mut device = self.device.state();
        let text = String::from_utf8_lossy(data).into_owned();
        let reply = (device.responder)(&text);
        device.pending.extend(&reply);
        device.writes.push(text);
        Ok(())
    }

    /// Returns through the match if one is buffered; otherwise lets one
    /// trickled chunk arrive, then "times out" with everything buffered.
    /// After a hang-up, a read with nothing left to return fails as closed.
    async fn read_until(&mut self, pattern: &Regex) -> Result<ReadResult> {
        let mut device = self.device.state();
        device.reads += 1;

        if device.pending.search_full(pattern).is_none() {
            if let Some(chunk) = device.trickle.pop_front() {
                device.pending.extend(&chunk);
            }
        }

        if device.hung_up && device.pending.is_empty() {
            return Err(ChannelError::Closed.into());
        }

        match device.pending.search_full(pattern) {
            Some(found) => Ok(ReadResult::matched(device.pending.take_through(found.end))),
            None => Ok(ReadResult::unmatched(device.pending.take())),
        }
    }

    fn set_timeout(&mut self, timeout: Duration) {
        self.device.state().timeouts.push(timeout);
    }

    async fn close(self) -> Result<()> {
        self.device.state().closed = true;
        Ok(())
    }
}

/// A local port that accepts TCP connections, for the reachability probe.
pub async fn listening_port() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

/// A local port with nothing listening.
pub async fn closed_port() -> u16 {
    let (listener, port) = listening_port().await;
    drop(listener);
    port
}
