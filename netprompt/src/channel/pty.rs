//! PTY channel abstraction for interactive sessions.

use std::time::Duration;

use log::trace;
use regex::bytes::Regex;
use russh::client::Msg;
use russh::{Channel, ChannelMsg};
use tokio::time::Instant;

use super::buffer::PatternBuffer;
use crate::error::{ChannelError, Result};

/// High-level PTY channel for interactive device sessions.
///
/// Wraps a russh shell channel and provides bounded, pattern-terminated
/// reads on top of a [`PatternBuffer`].
pub struct PtyChannel {
    /// The underlying russh channel.
    channel: Channel<Msg>,

    /// Pattern buffer for accumulating output.
    buffer: PatternBuffer,

    /// Per-read timeout.
    timeout: Duration,
}

impl PtyChannel {
    /// Wrap an open shell channel.
    pub fn new(channel: Channel<Msg>, search_depth: usize, timeout: Duration) -> Self {
        Self {
            channel,
            buffer: PatternBuffer::new(search_depth),
            timeout,
        }
    }

    /// Set the per-read timeout.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Write raw bytes to the channel without waiting for a reply.
    pub async fn send(&mut self, data: &[u8]) -> Result<()> {
        self.channel.data(data).await.map_err(ChannelError::Ssh)?;
        Ok(())
    }

    /// Read until `pattern` matches the buffered output or the timeout elapses.
    ///
    /// On a match, output through the end of the match is returned and the
    /// remainder stays buffered. On timeout, everything buffered so far is
    /// returned with `pattern_matched == false`.
    pub async fn read_until(&mut self, pattern: &Regex) -> Result<ReadResult> {
        let deadline = Instant::now() + self.timeout;

        loop {
            if let Some(found) = self.buffer.search_tail(pattern) {
                return Ok(ReadResult::matched(self.buffer.take_through(found.end)));
            }

            match tokio::time::timeout_at(deadline, self.channel.wait()).await {
                Err(_) => {
                    trace!(
                        "read timed out after {:?} waiting for {}",
                        self.timeout,
                        pattern.as_str()
                    );
                    return Ok(ReadResult::unmatched(self.buffer.take()));
                }
                Ok(Some(ChannelMsg::Data { data })) => self.buffer.extend(&data),
                Ok(Some(ChannelMsg::ExtendedData { data, .. })) => self.buffer.extend(&data),
                Ok(Some(ChannelMsg::Eof | ChannelMsg::Close)) | Ok(None) => {
                    if self.buffer.is_empty() {
                        return Err(ChannelError::Closed.into());
                    }
                    return Ok(ReadResult::unmatched(self.buffer.take()));
                }
                Ok(Some(_)) => {}
            }
        }
    }

    /// Send EOF on the channel.
    pub async fn close(self) -> Result<()> {
        self.channel.eof().await.map_err(ChannelError::Ssh)?;
        Ok(())
    }
}

/// Result of a read operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadResult {
    /// The data that was read.
    pub data: Vec<u8>,

    /// Whether the pattern was matched.
    pub pattern_matched: bool,
}

impl ReadResult {
    /// A read that ended on a pattern match.
    pub fn matched(data: Vec<u8>) -> Self {
        Self {
            data,
            pattern_matched: true,
        }
    }

    /// A read that ended on timeout or channel close.
    pub fn unmatched(data: Vec<u8>) -> Self {
        Self {
            data,
            pattern_matched: false,
        }
    }
}
