//! Bounded command execution against a discovered prompt.

use std::time::{Duration, Instant};

use log::{debug, warn};

use super::detect::DiscoveredPrompt;
use super::response::Response;
use crate::error::{ChannelError, Error, Result};
use crate::transport::Transport;

/// Retries after the first read when a command's output is still incomplete.
pub const DEFAULT_MAX_TRIES: usize = 4;

/// Send `command` and read until the committed prompt returns.
///
/// At most `max_tries + 1` reads are performed. Running out of reads is
/// not an error: the accumulated output comes back with
/// [`Response::complete`] set to `false`. The same happens when the device
/// closes the channel after sending part of the output; a close before any
/// output arrived is returned as [`ChannelError::Closed`].
pub async fn run_command<T: Transport>(
    transport: &mut T,
    discovered: &DiscoveredPrompt,
    command: &str,
    max_tries: usize,
    timeout: Duration,
) -> Result<Response> {
    let start = Instant::now();
    let completion = discovered.completion();

    transport.set_timeout(timeout);
    debug!("sending command: {}", command);
    transport.write(format!("{command}\n").as_bytes()).await?;

    let mut output = Vec::new();
    let mut reads = 0;
    let mut complete = false;

    while reads <= max_tries {
        let read = match transport.read_until(completion).await {
            Ok(read) => read,
            Err(Error::Channel(ChannelError::Closed)) if !output.is_empty() => {
                debug!("channel closed during '{}'", command);
                break;
            }
            Err(e) => return Err(e),
        };
        output.extend_from_slice(&read.data);
        reads += 1;

        if completion.is_match(&output) {
            complete = true;
            break;
        }
    }

    if !complete {
        warn!(
            "'{}' did not return to prompt '{}' after {} reads",
            command,
            discovered.prompt(),
            reads
        );
    }

    Ok(Response::new(
        command,
        String::from_utf8_lossy(&output),
        discovered.prompt(),
        start.elapsed(),
        reads,
        complete,
    ))
}
