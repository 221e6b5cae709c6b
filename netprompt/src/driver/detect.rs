//! Prompt discovery.
//!
//! A device's prompt is not known up front, so it is inferred from the
//! output seen after login. Each line is run through the pattern registry
//! in order; a structural match only yields a *candidate*. The candidate is
//! validated by sending a blank line and waiting for the same prompt to
//! come back in the position the pattern's match template expects. Lines
//! of ordinary output that happen to look like `word#` fail that round
//! trip and are skipped.

use log::{debug, trace};
use regex::bytes::Regex;

use crate::error::{PatternError, Result, SessionError};
use crate::platform::{PatternRegistry, PromptPattern};
use crate::transport::Transport;

/// Number of reads scanned for a prompt before giving up.
pub const MAX_PROMPT_ATTEMPTS: usize = 5;

/// Read terminator while scanning: a line up to its last `>` or `#`.
///
/// `.` stops at `\n`, so one scanning read consumes a whole line of
/// banner art like `#####` instead of a single character of it.
const ACTIVITY_SENTINEL: &str = r".*[>#]";

/// A validated prompt together with the pattern that found it.
#[derive(Debug, Clone)]
pub struct DiscoveredPrompt {
    prompt: String,
    pattern: PromptPattern,
    completion: Regex,
}

impl DiscoveredPrompt {
    /// The literal prompt text (e.g., the hostname).
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The pattern whose candidate validated.
    pub fn pattern(&self) -> &PromptPattern {
        &self.pattern
    }

    /// Device type tag of the committed pattern.
    pub fn device_type(&self) -> &str {
        self.pattern.device_type()
    }

    /// Completion expression: the quoted prompt in the pattern's template.
    pub fn completion(&self) -> &Regex {
        &self.completion
    }
}

/// Find and validate the device prompt.
///
/// Performs at most [`MAX_PROMPT_ATTEMPTS`] scanning reads. The first
/// candidate, in line order then registry order, whose validation read
/// matches is returned; nothing else is examined after that.
pub async fn find_prompt<T: Transport>(
    transport: &mut T,
    registry: &PatternRegistry,
) -> Result<DiscoveredPrompt> {
    if registry.is_empty() {
        debug!("no prompt patterns registered");
        return Err(SessionError::PromptNotFound { attempts: 0 }.into());
    }

    let sentinel = Regex::new(ACTIVITY_SENTINEL).map_err(PatternError::from)?;

    for attempt in 1..=MAX_PROMPT_ATTEMPTS {
        debug!("looking for prompt, try {}", attempt);
        let read = transport.read_until(&sentinel).await?;

        for line in read.data.split(|b| *b == b'\n') {
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            for pattern in registry {
                let Some(candidate) = pattern.detect(line) else {
                    trace!(
                        "line did not match pattern {}: {}",
                        pattern.detect_regex().as_str(),
                        String::from_utf8_lossy(line).trim_end()
                    );
                    continue;
                };

                debug!(
                    "candidate prompt '{}' from {} pattern",
                    candidate,
                    pattern.device_type()
                );

                if let Some(completion) = validate(transport, pattern, &candidate).await? {
                    debug!("'{}' really is a prompt", candidate);
                    return Ok(DiscoveredPrompt {
                        prompt: candidate,
                        pattern: pattern.clone(),
                        completion,
                    });
                }

                debug!(
                    "'{}' failed validation, trying next pattern",
                    candidate
                );
            }
        }
    }

    Err(SessionError::PromptNotFound {
        attempts: MAX_PROMPT_ATTEMPTS,
    }
    .into())
}

/// Send a blank line and check the candidate comes back as a prompt.
async fn validate<T: Transport>(
    transport: &mut T,
    pattern: &PromptPattern,
    candidate: &str,
) -> Result<Option<Regex>> {
    let completion = pattern.completion_regex(candidate)?;
    trace!("validating with {}", completion.as_str());

    transport.write(b"\n").await?;
    let echo = transport.read_until(&completion).await?;

    Ok(echo.pattern_matched.then_some(completion))
}
