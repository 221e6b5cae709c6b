//! Response type for command execution results.

use std::time::Duration;

/// Response from a command execution.
#[derive(Debug, Clone)]
pub struct Response {
    /// The command that was executed.
    pub command: String,

    /// Everything read after sending the command, including the command
    /// echo and (when complete) the trailing prompt.
    pub result: String,

    /// The committed prompt the output was delimited by.
    pub prompt: String,

    /// Time taken to execute the command.
    pub elapsed: Duration,

    /// Number of bounded reads performed.
    pub reads: usize,

    /// Whether the completion expression matched. `false` means the read
    /// budget ran out and `result` may be truncated.
    pub complete: bool,
}

impl Response {
    /// Create a new response.
    pub fn new(
        command: impl Into<String>,
        result: impl Into<String>,
        prompt: impl Into<String>,
        elapsed: Duration,
        reads: usize,
        complete: bool,
    ) -> Self {
        Self {
            command: command.into(),
            result: result.into(),
            prompt: prompt.into(),
            elapsed,
            reads,
            complete,
        }
    }

    /// Check if the trailing prompt was seen.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// The output without the command echo and, if complete, the trailing
    /// prompt line.
    pub fn body(&self) -> &str {
        let trimmed = self.result.trim_start_matches(['\r', '\n']);
        let output = trimmed
            .strip_prefix(self.command.as_str())
            .unwrap_or(trimmed)
            .trim_start_matches(['\r', '\n']);

        if !self.complete {
            return output;
        }

        match output.rfind('\n') {
            Some(pos) => output[..pos].trim_end_matches('\r'),
            None => "",
        }
    }

    /// Get the result lines as an iterator.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.result.lines()
    }

    /// Check if the result contains a substring.
    pub fn contains(&self, pattern: &str) -> bool {
        self.result.contains(pattern)
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.result)
    }
}
