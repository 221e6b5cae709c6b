//! Prompt pattern definition.

use regex::bytes::Regex;
use serde::{Deserialize, Serialize};

use crate::error::PatternError;

/// Substitution slot in a match template.
pub const PROMPT_PLACEHOLDER: &str = "%s";

/// A prompt-recognition rule.
///
/// `detect` pulls a candidate prompt out of a single line of output (its
/// first capturing group). `match_template` becomes a completion expression
/// once the regex-quoted prompt replaces its `%s` slot.
#[derive(Debug, Clone)]
pub struct PromptPattern {
    /// Device type tag (e.g., "cisco", "aruba").
    device_type: String,

    /// Compiled detect expression.
    detect: Regex,

    /// Match template with exactly one `%s` slot.
    match_template: String,
}

impl PromptPattern {
    /// Create a new prompt pattern, validating both expressions.
    pub fn new(
        device_type: impl Into<String>,
        detect: &str,
        match_template: impl Into<String>,
    ) -> Result<Self, PatternError> {
        let device_type = device_type.into();
        let match_template = match_template.into();

        let detect = Regex::new(detect)?;
        if detect.captures_len() < 2 {
            return Err(PatternError::InvalidDefinition {
                device_type,
                message: "detect expression needs a capturing group".to_string(),
            });
        }

        let slots = match_template.matches(PROMPT_PLACEHOLDER).count();
        if slots != 1 {
            return Err(PatternError::InvalidDefinition {
                device_type,
                message: format!("match template needs exactly one '%s' slot, found {slots}"),
            });
        }

        let pattern = Self {
            device_type,
            detect,
            match_template,
        };

        // Make sure the template is a valid regex once a prompt is in place.
        pattern.completion_regex("prompt")?;

        Ok(pattern)
    }

    /// Get the device type tag.
    pub fn device_type(&self) -> &str {
        &self.device_type
    }

    /// Get the compiled detect expression.
    pub fn detect_regex(&self) -> &Regex {
        &self.detect
    }

    /// Get the raw match template.
    pub fn match_template(&self) -> &str {
        &self.match_template
    }

    /// Extract a candidate prompt from one line of output.
    ///
    /// Returns the text of the first capturing group, or `None` if the line
    /// does not structurally match (or the group captured nothing).
    pub fn detect(&self, line: &[u8]) -> Option<String> {
        let captures = self.detect.captures(line)?;
        let candidate = captures.get(1)?;
        if candidate.is_empty() {
            return None;
        }
        Some(String::from_utf8_lossy(candidate.as_bytes()).into_owned())
    }

    /// Build the completion expression for a concrete prompt.
    ///
    /// The prompt is quoted so it matches literally.
    pub fn completion_regex(&self, prompt: &str) -> Result<Regex, PatternError> {
        let pattern = self
            .match_template
            .replacen(PROMPT_PLACEHOLDER, &regex::escape(prompt), 1);
        Ok(Regex::new(&pattern)?)
    }

    /// Export this pattern as a serializable record.
    pub fn to_spec(&self) -> PatternSpec {
        PatternSpec {
            device_type: self.device_type.clone(),
            detect: self.detect.as_str().to_string(),
            match_template: self.match_template.clone(),
        }
    }
}

/// Serializable form of a [`PromptPattern`].
///
/// This is the record type of an externalized pattern file:
///
/// ```json
/// [{ "deviceType": "cisco", "detect": "...", "match": "(.*)%s.*(>|#)\\s*" }]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSpec {
    /// Device type tag.
    #[serde(rename = "deviceType", alias = "device_type", alias = "devicetype")]
    pub device_type: String,

    /// Detect expression source.
    pub detect: String,

    /// Match template source.
    #[serde(rename = "match")]
    pub match_template: String,
}

impl TryFrom<PatternSpec> for PromptPattern {
    type Error = PatternError;

    fn try_from(spec: PatternSpec) -> Result<Self, Self::Error> {
        PromptPattern::new(spec.device_type, &spec.detect, spec.match_template)
    }
}
