//! Ordered registry of prompt patterns.

use std::fs;
use std::path::Path;

use super::pattern::{PatternSpec, PromptPattern};
use super::vendors;
use crate::error::{PatternError, Result};

/// Ordered collection of prompt patterns.
///
/// Order is match priority: the prompt detector tries patterns front to
/// back and commits to the first one whose candidate validates. The
/// registry is handed to a session at construction and is not mutated
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    patterns: Vec<PromptPattern>,
}

impl PatternRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Create a registry holding the built-in vendor patterns.
    pub fn builtin() -> Result<Self> {
        Ok(Self {
            patterns: vendors::builtin_patterns()?,
        })
    }

    /// Build a registry from serializable records, keeping their order.
    pub fn from_specs(specs: impl IntoIterator<Item = PatternSpec>) -> Result<Self> {
        let patterns = specs
            .into_iter()
            .map(PromptPattern::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Parse a JSON array of `{deviceType, detect, match}` records.
    pub fn from_json(json: &str) -> Result<Self> {
        let specs: Vec<PatternSpec> = serde_json::from_str(json).map_err(PatternError::from)?;
        Self::from_specs(specs)
    }

    /// Load a JSON pattern file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(PatternError::from)?;
        Self::from_json(&json)
    }

    /// Export the registry as serializable records.
    pub fn to_specs(&self) -> Vec<PatternSpec> {
        self.patterns.iter().map(PromptPattern::to_spec).collect()
    }

    /// Serialize the registry to a pretty-printed JSON array.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_specs()).map_err(PatternError::from)?)
    }

    /// Append a pattern (lowest priority).
    pub fn push(&mut self, pattern: PromptPattern) {
        self.patterns.push(pattern);
    }

    /// Insert a pattern ahead of all others (highest priority).
    pub fn prepend(&mut self, pattern: PromptPattern) {
        self.patterns.insert(0, pattern);
    }

    /// Append a pattern, builder style.
    pub fn with_pattern(mut self, pattern: PromptPattern) -> Self {
        self.push(pattern);
        self
    }

    /// Iterate patterns in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &PromptPattern> {
        self.patterns.iter()
    }

    /// Get the first pattern with this device type.
    pub fn get(&self, device_type: &str) -> Option<&PromptPattern> {
        self.patterns.iter().find(|p| p.device_type() == device_type)
    }

    /// List device types in priority order.
    pub fn device_types(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(PromptPattern::device_type)
    }

    /// Number of registered patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Check if no patterns are registered.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl<'a> IntoIterator for &'a PatternRegistry {
    type Item = &'a PromptPattern;
    type IntoIter = std::slice::Iter<'a, PromptPattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.iter()
    }
}
