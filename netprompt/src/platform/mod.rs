//! Prompt pattern definitions for multi-vendor support.
//!
//! A [`PatternRegistry`] is plain data: an ordered list of
//! [`PromptPattern`]s consumed by the prompt detector. Built-in patterns
//! live in [`vendors`]; callers can extend the list or load it from JSON.

mod pattern;
mod registry;
pub mod vendors;

pub use pattern::{PROMPT_PLACEHOLDER, PatternSpec, PromptPattern};
pub use registry::PatternRegistry;
