//! Built-in prompt patterns.
//!
//! Patterns are tried in order, so the most specific forms come first:
//! bracketed/parenthesized vendor prompts, then IOS-XR, then the generic
//! trailing `#`/`>` form.

pub mod aruba;
pub mod cisco;

use super::PromptPattern;
use crate::error::PatternError;

/// The default pattern set, in priority order.
pub fn builtin_patterns() -> Result<Vec<PromptPattern>, PatternError> {
    Ok(vec![
        aruba::controller()?,
        aruba::clearpass()?,
        cisco::iosxr()?,
        cisco::generic()?,
    ])
}
