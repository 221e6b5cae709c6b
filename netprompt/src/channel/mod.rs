//! Channel layer for buffered, pattern-terminated reads.
//!
//! This module handles the interactive shell channel, including tail
//! search for prompt patterns and ANSI stripping.

mod buffer;
mod pty;

pub use buffer::{DEFAULT_SEARCH_DEPTH, PatternBuffer};
pub use pty::{PtyChannel, ReadResult};
