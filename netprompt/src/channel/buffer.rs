//! Accumulation buffer for device output.
//!
//! Prompts show up at the end of whatever the device just sent, so reads
//! only scan the last `search_depth` bytes. The scan runs after every
//! chunk, which keeps a freshly arrived prompt inside that window.

use std::fmt;
use std::ops::Range;

use bytes::BytesMut;
use regex::bytes::Regex;
use vte::{Parser, Perform};

/// Default number of trailing bytes scanned for a prompt.
pub const DEFAULT_SEARCH_DEPTH: usize = 1000;

/// Device output with terminal escapes removed, awaiting a delimiter.
///
/// Bytes that arrive after a match stay buffered for the next read, the
/// way a blocking `read(regex)` on an SSH client behaves.
pub struct PatternBuffer {
    buffer: BytesMut,
    search_depth: usize,
    /// Keeps escape-sequence state across chunks.
    parser: Parser,
}

impl PatternBuffer {
    pub fn new(search_depth: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
            search_depth,
            parser: Parser::new(),
        }
    }

    /// Append a chunk of raw channel data.
    pub fn extend(&mut self, data: &[u8]) {
        let mut text = PlainText(Vec::with_capacity(data.len()));
        self.parser.advance(&mut text, data);
        self.buffer.extend_from_slice(&text.0);
    }

    /// Find `pattern` within the trailing `search_depth` bytes.
    ///
    /// The returned range is an offset into the whole buffer.
    pub fn search_tail(&self, pattern: &Regex) -> Option<Range<usize>> {
        let window = self.buffer.len().saturating_sub(self.search_depth);
        pattern
            .find(&self.buffer[window..])
            .map(|m| window + m.start()..window + m.end())
    }

    /// Find `pattern` anywhere in the buffer.
    pub fn search_full(&self, pattern: &Regex) -> Option<Range<usize>> {
        pattern.find(&self.buffer).map(|m| m.range())
    }

    /// Remove and return everything before `end`; the rest stays buffered.
    pub fn take_through(&mut self, end: usize) -> Vec<u8> {
        let end = end.min(self.buffer.len());
        self.buffer.split_to(end).to_vec()
    }

    /// Drain the whole buffer.
    pub fn take(&mut self) -> Vec<u8> {
        self.buffer.split().to_vec()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for PatternBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEPTH)
    }
}

impl fmt::Debug for PatternBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternBuffer")
            .field("len", &self.buffer.len())
            .field("search_depth", &self.search_depth)
            .finish()
    }
}

/// vte sink keeping printable text and line control characters.
struct PlainText(Vec<u8>);

impl Perform for PlainText {
    fn print(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.0.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    }

    fn execute(&mut self, byte: u8) {
        if matches!(byte, b'\n' | b'\r' | b'\t') {
            self.0.push(byte);
        }
    }
}
