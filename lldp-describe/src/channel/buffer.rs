//! Output buffer with tail-only prompt search.
//!
//! Prompts always sit at the very end of a response, so only the last
//! `search_depth` bytes are searched. Long outputs (large interface tables)
//! do not make prompt detection slower.

use std::fmt;

use bytes::BytesMut;
use regex::bytes::Regex;
use vte::{Parser, Perform};

/// Accumulates device output and searches its tail for prompt patterns.
///
/// Terminal control sequences (colors, cursor movement) and carriage returns
/// are dropped on the way in, so the buffer holds plain `\n`-separated text.
pub struct PatternBuffer {
    buffer: BytesMut,

    /// Escape-sequence state, kept across chunks so a sequence split
    /// between two reads is still removed.
    parser: Parser,

    /// How many bytes from the end to search for patterns.
    search_depth: usize,
}

impl PatternBuffer {
    /// Create a new pattern buffer with the specified search depth.
    pub fn new(search_depth: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
            parser: Parser::new(),
            search_depth,
        }
    }

    /// Extend the buffer with raw channel data.
    pub fn extend(&mut self, data: &[u8]) {
        let mut printer = Printer {
            out: &mut self.buffer,
        };
        self.parser.advance(&mut printer, data);
    }

    /// Check the last `search_depth` bytes for a pattern match.
    pub fn tail_contains(&self, pattern: &Regex) -> bool {
        pattern.is_match(self.tail())
    }

    fn tail(&self) -> &[u8] {
        let start = self.buffer.len().saturating_sub(self.search_depth);
        &self.buffer[start..]
    }

    /// Take the buffer contents, leaving it empty.
    pub fn take(&mut self) -> Vec<u8> {
        self.buffer.split().to_vec()
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

/// Collects printable characters and line structure, discarding everything
/// the terminal would interpret as control.
struct Printer<'a> {
    out: &'a mut BytesMut,
}

impl Perform for Printer<'_> {
    fn print(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.out.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    }

    fn execute(&mut self, byte: u8) {
        if matches!(byte, b'\n' | b'\t') {
            self.out.extend_from_slice(&[byte]);
        }
    }
}
