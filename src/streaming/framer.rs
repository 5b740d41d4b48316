//! Incremental line framer for NDJSON responses
//!
//! Converts a stream of byte chunks of arbitrary, non-aligned size into
//! complete newline-delimited lines, buffering any trailing partial line
//! (including a split multi-byte UTF-8 sequence) across chunk boundaries.
//!
//! One framer is bound to one response stream; it is not reusable.

use crate::errors::{ClientError, Result};

/// Maximum size of a single buffered line (1MB)
pub const MAX_LINE_SIZE: usize = 1_048_576;

/// Push-based line framer
#[derive(Debug)]
pub struct LineFramer {
    /// Trailing partial line carried between chunks
    buffer: Vec<u8>,

    /// Maximum buffered line size
    max_line_size: usize,
}

impl LineFramer {
    /// Create a framer with the default line size cap
    pub fn new() -> Self {
        Self::with_capacity(MAX_LINE_SIZE)
    }

    /// Create a framer with a custom line size cap
    pub fn with_capacity(max_line_size: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(4096),
            max_line_size,
        }
    }

    /// Add a chunk and return every line it completes, in order.
    ///
    /// Lines are stripped of the trailing `\n` (and an optional `\r` before
    /// it). Empty lines carry no message and are skipped. Bytes after the
    /// last delimiter stay buffered until a later chunk or [`finish`]
    /// resolves them.
    ///
    /// [`finish`]: LineFramer::finish
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<String>> {
        if self.buffer.len() + chunk.len() > self.max_line_size {
            return Err(ClientError::FrameOverflow {
                max: self.max_line_size,
            });
        }

        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
            line.pop(); // delimiter
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if line.is_empty() {
                continue;
            }
            // NDJSON is UTF-8 by contract
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }

        Ok(lines)
    }

    /// Signal end-of-stream.
    ///
    /// A well-formed protocol run always ends on a line boundary, so a
    /// non-empty unterminated fragment left here means the stream was cut
    /// mid-line and no terminal line was ever framed.
    pub fn finish(&self) -> Result<()> {
        if self.buffer.is_empty() {
            Ok(())
        } else {
            Err(ClientError::IncompleteStream)
        }
    }

    /// Bytes currently buffered as a partial line
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}
