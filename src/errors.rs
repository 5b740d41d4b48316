//! Error types for the Ollama client
//!
//! Every failure surfaces to the caller as one of these variants; nothing is
//! retried internally. Retry policy, if any, belongs to the caller.

use thiserror::Error;

/// Main error type for client operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network-level failure (connection refused, timeout, broken stream)
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The daemon answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The transport response carried no readable body
    #[error("response carried no readable body")]
    MissingBody,

    /// A framed line (or full body) failed to parse as JSON
    #[error("malformed JSON {line:?}: {source}")]
    Decode {
        line: String,
        source: serde_json::Error,
    },

    /// The daemon sent an explicit error message mid-protocol
    #[error("daemon reported an error: {0}")]
    Protocol(String),

    /// The stream ended before a terminal message arrived
    #[error("stream ended before a done or success message")]
    IncompleteStream,

    /// A one-shot call received a message not marked complete
    #[error("expected a completed response, got a partial message")]
    UnexpectedResponse,

    /// Image content could not be read or encoded
    #[error("image encoding failed: {0}")]
    Encode(String),

    /// A single protocol line exceeded the framing buffer cap
    #[error("line exceeds maximum frame size of {max} bytes")]
    FrameOverflow { max: usize },
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
