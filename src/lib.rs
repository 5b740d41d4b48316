//! ollama-client — streaming client for the Ollama HTTP API
//!
//! Talks to a local Ollama-compatible daemon over HTTP in two modes: a
//! single buffered response, or an NDJSON stream of partial results ending
//! in an explicit terminal message. Partial network reads are framed into
//! discrete JSON messages; completion and mid-stream error signaling are
//! handled uniformly across endpoints.
//!
//! # Example
//!
//! ```no_run
//! use futures_util::StreamExt;
//! use ollama_client::{ChatMessage, ChatRequest, Ollama};
//!
//! # async fn run() -> ollama_client::Result<()> {
//! let client = Ollama::new()?;
//! let mut stream = client
//!     .chat_stream(ChatRequest {
//!         model: "llama2".to_string(),
//!         messages: vec![ChatMessage::user("Why is the sky blue?")],
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! while let Some(chunk) = stream.next().await {
//!     if let Some(reply) = chunk?.message {
//!         print!("{}", reply.content);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod errors;
pub mod images;
pub mod streaming;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use client::{Ollama, ResponseStream};
pub use config::{Config, DEFAULT_HOST};
pub use errors::{ClientError, Result};
pub use images::ImageSource;
pub use types::requests::{
    ChatMessage, ChatRequest, CopyRequest, DeleteRequest, EmbeddingsRequest, GenerateRequest,
    PullRequest, PushRequest, ShowRequest,
};
pub use types::responses::{
    ChatReply, ChatResponse, EmbeddingsResponse, GenerateResponse, ListResponse, ModelSummary,
    ProgressResponse, ShowResponse, StatusResponse,
};
