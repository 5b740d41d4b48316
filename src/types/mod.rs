//! Request and response types for the daemon API
//!
//! Requests serialize to the wire shapes the daemon expects; responses stay
//! lenient so both partial stream chunks and full one-shot payloads parse.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    ChatMessage, ChatRequest, CopyRequest, DeleteRequest, EmbeddingsRequest, GenerateRequest,
    PullRequest, PushRequest, ShowRequest,
};
pub use responses::{
    ChatReply, ChatResponse, EmbeddingsResponse, GenerateResponse, ListResponse, ModelSummary,
    ProgressResponse, ShowResponse, StatusResponse,
};
