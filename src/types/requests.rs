//! Request types
//!
//! Image lists are carried as [`ImageSource`] values and excluded from
//! serialization; the client encodes them to base64 and patches them into
//! the wire body when it shapes the request. The `stream` flag is likewise
//! never part of these structs — it is set on the wire by the processor
//! according to which method was called.

use serde::Serialize;
use serde_json::Value;

use crate::images::ImageSource;

/// Request for `/api/generate`
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Conversation state returned by a previous generate call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<bool>,
    /// Response format constraint (e.g. "json")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Model options (temperature, num_ctx, ...), passed through verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<String>,
    /// Images attached to the prompt, encoded at request time
    #[serde(skip_serializing)]
    pub images: Vec<ImageSource>,
}

/// One turn of a chat conversation
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatMessage {
    /// "system", "user" or "assistant"
    pub role: String,
    pub content: String,
    #[serde(skip_serializing)]
    pub images: Vec<ImageSource>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
            images: Vec::new(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
            images: Vec::new(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
            images: Vec::new(),
        }
    }
}

/// Request for `/api/chat`
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<String>,
}

/// Request for `/api/pull`
#[derive(Debug, Clone, Default)]
pub struct PullRequest {
    pub model: String,
    pub insecure: Option<bool>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Request for `/api/push`
#[derive(Debug, Clone, Default)]
pub struct PushRequest {
    pub model: String,
    pub insecure: Option<bool>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Wire shape shared by pull and push: the daemon takes the model under
/// `name`, with registry credentials alongside.
#[derive(Debug, Serialize)]
pub(crate) struct RegistryWire<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'a str>,
}

impl<'a> RegistryWire<'a> {
    pub(crate) fn from_pull(request: &'a PullRequest) -> Self {
        Self {
            name: &request.model,
            insecure: request.insecure,
            username: request.username.as_deref(),
            password: request.password.as_deref(),
        }
    }

    pub(crate) fn from_push(request: &'a PushRequest) -> Self {
        Self {
            name: &request.model,
            insecure: request.insecure,
            username: request.username.as_deref(),
            password: request.password.as_deref(),
        }
    }
}

/// Request for `/api/delete`; the wire field is `name`
#[derive(Debug, Clone, Serialize)]
pub struct DeleteRequest {
    #[serde(rename = "name")]
    pub model: String,
}

/// Request for `/api/copy`
#[derive(Debug, Clone, Serialize)]
pub struct CopyRequest {
    pub source: String,
    pub destination: String,
}

/// Request for `/api/show`
#[derive(Debug, Clone, Serialize)]
pub struct ShowRequest {
    pub model: String,
}

/// Request for `/api/embeddings`
#[derive(Debug, Clone, Default, Serialize)]
pub struct EmbeddingsRequest {
    pub model: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}
