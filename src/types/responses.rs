//! Response types
//!
//! Streamed chunks and buffered one-shot payloads share these shapes, so
//! most fields are optional or defaulted: a mid-stream generate chunk
//! carries only the token and `done: false`, while the final message adds
//! context and timing counters.

use serde::Deserialize;
use serde_json::Value;

/// One message from `/api/generate`
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub model: String,
    pub created_at: Option<String>,
    /// Token fragment (streaming) or the full completion (one-shot)
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub done: bool,
    /// Conversation state, present on the terminal message
    pub context: Option<Vec<i64>>,
    pub total_duration: Option<u64>,
    pub load_duration: Option<u64>,
    pub prompt_eval_count: Option<u64>,
    pub prompt_eval_duration: Option<u64>,
    pub eval_count: Option<u64>,
    pub eval_duration: Option<u64>,
}

/// Assistant message carried by a chat response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

/// One message from `/api/chat`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub model: String,
    pub created_at: Option<String>,
    pub message: Option<ChatReply>,
    #[serde(default)]
    pub done: bool,
    pub total_duration: Option<u64>,
    pub load_duration: Option<u64>,
    pub prompt_eval_count: Option<u64>,
    pub prompt_eval_duration: Option<u64>,
    pub eval_count: Option<u64>,
    pub eval_duration: Option<u64>,
}

/// One progress message from `/api/pull` or `/api/push`
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressResponse {
    pub status: String,
    pub digest: Option<String>,
    pub total: Option<u64>,
    pub completed: Option<u64>,
}

/// Fixed status result for delete/copy
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub(crate) fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }
}

/// Entry in the `/api/tags` model list
#[derive(Debug, Clone, Deserialize)]
pub struct ModelSummary {
    pub name: String,
    pub modified_at: Option<String>,
    pub size: Option<u64>,
    pub digest: Option<String>,
}

/// Result of `/api/tags`
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse {
    pub models: Vec<ModelSummary>,
}

impl ListResponse {
    /// Convenience accessor for just the model names
    pub fn model_names(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.name.as_str()).collect()
    }
}

/// Model metadata from `/api/show`
#[derive(Debug, Clone, Deserialize)]
pub struct ShowResponse {
    pub license: Option<String>,
    pub modelfile: Option<String>,
    pub parameters: Option<String>,
    pub template: Option<String>,
    pub system: Option<String>,
    pub details: Option<Value>,
}

/// Result of `/api/embeddings`
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingsResponse {
    pub embedding: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_generate_chunk_parses() {
        let chunk: GenerateResponse =
            serde_json::from_str(r#"{"response":"Hi","done":false}"#).unwrap();
        assert_eq!(chunk.response, "Hi");
        assert!(!chunk.done);
        assert!(chunk.context.is_none());
    }

    #[test]
    fn test_terminal_generate_chunk_parses() {
        let chunk: GenerateResponse = serde_json::from_str(
            r#"{"model":"llama2","response":"","done":true,"context":[1,2],"eval_count":9}"#,
        )
        .unwrap();
        assert!(chunk.done);
        assert_eq!(chunk.context, Some(vec![1, 2]));
        assert_eq!(chunk.eval_count, Some(9));
    }

    #[test]
    fn test_chat_chunk_without_role_parses() {
        let chunk: ChatResponse =
            serde_json::from_str(r#"{"message":{"content":"Hi"},"done":false}"#).unwrap();
        assert_eq!(chunk.message.unwrap().content, "Hi");
    }

    #[test]
    fn test_list_model_names() {
        let list: ListResponse =
            serde_json::from_str(r#"{"models":[{"name":"llama2"},{"name":"mistral"}]}"#).unwrap();
        assert_eq!(list.model_names(), vec!["llama2", "mistral"]);
    }

    #[test]
    fn test_progress_chunk_parses() {
        let chunk: ProgressResponse = serde_json::from_str(
            r#"{"status":"downloading","digest":"sha256:ab","total":100,"completed":40}"#,
        )
        .unwrap();
        assert_eq!(chunk.status, "downloading");
        assert_eq!(chunk.completed, Some(40));
    }
}
