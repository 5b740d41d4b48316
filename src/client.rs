//! Ollama API client
//!
//! One `Ollama` instance holds an immutable [`Config`] and a shared
//! [`Transport`]; concurrent calls are independent of each other. Each
//! streamable endpoint comes as an explicit pair: a one-shot method awaiting
//! the single completed response, and a `_stream` method returning a lazy
//! message sequence.

use std::sync::Arc;

use futures_util::stream::StreamExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::errors::{ClientError, Result};
use crate::images::encode_all;
use crate::streaming::{self, Completion};
use crate::transport::{self, HttpTransport, Method, Transport};
use crate::types::requests::{
    ChatRequest, CopyRequest, DeleteRequest, EmbeddingsRequest, GenerateRequest, PullRequest,
    PushRequest, RegistryWire, ShowRequest,
};
use crate::types::responses::{
    ChatResponse, EmbeddingsResponse, GenerateResponse, ListResponse, ProgressResponse,
    ShowResponse, StatusResponse,
};

/// Lazy sequence of typed protocol messages
pub type ResponseStream<T> =
    std::pin::Pin<Box<dyn futures_util::Stream<Item = Result<T>> + Send>>;

/// Client for the Ollama HTTP API
pub struct Ollama {
    config: Config,
    transport: Arc<dyn Transport>,
}

impl Ollama {
    /// Create a client against the default local daemon
    pub fn new() -> Result<Self> {
        Self::with_config(Config::new())
    }

    /// Create a client with a custom configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self {
            config,
            transport: Arc::new(HttpTransport::new()?),
        })
    }

    /// Create a client with a substitute transport, for testing or proxying
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// The client's configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // --- generate ---

    /// Run a completion and await the single finished response.
    pub async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        debug!(model = %request.model, "generate");
        let body = self.generate_body(&request).await?;
        let url = self.config.endpoint_url("generate");
        let message =
            streaming::request_once(self.transport.as_ref(), &url, body, Completion::DoneFlag)
                .await?;
        typed(message)
    }

    /// Run a completion as a lazy token stream, ending on `done: true`.
    pub async fn generate_stream(
        &self,
        request: GenerateRequest,
    ) -> Result<ResponseStream<GenerateResponse>> {
        debug!(model = %request.model, "generate (streaming)");
        let body = self.generate_body(&request).await?;
        let url = self.config.endpoint_url("generate");
        let stream =
            streaming::request_stream(self.transport.as_ref(), &url, body, Completion::DoneFlag)
                .await?;
        Ok(stream.map(|item| item.and_then(typed::<GenerateResponse>)).boxed())
    }

    async fn generate_body(&self, request: &GenerateRequest) -> Result<Value> {
        let mut body = to_body(request)?;
        if !request.images.is_empty() {
            body["images"] = encoded_array(encode_all(&request.images).await?);
        }
        Ok(body)
    }

    // --- chat ---

    /// Send a conversation and await the single finished reply.
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        debug!(model = %request.model, turns = request.messages.len(), "chat");
        let body = self.chat_body(&request).await?;
        let url = self.config.endpoint_url("chat");
        let message =
            streaming::request_once(self.transport.as_ref(), &url, body, Completion::DoneFlag)
                .await?;
        typed(message)
    }

    /// Send a conversation as a lazy reply stream, ending on `done: true`.
    pub async fn chat_stream(&self, request: ChatRequest) -> Result<ResponseStream<ChatResponse>> {
        debug!(model = %request.model, turns = request.messages.len(), "chat (streaming)");
        let body = self.chat_body(&request).await?;
        let url = self.config.endpoint_url("chat");
        let stream =
            streaming::request_stream(self.transport.as_ref(), &url, body, Completion::DoneFlag)
                .await?;
        Ok(stream.map(|item| item.and_then(typed::<ChatResponse>)).boxed())
    }

    async fn chat_body(&self, request: &ChatRequest) -> Result<Value> {
        let mut body = to_body(request)?;
        for (index, message) in request.messages.iter().enumerate() {
            if !message.images.is_empty() {
                body["messages"][index]["images"] =
                    encoded_array(encode_all(&message.images).await?);
            }
        }
        Ok(body)
    }

    // --- model transfer ---

    /// Pull a model from a registry, awaiting the final success status.
    pub async fn pull(&self, request: PullRequest) -> Result<ProgressResponse> {
        let body = to_body(&RegistryWire::from_pull(&request))?;
        let url = self.config.endpoint_url("pull");
        let message = streaming::request_once(
            self.transport.as_ref(),
            &url,
            body,
            Completion::SuccessStatus,
        )
        .await?;
        typed(message)
    }

    /// Pull a model, streaming download progress until `status: "success"`.
    pub async fn pull_stream(
        &self,
        request: PullRequest,
    ) -> Result<ResponseStream<ProgressResponse>> {
        let body = to_body(&RegistryWire::from_pull(&request))?;
        let url = self.config.endpoint_url("pull");
        let stream = streaming::request_stream(
            self.transport.as_ref(),
            &url,
            body,
            Completion::SuccessStatus,
        )
        .await?;
        Ok(stream.map(|item| item.and_then(typed::<ProgressResponse>)).boxed())
    }

    /// Push a model to a registry, awaiting the final success status.
    pub async fn push(&self, request: PushRequest) -> Result<ProgressResponse> {
        let body = to_body(&RegistryWire::from_push(&request))?;
        let url = self.config.endpoint_url("push");
        let message = streaming::request_once(
            self.transport.as_ref(),
            &url,
            body,
            Completion::SuccessStatus,
        )
        .await?;
        typed(message)
    }

    /// Push a model, streaming upload progress until `status: "success"`.
    pub async fn push_stream(
        &self,
        request: PushRequest,
    ) -> Result<ResponseStream<ProgressResponse>> {
        let body = to_body(&RegistryWire::from_push(&request))?;
        let url = self.config.endpoint_url("push");
        let stream = streaming::request_stream(
            self.transport.as_ref(),
            &url,
            body,
            Completion::SuccessStatus,
        )
        .await?;
        Ok(stream.map(|item| item.and_then(typed::<ProgressResponse>)).boxed())
    }

    // --- model management ---

    /// Delete a local model.
    pub async fn delete(&self, request: DeleteRequest) -> Result<StatusResponse> {
        let url = self.config.endpoint_url("delete");
        self.transport
            .call(Method::DELETE, &url, Some(to_body(&request)?))
            .await?;
        Ok(StatusResponse::success())
    }

    /// Copy a local model under a new name.
    pub async fn copy(&self, request: CopyRequest) -> Result<StatusResponse> {
        let url = self.config.endpoint_url("copy");
        self.transport
            .call(Method::POST, &url, Some(to_body(&request)?))
            .await?;
        Ok(StatusResponse::success())
    }

    /// List locally available models.
    pub async fn list(&self) -> Result<ListResponse> {
        self.unary_json(Method::GET, "tags", None).await
    }

    /// Fetch metadata for one model.
    pub async fn show(&self, request: ShowRequest) -> Result<ShowResponse> {
        self.unary_json(Method::POST, "show", Some(to_body(&request)?))
            .await
    }

    /// Compute an embedding vector for a prompt.
    pub async fn embeddings(&self, request: EmbeddingsRequest) -> Result<EmbeddingsResponse> {
        self.unary_json(Method::POST, "embeddings", Some(to_body(&request)?))
            .await
    }

    /// Issue a unary call whose response is one full JSON document.
    async fn unary_json<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<T> {
        let url = self.config.endpoint_url(endpoint);
        let response = self.transport.call(method, &url, body).await?;
        let bytes = transport::collect_body(response).await?;
        let text = String::from_utf8_lossy(&bytes).into_owned();
        serde_json::from_str(&text).map_err(|source| ClientError::Decode { line: text, source })
    }
}

/// Serialize a request struct into a wire body.
fn to_body<T: Serialize>(request: &T) -> Result<Value> {
    serde_json::to_value(request).map_err(|source| ClientError::Decode {
        line: "request body".to_string(),
        source,
    })
}

/// Map a raw protocol message into its typed endpoint response.
fn typed<T: DeserializeOwned>(message: Value) -> Result<T> {
    let line = message.to_string();
    serde_json::from_value(message).map_err(|source| ClientError::Decode { line, source })
}

fn encoded_array(encoded: Vec<String>) -> Value {
    Value::Array(encoded.into_iter().map(Value::String).collect())
}
