//! Integration tests for the Ollama client
//!
//! Exercises the full request path against a scripted mock transport,
//! without requiring a running daemon.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{self, StreamExt};
use serde_json::{json, Value};

use ollama_client::transport::{ByteStream, Method, Transport, TransportResponse};
use ollama_client::{
    ChatMessage, ChatRequest, ClientError, Config, CopyRequest, DeleteRequest, EmbeddingsRequest,
    GenerateRequest, ImageSource, Ollama, PullRequest, PushRequest, ShowRequest,
};

#[derive(Debug, Clone)]
struct RecordedCall {
    method: Method,
    url: String,
    body: Option<Value>,
}

/// Transport double returning a scripted body and recording every call
struct MockTransport {
    chunks: Vec<&'static [u8]>,
    missing_body: bool,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    fn new(chunks: Vec<&'static [u8]>) -> Arc<Self> {
        Arc::new(Self {
            chunks,
            missing_body: false,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn without_body() -> Arc<Self> {
        Arc::new(Self {
            chunks: Vec::new(),
            missing_body: true,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn only_call(&self) -> RecordedCall {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one transport call");
        calls[0].clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn call(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
    ) -> ollama_client::Result<TransportResponse> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            url: url.to_string(),
            body,
        });

        let body: Option<ByteStream> = if self.missing_body {
            None
        } else {
            let chunks = self.chunks.clone();
            Some(stream::iter(chunks.into_iter().map(|c| Ok(Bytes::from_static(c)))).boxed())
        };

        Ok(TransportResponse { status: 200, body })
    }
}

fn client_with(transport: Arc<MockTransport>) -> Ollama {
    Ollama::with_transport(Config::new(), transport)
}

#[tokio::test]
async fn test_chat_stream_yields_every_message_in_order() {
    // Two prior turns plus one new user turn, three streamed replies
    let transport = MockTransport::new(vec![
        b"{\"message\":{\"content\":\"Hi\"},\"done\":false}\n",
        b"{\"message\":{\"content\":\" there\"},\"done\":false}\n{\"message\":{\"content\":\"\"},\"done\":true}\n",
    ]);
    let client = client_with(transport.clone());

    let request = ChatRequest {
        model: "llama2".to_string(),
        messages: vec![
            ChatMessage::user("hello"),
            ChatMessage::assistant("hi, how can I help?"),
            ChatMessage::user("greet me"),
        ],
        ..Default::default()
    };

    let mut stream = client.chat_stream(request).await.unwrap();
    let mut content = String::new();
    let mut yields = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.unwrap();
        if let Some(reply) = chunk.message {
            content.push_str(&reply.content);
        }
        yields += 1;
    }

    assert_eq!(yields, 3);
    assert_eq!(content, "Hi there");

    let call = transport.only_call();
    assert_eq!(call.method, Method::POST);
    assert_eq!(call.url, "http://127.0.0.1:11434/api/chat");
    let body = call.body.unwrap();
    assert_eq!(body["stream"], json!(true));
    assert_eq!(body["messages"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_generate_one_shot_sends_stream_false() {
    let transport = MockTransport::new(vec![
        b"{\"model\":\"llama2\",\"response\":\"Hello!\",\"done\":true}\n",
    ]);
    let client = client_with(transport.clone());

    let response = client
        .generate(GenerateRequest {
            model: "llama2".to_string(),
            prompt: "greet".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(response.response, "Hello!");
    assert!(response.done);

    let body = transport.only_call().body.unwrap();
    assert_eq!(body["stream"], json!(false));
    assert_eq!(body["prompt"], json!("greet"));
}

#[tokio::test]
async fn test_generate_one_shot_rejects_partial_message() {
    let transport = MockTransport::new(vec![b"{\"response\":\"Hel\",\"done\":false}\n"]);
    let client = client_with(transport);

    let err = client
        .generate(GenerateRequest {
            model: "llama2".to_string(),
            prompt: "greet".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::UnexpectedResponse));
}

#[tokio::test]
async fn test_error_body_fails_with_protocol_not_data() {
    let transport = MockTransport::new(vec![b"{\"error\":\"model not found\"}\n"]);
    let client = client_with(transport);

    let mut stream = client
        .generate_stream(GenerateRequest {
            model: "missing".to_string(),
            prompt: "hi".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let first = stream.next().await.unwrap();
    match first {
        Err(ClientError::Protocol(message)) => assert_eq!(message, "model not found"),
        other => panic!("expected Protocol error, got {:?}", other),
    }
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn test_stream_without_terminal_fails_incomplete() {
    let transport = MockTransport::new(vec![b"{\"response\":\"a\",\"done\":false}\n"]);
    let client = client_with(transport);

    let mut stream = client
        .generate_stream(GenerateRequest {
            model: "llama2".to_string(),
            prompt: "hi".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let mut last_err = None;
    while let Some(item) = stream.next().await {
        if let Err(err) = item {
            last_err = Some(err);
        }
    }
    assert!(matches!(last_err, Some(ClientError::IncompleteStream)));
}

#[tokio::test]
async fn test_abandoning_a_stream_early_is_clean() {
    let transport = MockTransport::new(vec![
        b"{\"response\":\"a\",\"done\":false}\n{\"response\":\"b\",\"done\":false}\n{\"done\":true}\n",
    ]);
    let client = client_with(transport);

    let mut stream = client
        .generate_stream(GenerateRequest {
            model: "llama2".to_string(),
            prompt: "hi".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.response, "a");
    drop(stream);
}

#[tokio::test]
async fn test_generate_encodes_images_into_wire_body() {
    let transport = MockTransport::new(vec![b"{\"response\":\"a cat\",\"done\":true}\n"]);
    let client = client_with(transport.clone());

    client
        .generate(GenerateRequest {
            model: "llava".to_string(),
            prompt: "what is in this picture?".to_string(),
            images: vec![ImageSource::Raw(b"hello".to_vec())],
            ..Default::default()
        })
        .await
        .unwrap();

    let body = transport.only_call().body.unwrap();
    assert_eq!(body["images"], json!(["aGVsbG8="]));
}

#[tokio::test]
async fn test_pull_renames_model_and_passes_credentials() {
    let transport = MockTransport::new(vec![b"{\"status\":\"success\"}\n"]);
    let client = client_with(transport.clone());

    let response = client
        .pull(PullRequest {
            model: "llama2".to_string(),
            insecure: None,
            username: Some("user".to_string()),
            password: Some("secret".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(response.status, "success");

    let call = transport.only_call();
    assert_eq!(call.url, "http://127.0.0.1:11434/api/pull");
    let body = call.body.unwrap();
    assert_eq!(body["name"], json!("llama2"));
    assert_eq!(body["username"], json!("user"));
    assert_eq!(body["password"], json!("secret"));
    assert!(body.get("model").is_none());
    assert_eq!(body["stream"], json!(false));
}

#[tokio::test]
async fn test_pull_stream_yields_progress_until_success() {
    let transport = MockTransport::new(vec![
        b"{\"status\":\"pulling manifest\"}\n{\"status\":\"downloading\",\"total\":100,\"completed\":40}\n{\"status\":\"success\"}\n",
    ]);
    let client = client_with(transport);

    let mut stream = client
        .pull_stream(PullRequest {
            model: "llama2".to_string(),
            insecure: None,
            username: None,
            password: None,
        })
        .await
        .unwrap();

    let mut statuses = Vec::new();
    while let Some(progress) = stream.next().await {
        statuses.push(progress.unwrap().status);
    }
    assert_eq!(statuses, vec!["pulling manifest", "downloading", "success"]);
}

#[tokio::test]
async fn test_push_uses_same_wire_shape_as_pull() {
    let transport = MockTransport::new(vec![b"{\"status\":\"success\"}\n"]);
    let client = client_with(transport.clone());

    client
        .push(PushRequest {
            model: "me/llama2-tuned".to_string(),
            insecure: Some(true),
            username: None,
            password: None,
        })
        .await
        .unwrap();

    let call = transport.only_call();
    assert_eq!(call.url, "http://127.0.0.1:11434/api/push");
    let body = call.body.unwrap();
    assert_eq!(body["name"], json!("me/llama2-tuned"));
    assert_eq!(body["insecure"], json!(true));
}

#[tokio::test]
async fn test_delete_issues_unary_delete_and_reports_success() {
    let transport = MockTransport::new(vec![b""]);
    let client = client_with(transport.clone());

    let response = client
        .delete(DeleteRequest {
            model: "llama2".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(response.status, "success");

    let call = transport.only_call();
    assert_eq!(call.method, Method::DELETE);
    assert_eq!(call.url, "http://127.0.0.1:11434/api/delete");
    assert_eq!(call.body.unwrap(), json!({"name": "llama2"}));
}

#[tokio::test]
async fn test_copy_issues_unary_post_and_reports_success() {
    let transport = MockTransport::new(vec![b""]);
    let client = client_with(transport.clone());

    let response = client
        .copy(CopyRequest {
            source: "llama2".to_string(),
            destination: "llama2-backup".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(response.status, "success");

    let call = transport.only_call();
    assert_eq!(call.method, Method::POST);
    assert_eq!(
        call.body.unwrap(),
        json!({"source": "llama2", "destination": "llama2-backup"})
    );
}

#[tokio::test]
async fn test_list_parses_full_json_body() {
    let transport = MockTransport::new(vec![b"{\"models\":[{\"name\":\"llama2\"}]}"]);
    let client = client_with(transport.clone());

    let list = client.list().await.unwrap();
    assert_eq!(list.model_names(), vec!["llama2"]);

    let call = transport.only_call();
    assert_eq!(call.method, Method::GET);
    assert_eq!(call.url, "http://127.0.0.1:11434/api/tags");
    assert!(call.body.is_none());
}

#[tokio::test]
async fn test_show_parses_model_metadata() {
    let transport =
        MockTransport::new(vec![b"{\"modelfile\":\"FROM llama2\",\"template\":\"{{ .Prompt }}\"}"]);
    let client = client_with(transport);

    let show = client
        .show(ShowRequest {
            model: "llama2".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(show.modelfile.as_deref(), Some("FROM llama2"));
}

#[tokio::test]
async fn test_embeddings_parses_vector() {
    let transport = MockTransport::new(vec![b"{\"embedding\":[0.5,-0.25,1.0]}"]);
    let client = client_with(transport.clone());

    let response = client
        .embeddings(EmbeddingsRequest {
            model: "llama2".to_string(),
            prompt: "embed me".to_string(),
            options: None,
        })
        .await
        .unwrap();
    assert_eq!(response.embedding, vec![0.5, -0.25, 1.0]);

    let body = transport.only_call().body.unwrap();
    assert_eq!(body["prompt"], json!("embed me"));
}

#[tokio::test]
async fn test_missing_body_fails_the_call() {
    let transport = MockTransport::without_body();
    let client = client_with(transport);

    let err = client
        .generate(GenerateRequest {
            model: "llama2".to_string(),
            prompt: "hi".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::MissingBody));

    let transport = MockTransport::without_body();
    let client = client_with(transport);
    let err = client.list().await.unwrap_err();
    assert!(matches!(err, ClientError::MissingBody));
}

#[tokio::test]
async fn test_custom_host_reaches_every_endpoint() {
    let transport = MockTransport::new(vec![b"{\"models\":[]}"]);
    let client = Ollama::with_transport(
        Config::new().host("http://gpu-box:11434/"),
        transport.clone(),
    );

    client.list().await.unwrap();
    assert_eq!(transport.only_call().url, "http://gpu-box:11434/api/tags");
}

#[tokio::test]
async fn test_concurrent_calls_share_one_client() {
    let transport = MockTransport::new(vec![b"{\"response\":\"ok\",\"done\":true}\n"]);
    let client = Arc::new(client_with(transport.clone()));

    let request = || GenerateRequest {
        model: "llama2".to_string(),
        prompt: "hi".to_string(),
        ..Default::default()
    };

    let (a, b) = tokio::join!(client.generate(request()), client.generate(request()));
    assert!(a.is_ok());
    assert!(b.is_ok());
    assert_eq!(transport.calls().len(), 2);
}
