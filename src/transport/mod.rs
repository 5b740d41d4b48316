//! HTTP transport abstraction
//!
//! The client never talks to reqwest directly; every request goes through the
//! [`Transport`] trait so tests (or proxies) can substitute their own
//! implementation. The response body is exposed as an incrementally readable
//! byte stream, never a fully buffered string, so NDJSON decoding can start
//! before the daemon finishes writing.

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use serde_json::Value;
use tracing::debug;

use crate::errors::{ClientError, Result};

pub use reqwest::Method;

/// Connect timeout for the default transport
///
/// Only connection establishment is bounded; a total request timeout would
/// abort long streamed generations mid-body.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Incrementally readable response body
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Response handed back by a [`Transport`]
pub struct TransportResponse {
    /// HTTP status code (always 2xx from the default transport)
    pub status: u16,
    /// Body chunks, if the response carried a body
    pub body: Option<ByteStream>,
}

/// Injectable HTTP call seam
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one HTTP call and return the response with a streamable body.
    ///
    /// Fails with [`ClientError::Transport`] on network failure and
    /// [`ClientError::HttpStatus`] on a non-2xx status.
    async fn call(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
    ) -> Result<TransportResponse>;
}

/// Default transport backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with the default connect timeout
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(ClientError::Transport)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
    ) -> Result<TransportResponse> {
        debug!(%method, url, "sending request");

        let mut request = self.client.request(method, url);
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            debug!(status = status.as_u16(), "request failed");
            return Err(ClientError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(ClientError::Transport))
            .boxed();

        Ok(TransportResponse {
            status: status.as_u16(),
            body: Some(stream),
        })
    }
}

/// Collect a transport body into one buffer, for endpoints whose response is
/// a single JSON document rather than an NDJSON stream.
pub(crate) async fn collect_body(response: TransportResponse) -> Result<Vec<u8>> {
    let mut body = response.body.ok_or(ClientError::MissingBody)?;
    let mut buffer = Vec::new();
    while let Some(chunk) = body.next().await {
        buffer.extend_from_slice(&chunk?);
    }
    Ok(buffer)
}
