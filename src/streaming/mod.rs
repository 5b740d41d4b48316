//! Streaming and one-shot request processing
//!
//! Both modes share the same framing and decoding pipeline; only the
//! consumption policy differs. Streaming exposes a lazy, pull-based message
//! stream where each `next()` drives the next network read, so backpressure
//! follows consumer pace. One-shot pulls exactly one message and checks it
//! is terminal.
//!
//! Dropping a stream early drops the underlying transport body and with it
//! the connection; no separate cancel token exists or is needed.

pub mod framer;

use std::collections::VecDeque;

use futures_util::stream::{self, BoxStream, Stream, StreamExt};
use serde_json::Value;
use tracing::trace;

use crate::errors::{ClientError, Result};
use crate::streaming::framer::LineFramer;
use crate::transport::{ByteStream, Method, Transport};

/// Terminal predicate, the only per-endpoint-family variability in the
/// completion logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Completion {
    /// generate/chat streams end on a message with `done: true`
    DoneFlag,
    /// pull/push progress streams end on `status: "success"`
    SuccessStatus,
}

impl Completion {
    pub(crate) fn is_terminal(self, message: &Value) -> bool {
        match self {
            Completion::DoneFlag => message
                .get("done")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            Completion::SuccessStatus => {
                message.get("status").and_then(Value::as_str) == Some("success")
            }
        }
    }
}

/// Parse one framed line into a protocol message.
///
/// A message carrying an `error` field is the daemon signaling failure
/// mid-protocol; it aborts the sequence instead of being yielded as data.
fn decode_line(line: &str) -> Result<Value> {
    let object: serde_json::Map<String, Value> =
        serde_json::from_str(line).map_err(|source| ClientError::Decode {
            line: line.to_string(),
            source,
        })?;

    if let Some(error) = object.get("error") {
        let message = error
            .as_str()
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| error.to_string());
        return Err(ClientError::Protocol(message));
    }

    Ok(Value::Object(object))
}

struct StreamState {
    body: ByteStream,
    framer: LineFramer,
    pending: VecDeque<String>,
    completion: Completion,
    terminated: bool,
}

/// Turn a transport body into a lazy sequence of protocol messages.
///
/// Yields zero or more non-terminal messages followed by exactly one
/// terminal message, in arrival order. Exhausting the bytes without ever
/// seeing a terminal message fails with [`ClientError::IncompleteStream`].
pub(crate) fn message_stream(
    body: ByteStream,
    completion: Completion,
) -> impl Stream<Item = Result<Value>> + Send {
    let state = StreamState {
        body,
        framer: LineFramer::new(),
        pending: VecDeque::new(),
        completion,
        terminated: false,
    };

    stream::try_unfold(state, |mut state| async move {
        if state.terminated {
            return Ok(None);
        }

        loop {
            if let Some(line) = state.pending.pop_front() {
                let message = decode_line(&line)?;
                if state.completion.is_terminal(&message) {
                    trace!("terminal message received");
                    state.terminated = true;
                }
                return Ok(Some((message, state)));
            }

            match state.body.next().await {
                Some(chunk) => {
                    state.pending.extend(state.framer.push(&chunk?)?);
                }
                None => {
                    state.framer.finish()?;
                    return Err(ClientError::IncompleteStream);
                }
            }
        }
    })
}

/// Boxed lazy message sequence, detached from the borrows of the call that
/// produced it
pub(crate) type MessageStream = BoxStream<'static, Result<Value>>;

/// Send a streaming request and return its lazy message sequence.
pub(crate) async fn request_stream(
    transport: &dyn Transport,
    url: &str,
    mut body: Value,
    completion: Completion,
) -> Result<MessageStream> {
    body["stream"] = Value::Bool(true);
    let response = transport.call(Method::POST, url, Some(body)).await?;
    let bytes = response.body.ok_or(ClientError::MissingBody)?;
    Ok(message_stream(bytes, completion).boxed())
}

/// Send a one-shot request: the wire always carries `stream: false`, and the
/// single resulting message must already be terminal.
pub(crate) async fn request_once(
    transport: &dyn Transport,
    url: &str,
    mut body: Value,
    completion: Completion,
) -> Result<Value> {
    body["stream"] = Value::Bool(false);
    let response = transport.call(Method::POST, url, Some(body)).await?;
    let bytes = response.body.ok_or(ClientError::MissingBody)?;

    let mut messages = Box::pin(message_stream(bytes, completion));
    let message = match messages.next().await {
        Some(message) => message?,
        None => return Err(ClientError::IncompleteStream),
    };

    if !completion.is_terminal(&message) {
        return Err(ClientError::UnexpectedResponse);
    }
    Ok(message)
}
