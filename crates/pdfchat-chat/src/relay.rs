//! Streaming chat completion relay.
//!
//! The upstream answers with server-sent events, one JSON completion chunk
//! per event. Each chunk's `choices[0].delta.content` is forwarded as a UTF-8
//! byte chunk until the `[DONE]` sentinel arrives.

use std::fmt::Display;
use std::pin::Pin;

use bytes::Bytes;
use futures::Stream;
use pdfchat_core::{Error, ProviderConfig, Result};
use reqwest::Client;
use serde::Deserialize;
use tokio_stream::StreamExt;
use tracing::{debug, warn};

use crate::request::{authorized, ensure_success, send};
use crate::sse::EventParser;
use crate::types::{ChatCompletionRequest, ChatMessage, ModelDescriptor};

/// Text fragments of the completion, in upstream order.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

pub const MAX_TOKENS: u32 = 2000;
pub const TEMPERATURE: f32 = 0.0;
pub const DONE_MARKER: &str = "[DONE]";

/// Start a streamed completion.
///
/// `system_prompt` is sent as the first message, ahead of `messages`. An
/// empty `api_key` uses the key from `config`. The
/// request is sent and its status checked before this returns, so a rejected
/// request surfaces here rather than as the first stream item.
pub async fn stream_chat(
    client: &Client,
    config: &ProviderConfig,
    model: &ModelDescriptor,
    system_prompt: &str,
    api_key: &str,
    messages: &[ChatMessage],
) -> Result<ChatStream> {
    let system = ChatMessage::system(system_prompt);
    let body = ChatCompletionRequest {
        model: &model.id,
        messages: std::iter::once(&system).chain(messages).collect(),
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
        stream: true,
    };

    let url = config.endpoint("/v1/chat/completions");
    debug!("Streaming from {} with model {} ({} messages)", url, model.id, body.messages.len());

    let request = authorized(client.post(&url), config, api_key)?.json(&body);
    let response = ensure_success(send(request).await?).await?;

    Ok(relay_events(response.bytes_stream()))
}

/// Turn a raw SSE byte stream into completion text.
///
/// Ends cleanly at `[DONE]`. A malformed chunk, a read failure, or the
/// upstream closing before `[DONE]` ends the stream with one error item.
pub fn relay_events<S, E>(upstream: S) -> ChatStream
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    Box::pin(relay(upstream))
}

fn relay<S, E>(upstream: S) -> impl Stream<Item = Result<Bytes>> + Send + 'static
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    async_stream::stream! {
        let mut upstream = Box::pin(upstream);
        let mut parser = EventParser::new();

        loop {
            let (events, closed) = match upstream.next().await {
                Some(Ok(chunk)) => (parser.feed(&chunk), false),
                Some(Err(e)) => {
                    warn!("Stream read error: {}", e);
                    yield Err(Error::Http(format!("stream read error: {e}")));
                    return;
                }
                None => (parser.finish(), true),
            };

            for event in events {
                match decode_event(&event.data) {
                    Ok(Delta::Done) => {
                        debug!("Completion stream finished");
                        return;
                    }
                    Ok(Delta::Text(text)) => {
                        yield Ok(Bytes::from(text));
                    }
                    Ok(Delta::Empty) => {}
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }

            if closed {
                warn!("Upstream closed without {}", DONE_MARKER);
                yield Err(Error::StreamDecode(format!("upstream closed before {DONE_MARKER}")));
                return;
            }
        }
    }
}

#[derive(Debug, PartialEq)]
enum Delta {
    Done,
    Text(String),
    /// Role-only or empty deltas.
    Empty,
}

#[derive(Deserialize)]
struct CompletionChunk {
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    delta: ChunkDelta,
}

#[derive(Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

fn decode_event(data: &str) -> Result<Delta> {
    if data == DONE_MARKER {
        return Ok(Delta::Done);
    }

    let chunk: CompletionChunk = serde_json::from_str(data).map_err(|e| {
        warn!("Undecodable completion chunk: {}", e);
        Error::StreamDecode(format!("{e}: {data}"))
    })?;

    let choice = chunk
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| Error::StreamDecode(format!("chunk has no choices: {data}")))?;

    Ok(match choice.delta.content {
        Some(text) if !text.is_empty() => Delta::Text(text),
        _ => Delta::Empty,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn chunk(content: &str) -> String {
        format!(
            "data: {}\n\n",
            serde_json::json!({"choices": [{"index": 0, "delta": {"content": content}}]})
        )
    }

    fn upstream(parts: Vec<String>) -> impl Stream<Item = std::result::Result<Bytes, Infallible>> {
        futures::stream::iter(parts.into_iter().map(|p| Ok(Bytes::from(p))))
    }

    async fn collect(stream: ChatStream) -> (String, Option<Error>) {
        let mut stream = stream;
        let mut text = String::new();
        while let Some(item) = stream.next().await {
            match item {
                Ok(bytes) => text.push_str(std::str::from_utf8(&bytes).unwrap()),
                Err(e) => {
                    assert!(stream.next().await.is_none(), "items after error");
                    return (text, Some(e));
                }
            }
        }
        (text, None)
    }

    #[tokio::test]
    async fn test_concatenates_deltas_until_done() {
        let parts = vec![
            chunk("Hel"),
            chunk("lo"),
            "data: [DONE]\n\n".to_string(),
            chunk("ignored"),
        ];
        let (text, err) = collect(relay_events(upstream(parts))).await;
        assert_eq!(text, "Hello");
        assert!(err.is_none());
    }

    #[tokio::test]
    async fn test_done_ends_stream_while_connection_stays_open() {
        let open = upstream(vec![chunk("still "), chunk("here"), "data: [DONE]\n\n".to_string()])
            .chain(futures::stream::pending());
        let collected = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            collect(relay_events(open)),
        )
        .await
        .expect("stream did not end after [DONE]");
        assert_eq!(collected.0, "still here");
        assert!(collected.1.is_none());
    }

    #[tokio::test]
    async fn test_events_split_across_reads() {
        let whole = format!("{}{}data: [DONE]\n\n", chunk("héllo "), chunk("wörld"));
        let bytes = whole.into_bytes();
        let parts: Vec<Bytes> = bytes.chunks(3).map(Bytes::copy_from_slice).collect();
        let stream = futures::stream::iter(parts.into_iter().map(Ok::<_, Infallible>));
        let (text, err) = collect(relay_events(stream)).await;
        assert_eq!(text, "héllo wörld");
        assert!(err.is_none());
    }

    #[tokio::test]
    async fn test_role_only_delta_is_skipped() {
        let parts = vec![
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n".to_string(),
            "data: {\"choices\":[{\"delta\":{\"content\":null}}]}\n\n".to_string(),
            chunk("ok"),
            "data: [DONE]\n\n".to_string(),
        ];
        let (text, err) = collect(relay_events(upstream(parts))).await;
        assert_eq!(text, "ok");
        assert!(err.is_none());
    }

    #[tokio::test]
    async fn test_malformed_chunk_ends_with_error() {
        let parts = vec![chunk("partial"), "data: {not json\n\n".to_string(), chunk("never")];
        let (text, err) = collect(relay_events(upstream(parts))).await;
        assert_eq!(text, "partial");
        assert!(matches!(err, Some(Error::StreamDecode(_))));
    }

    #[tokio::test]
    async fn test_missing_choices_is_decode_error() {
        let parts = vec!["data: {\"choices\":[]}\n\n".to_string()];
        let (_, err) = collect(relay_events(upstream(parts))).await;
        assert!(matches!(err, Some(Error::StreamDecode(_))));
    }

    #[tokio::test]
    async fn test_close_without_done_is_error() {
        let (text, err) = collect(relay_events(upstream(vec![chunk("cut")]))).await;
        assert_eq!(text, "cut");
        assert!(matches!(err, Some(Error::StreamDecode(_))));
    }

    #[tokio::test]
    async fn test_read_failure_is_http_error() {
        let parts: Vec<std::result::Result<Bytes, String>> =
            vec![Ok(Bytes::from(chunk("a"))), Err("connection reset".to_string())];
        let (text, err) = collect(relay_events(futures::stream::iter(parts))).await;
        assert_eq!(text, "a");
        match err {
            Some(Error::Http(msg)) => assert!(msg.contains("connection reset")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_done_marker_is_exact() {
        assert_eq!(decode_event("[DONE]").unwrap(), Delta::Done);
        assert!(decode_event(" [DONE]").is_err());
    }
}
