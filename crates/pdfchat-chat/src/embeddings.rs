//! Embedding vectors for a single message.

use pdfchat_core::{ProviderConfig, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::request::{authorized, ensure_success, read_json, send};
use crate::types::{ChatMessage, EmbeddingRequest};

pub const EMBEDDING_MODEL: &str = "text-embedding-ada-002";

/// Embed `message.content` and return the provider's JSON response untouched.
/// An empty `api_key` uses the key from `config`.
pub async fn create_embedding(
    client: &Client,
    config: &ProviderConfig,
    api_key: &str,
    message: &ChatMessage,
) -> Result<Value> {
    let body = EmbeddingRequest {
        model: EMBEDDING_MODEL,
        input: &message.content,
    };

    let url = config.endpoint("/v1/embeddings");
    debug!("Requesting embedding from {} ({} chars)", url, message.content.len());

    let request = authorized(client.post(&url), config, api_key)?.json(&body);
    let response = ensure_success(send(request).await?).await?;
    read_json(response).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body() {
        let message = ChatMessage::user("hello");
        let body = EmbeddingRequest {
            model: EMBEDDING_MODEL,
            input: &message.content,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"model": "text-embedding-ada-002", "input": "hello"})
        );
    }
}
