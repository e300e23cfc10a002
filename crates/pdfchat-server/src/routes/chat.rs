//! Streaming chat relay.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use futures::TryStreamExt;
use pdfchat_chat::{compose_prompt, stream_chat, ChatMessage, ModelDescriptor, Role};
use serde::Deserialize;
use tracing::{info, warn};

use super::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/chat", post(chat))
}

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    #[serde(default)]
    pub model: ModelDescriptor,
    pub messages: Vec<ChatMessage>,
    /// Caller's provider key; empty falls back to `OPENAI_API_KEY`.
    #[serde(default)]
    pub key: String,
    /// Ready-made system prompt, used when no `contexts` are given.
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    /// Retrieved passages to ground the answer in.
    #[serde(default)]
    pub contexts: Option<Vec<String>>,
}

impl ChatBody {
    fn system_prompt(&self, template: &str) -> String {
        match &self.contexts {
            Some(contexts) => {
                let question = self.question.clone().unwrap_or_else(|| {
                    self.messages
                        .iter()
                        .rev()
                        .find(|m| m.role == Role::User)
                        .map(|m| m.content.clone())
                        .unwrap_or_default()
                });
                compose_prompt(template, &question, contexts)
            }
            None => self
                .prompt
                .clone()
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| template.to_string()),
        }
    }
}

async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload?;
    let system_prompt = body.system_prompt(&state.prompt_template);

    info!(
        "Chat request: model={} messages={}",
        body.model.id,
        body.messages.len()
    );

    let stream = stream_chat(
        &state.http,
        &state.provider,
        &body.model,
        &system_prompt,
        &body.key,
        &body.messages,
    )
    .await?
    .inspect_err(|e| warn!("Chat stream aborted: {}", e));

    Ok((
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(stream),
    )
        .into_response())
}
