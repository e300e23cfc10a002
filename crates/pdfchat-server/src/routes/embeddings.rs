//! Embedding passthrough.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use pdfchat_chat::{create_embedding, ChatMessage};
use serde::Deserialize;
use serde_json::Value;

use super::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/embeddings", post(embeddings))
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingsBody {
    #[serde(default)]
    pub key: String,
    pub message: ChatMessage,
}

async fn embeddings(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EmbeddingsBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload?;
    let value = create_embedding(&state.http, &state.provider, &body.key, &body.message).await?;
    Ok(Json(value))
}
