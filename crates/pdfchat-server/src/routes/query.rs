//! Vector index query passthrough.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use pdfchat_vector::{PineconeClient, VectorQueryParams};
use serde::Deserialize;
use serde_json::Value;

use super::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/query", post(query))
}

#[derive(Debug, Deserialize)]
pub struct QueryBody {
    pub pinecone: VectorQueryParams,
    /// Path fragment appended to the index URL.
    #[serde(default = "default_query")]
    pub query: String,
}

fn default_query() -> String {
    "query".to_string()
}

async fn query(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QueryBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload?;

    let mut client = PineconeClient::new(body.pinecone);
    if let Some(base_url) = &state.pinecone_base_url {
        client = client.with_base_url(base_url.as_str());
    }

    let value = client.query(&state.http, &body.query).await?;
    Ok(Json(value))
}
