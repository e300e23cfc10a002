//! Available model listing.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use pdfchat_chat::{list_models, ModelDescriptor};
use serde::Deserialize;

use super::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/models", post(models))
}

#[derive(Debug, Default, Deserialize)]
pub struct ModelsBody {
    #[serde(default)]
    pub key: String,
}

async fn models(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ModelsBody>, JsonRejection>,
) -> Result<Json<Vec<ModelDescriptor>>, ApiError> {
    let Json(body) = payload?;
    let models = list_models(&state.http, &state.provider, &body.key).await?;
    Ok(Json(models))
}
