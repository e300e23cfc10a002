//! HTTP route handlers.

pub mod chat;
pub mod embeddings;
pub mod models;
pub mod query;

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use pdfchat_core::Error;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(chat::routes())
        .merge(embeddings::routes())
        .merge(query::routes())
        .merge(models::routes())
}

/// Handler failure rendered as `{"error": ...}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Core(Error),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Core(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                json!({"error": {"message": message}}),
            ),
            ApiError::Core(err) => {
                warn!("Request failed: {}", err);
                error_body(&err)
            }
        };
        (status, Json(body)).into_response()
    }
}

fn error_body(err: &Error) -> (StatusCode, serde_json::Value) {
    match err {
        Error::Provider(provider) => (StatusCode::BAD_GATEWAY, json!({"error": provider})),
        Error::Upstream {
            service, status, ..
        } => (
            StatusCode::BAD_GATEWAY,
            json!({"error": {
                "message": err.to_string(),
                "service": service,
                "status": status,
            }}),
        ),
        Error::Config(_) | Error::Io(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": {"message": err.to_string()}}),
        ),
        _ => (
            StatusCode::BAD_GATEWAY,
            json!({"error": {"message": err.to_string()}}),
        ),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    /// Bind `router` on an ephemeral port and return its base URL.
    pub async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// POST a JSON body through the app and return status plus raw body.
    pub async fn post_json(app: Router, uri: &str, body: &Value) -> (StatusCode, Vec<u8>) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }

    pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }
}
