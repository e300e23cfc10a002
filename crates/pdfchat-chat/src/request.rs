//! Request decoration and upstream error handling shared by the adapters.

use pdfchat_core::{Error, ProviderConfig, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, Response};
use tracing::warn;

pub(crate) const SERVICE: &str = "OpenAI";

/// Attach the JSON content type, bearer key and optional organization header.
///
/// An empty `api_key` falls back to the configured key.
pub(crate) fn authorized(
    builder: RequestBuilder,
    config: &ProviderConfig,
    api_key: &str,
) -> Result<RequestBuilder> {
    let api_key = config.resolve_key(api_key)?;
    let builder = builder
        .header(CONTENT_TYPE, "application/json")
        .bearer_auth(api_key);
    Ok(match &config.organization {
        Some(org) => builder.header("OpenAI-Organization", org),
        None => builder,
    })
}

pub(crate) async fn send(builder: RequestBuilder) -> Result<Response> {
    builder
        .send()
        .await
        .map_err(|e| Error::Http(format!("request failed: {e}")))
}

/// Pass a success response through; otherwise read the whole body and turn it
/// into a provider or opaque upstream error.
pub(crate) async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await.map_err(|e| {
        Error::Http(format!("failed to read {status} error body: {e}"))
    })?;
    let err = Error::from_upstream_body(SERVICE, status.as_u16(), &body);
    warn!(status = status.as_u16(), "upstream rejected request: {}", err);
    Err(err)
}

pub(crate) async fn read_json(response: Response) -> Result<serde_json::Value> {
    let body = response
        .bytes()
        .await
        .map_err(|e| Error::Http(format!("failed to read response body: {e}")))?;
    Ok(serde_json::from_slice(&body)?)
}
