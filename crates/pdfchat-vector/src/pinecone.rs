//! Pinecone query client.
//!
//! One `POST` per query against the index's service host. The response body
//! is returned as parsed JSON without interpretation.

use pdfchat_core::{Error, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::types::{QueryRequest, VectorQueryParams};

const SERVICE: &str = "Pinecone";
/// Project segment of the service hostname.
const PROJECT_ID: &str = "2c91f9c";

#[derive(Debug, Clone)]
pub struct PineconeClient {
    params: VectorQueryParams,
    base_url: String,
}

impl PineconeClient {
    pub fn new(params: VectorQueryParams) -> Self {
        let base_url = format!(
            "https://{}-{}.svc.{}.pinecone.io",
            params.index, PROJECT_ID, params.environment
        );
        Self { params, base_url }
    }

    /// Target another host instead of the templated service URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn params(&self) -> &VectorQueryParams {
        &self.params
    }

    /// URL for a query path fragment such as `query`.
    pub fn endpoint(&self, query: &str) -> String {
        format!("{}/{}", self.base_url, query)
    }

    pub async fn query(&self, client: &Client, query: &str) -> Result<Value> {
        let url = self.endpoint(query);
        debug!("Querying {} index {}", SERVICE, self.params.index);

        let response = client
            .post(&url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header("Api-Key", &self.params.api_key)
            .json(&QueryRequest::default())
            .send()
            .await
            .map_err(|e| Error::Http(format!("request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Http(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "{} rejected query", SERVICE);
            return Err(Error::Upstream {
                service: SERVICE,
                status: status.as_u16(),
                body: text,
            });
        }

        parse_query_body(&text)
    }
}

/// Parse a successful query response body.
pub fn parse_query_body(text: &str) -> Result<Value> {
    if text.is_empty() {
        return Err(Error::EmptyResponse);
    }
    serde_json::from_str(text).map_err(|_| Error::InvalidJson {
        body: text.to_string(),
    })
}
