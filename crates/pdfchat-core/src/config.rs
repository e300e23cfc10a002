//! Provider and server configuration read from the process environment.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

pub const DEFAULT_API_HOST: &str = "https://api.openai.com";

/// System prompt template. `{question}` and `{context}` are substituted by the
/// prompt composer.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions \
about the user's documents. Answer the question using only the context below. \
If the answer is not contained in the context, say that you don't know.\n\n\
Question: {question}\n\n\
Context:\n{context}";

/// Connection settings for the OpenAI-compatible provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL without trailing slash, e.g. `https://api.openai.com`.
    pub api_host: String,
    /// Fallback key used when a caller supplies none.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Sent as `OpenAI-Organization` when present.
    pub organization: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_host: DEFAULT_API_HOST.into(),
            api_key: None,
            organization: None,
        }
    }
}

impl ProviderConfig {
    /// Read `OPENAI_API_HOST`, `OPENAI_API_KEY` and `OPENAI_ORGANIZATION`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_host = get("OPENAI_API_HOST")
            .map(|h| h.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_HOST.into());

        Self {
            api_host,
            api_key: get("OPENAI_API_KEY"),
            organization: get("OPENAI_ORGANIZATION"),
        }
    }

    /// Point at a different host (proxies, tests).
    pub fn with_api_host(mut self, api_host: impl Into<String>) -> Self {
        self.api_host = api_host.into().trim_end_matches('/').to_string();
        self
    }

    /// Full URL for an API path such as `/v1/embeddings`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_host, path)
    }

    /// Pick the key for a request: an explicit non-empty key wins, then the
    /// environment fallback.
    pub fn resolve_key(&self, explicit: &str) -> Result<String> {
        if !explicit.trim().is_empty() {
            return Ok(explicit.to_string());
        }
        debug!("no explicit API key, falling back to OPENAI_API_KEY");
        self.api_key
            .clone()
            .ok_or_else(|| Error::Config("no API key supplied and OPENAI_API_KEY is not set".into()))
    }
}

/// Prompt template, honouring a `DEFAULT_SYSTEM_PROMPT` override.
pub fn prompt_template_from_env() -> String {
    std::env::var("DEFAULT_SYSTEM_PROMPT")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string())
}

/// HTTP front-end settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Read `HOST` and `PORT`, defaulting to `0.0.0.0:3000`.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);
        Self { host, port }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
