//! Shared application state.

use pdfchat_core::{prompt_template_from_env, ProviderConfig};

/// Shared application state accessible from all route handlers.
pub struct AppState {
    /// Reused for every upstream call.
    pub http: reqwest::Client,
    pub provider: ProviderConfig,
    /// System prompt template with `{question}` and `{context}` placeholders.
    pub prompt_template: String,
    /// Replaces the templated Pinecone service URL when set.
    pub pinecone_base_url: Option<String>,
}

impl AppState {
    pub fn new(provider: ProviderConfig, prompt_template: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            provider,
            prompt_template,
            pinecone_base_url: None,
        }
    }

    /// Read provider settings, the prompt template and `PINECONE_BASE_URL`.
    pub fn from_env() -> Self {
        let mut state = Self::new(ProviderConfig::from_env(), prompt_template_from_env());
        state.pinecone_base_url = std::env::var("PINECONE_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());
        state
    }
}
