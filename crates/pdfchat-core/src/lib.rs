//! pdfchat core: error taxonomy and environment-derived configuration.

pub mod config;
pub mod error;

pub use config::{prompt_template_from_env, ProviderConfig, ServerConfig, DEFAULT_SYSTEM_PROMPT};
pub use error::{Error, ProviderError, Result};
