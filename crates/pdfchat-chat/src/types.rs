//! Chat types matching the OpenAI Chat Completions wire format.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Chat message in conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Known model identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelId {
    Gpt35Turbo,
    Gpt4,
    Gpt432k,
}

impl ModelId {
    pub const FALLBACK: ModelId = ModelId::Gpt35Turbo;

    pub const ALL: [ModelId; 3] = [ModelId::Gpt35Turbo, ModelId::Gpt4, ModelId::Gpt432k];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::Gpt35Turbo => "gpt-3.5-turbo",
            ModelId::Gpt4 => "gpt-4",
            ModelId::Gpt432k => "gpt-4-32k",
        }
    }

    pub fn descriptor(&self) -> ModelDescriptor {
        let (name, max_length, token_limit) = match self {
            ModelId::Gpt35Turbo => ("GPT-3.5", 12_000, 4_000),
            ModelId::Gpt4 => ("GPT-4", 24_000, 8_000),
            ModelId::Gpt432k => ("GPT-4-32K", 96_000, 32_000),
        };
        ModelDescriptor {
            id: self.as_str().to_string(),
            name: name.to_string(),
            max_length,
            token_limit,
        }
    }
}

impl FromStr for ModelId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelId::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown model: {s}"))
    }
}

/// Which upstream model to invoke. Only `id` goes on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Maximum prompt length in characters.
    #[serde(default)]
    pub max_length: usize,
    #[serde(default)]
    pub token_limit: usize,
}

impl ModelDescriptor {
    /// Descriptor for an arbitrary id; catalogue metadata is filled in when known.
    pub fn from_id(id: impl Into<String>) -> Self {
        let id = id.into();
        match id.parse::<ModelId>() {
            Ok(known) => known.descriptor(),
            Err(_) => Self {
                name: id.clone(),
                id,
                max_length: 0,
                token_limit: 0,
            },
        }
    }

    /// All catalogue entries.
    pub fn known() -> Vec<ModelDescriptor> {
        ModelId::ALL.iter().map(|m| m.descriptor()).collect()
    }
}

impl Default for ModelDescriptor {
    fn default() -> Self {
        ModelId::FALLBACK.descriptor()
    }
}

/// Request body for `POST /v1/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<&'a ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub stream: bool,
}

/// Request body for `POST /v1/embeddings`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct EmbeddingRequest<'a> {
    pub model: &'a str,
    pub input: &'a str,
}
