//! Chat relay for an OpenAI-compatible provider.
//!
//! Streams chat completions back as UTF-8 byte chunks, fetches embeddings,
//! and composes the retrieval system prompt. Each adapter issues a single
//! request per call and keeps no state between calls.

pub mod embeddings;
pub mod models;
pub mod prompt;
pub mod relay;
mod request;
pub mod sse;
pub mod types;

pub use embeddings::{create_embedding, EMBEDDING_MODEL};
pub use models::{filter_known, list_models};
pub use prompt::{compose_prompt, create_system_prompt};
pub use relay::{relay_events, stream_chat, ChatStream};
pub use sse::{EventParser, SseEvent};
pub use types::*;
