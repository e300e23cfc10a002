//! Pinecone vector index queries.

pub mod pinecone;
pub mod types;

pub use pinecone::{parse_query_body, PineconeClient};
pub use types::{QueryRequest, VectorQueryParams};
