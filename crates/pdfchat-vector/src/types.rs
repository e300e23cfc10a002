use serde::{Deserialize, Serialize};

/// Identifies a Pinecone index and the key that unlocks it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorQueryParams {
    pub index: String,
    pub environment: String,
    #[serde(rename = "apiKey")]
    pub api_key: String,
}

/// Body sent with every query. The values are fixed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub include_values: bool,
    /// Sent as the string `"false"`, which the index accepts.
    pub include_metadata: &'static str,
    pub namespace: &'static str,
    pub top_k: u32,
}

impl Default for QueryRequest {
    fn default() -> Self {
        Self {
            include_values: true,
            include_metadata: "false",
            namespace: "pdf-test",
            top_k: 5,
        }
    }
}
