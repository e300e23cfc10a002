//! Model catalogue lookup against the provider.

use pdfchat_core::{ProviderConfig, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::request::{authorized, ensure_success, read_json, send};
use crate::types::{ModelDescriptor, ModelId};

/// Catalogue models the given key can use, in catalogue order.
pub async fn list_models(
    client: &Client,
    config: &ProviderConfig,
    api_key: &str,
) -> Result<Vec<ModelDescriptor>> {
    let url = config.endpoint("/v1/models");
    let request = authorized(client.get(&url), config, api_key)?;
    let response = ensure_success(send(request).await?).await?;
    let listing = read_json(response).await?;

    let models = filter_known(&listing);
    debug!("{} of {} catalogue models available", models.len(), ModelId::ALL.len());
    Ok(models)
}

/// Intersect a `{"data": [{"id": ...}]}` listing with the catalogue.
/// Unknown ids and malformed entries are ignored.
pub fn filter_known(listing: &Value) -> Vec<ModelDescriptor> {
    let available: Vec<&str> = listing["data"]
        .as_array()
        .map(|entries| entries.iter().filter_map(|m| m["id"].as_str()).collect())
        .unwrap_or_default();

    ModelId::ALL
        .iter()
        .filter(|m| available.contains(&m.as_str()))
        .map(|m| m.descriptor())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filters_to_catalogue_order() {
        let listing = json!({
            "object": "list",
            "data": [
                {"id": "gpt-4", "object": "model"},
                {"id": "whisper-1", "object": "model"},
                {"id": "gpt-3.5-turbo", "object": "model"},
            ]
        });
        let ids: Vec<String> = filter_known(&listing).into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["gpt-3.5-turbo", "gpt-4"]);
    }

    #[test]
    fn test_malformed_listing_is_empty() {
        assert!(filter_known(&json!({"data": "nope"})).is_empty());
        assert!(filter_known(&json!({"data": [{"name": "gpt-4"}]})).is_empty());
        assert!(filter_known(&json!([])).is_empty());
    }
}
