//! Error types for pdfchat.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured rejection returned by the LLM provider.
///
/// Mirrors the `{"error": {message, type, param, code}}` envelope. `param` and
/// `code` are frequently `null` upstream.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct ProviderError {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub param: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("{service} API returned an error: {status} {body}")]
    Upstream {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Stream decode error: {0}")]
    StreamDecode(String),

    #[error("Failed to parse response as JSON: response is empty")]
    EmptyResponse,

    #[error("Failed to parse response as JSON: {body}")]
    InvalidJson { body: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build the error for a non-success upstream response.
    ///
    /// A JSON body carrying an `error` object becomes [`Error::Provider`];
    /// anything else keeps the raw body text for diagnosis.
    pub fn from_upstream_body(service: &'static str, status: u16, body: &[u8]) -> Self {
        #[derive(Deserialize)]
        struct Envelope {
            error: Option<serde_json::Value>,
        }

        if let Ok(Envelope { error: Some(raw) }) = serde_json::from_slice::<Envelope>(body) {
            if raw.is_object() {
                if let Ok(provider) = serde_json::from_value::<ProviderError>(raw) {
                    return Error::Provider(provider);
                }
            }
        }

        Error::Upstream {
            service,
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }

    /// The structured provider error, if this is one.
    pub fn provider(&self) -> Option<&ProviderError> {
        match self {
            Error::Provider(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_envelope_preserves_fields() {
        let body = br#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error","param":"key","code":"invalid_api_key"}}"#;
        let err = Error::from_upstream_body("OpenAI", 401, body);
        let provider = err.provider().expect("structured error");
        assert_eq!(provider.message, "Incorrect API key provided");
        assert_eq!(provider.kind, "invalid_request_error");
        assert_eq!(provider.param.as_deref(), Some("key"));
        assert_eq!(provider.code.as_deref(), Some("invalid_api_key"));
    }

    #[test]
    fn test_structured_envelope_with_null_fields() {
        let body = br#"{"error":{"message":"That model is currently overloaded","type":"server_error","param":null,"code":null}}"#;
        let err = Error::from_upstream_body("OpenAI", 503, body);
        let provider = err.provider().unwrap();
        assert_eq!(provider.kind, "server_error");
        assert!(provider.param.is_none());
        assert!(provider.code.is_none());
    }

    #[test]
    fn test_opaque_body_keeps_status_and_text() {
        let err = Error::from_upstream_body("OpenAI", 502, b"<html>Bad Gateway</html>");
        match &err {
            Error::Upstream {
                service,
                status,
                body,
            } => {
                assert_eq!(*service, "OpenAI");
                assert_eq!(*status, 502);
                assert_eq!(body, "<html>Bad Gateway</html>");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let msg = err.to_string();
        assert!(msg.contains("502"));
        assert!(msg.contains("Bad Gateway"));
    }

    #[test]
    fn test_json_without_error_object_is_opaque() {
        let err = Error::from_upstream_body("OpenAI", 500, br#"{"error":"boom"}"#);
        assert!(err.provider().is_none());

        let err = Error::from_upstream_body("OpenAI", 500, br#"{"detail":"boom"}"#);
        assert!(matches!(err, Error::Upstream { status: 500, .. }));
    }

    #[test]
    fn test_vector_body_messages() {
        assert_eq!(
            Error::EmptyResponse.to_string(),
            "Failed to parse response as JSON: response is empty"
        );
        let err = Error::InvalidJson {
            body: "not json".into(),
        };
        assert!(err.to_string().contains("not json"));
    }
}
