//! Outbound gateway response.

use serde::{Deserialize, Serialize};

use super::headers::Headers;

/// The response shape handed back to the gateway.
///
/// The body is always a serialized entity; binary bodies are never produced,
/// so `is_base64_encoded` is always `false` for responses built by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    /// HTTP status code.
    pub status_code: u16,

    /// Response headers, in insertion order.
    #[serde(default)]
    pub headers: Headers,

    /// Serialized entity.
    pub body: String,

    /// Always `false`.
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl GatewayResponse {
    /// Creates a text response with no headers.
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            headers: Headers::new(),
            body: body.into(),
            is_base64_encoded: false,
        }
    }

    /// Creates a 500 response whose body is `{"message": <message>}`.
    pub fn internal_error(message: &str) -> Self {
        Self::new(500, serde_json::json!({ "message": message }).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_error_body_is_escaped_json() {
        let response = GatewayResponse::internal_error(r#"bad "quote""#);
        assert_eq!(response.status_code, 500);

        let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["message"], r#"bad "quote""#);
        assert!(response.headers.is_empty());
        assert!(!response.is_base64_encoded);
    }

    #[test]
    fn test_serialize_camel_case() {
        let json = serde_json::to_value(GatewayResponse::new(200, "{}")).unwrap();
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["isBase64Encoded"], false);
        assert_eq!(json["headers"], serde_json::json!({}));
    }
}
