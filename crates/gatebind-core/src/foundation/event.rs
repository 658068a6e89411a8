//! Inbound gateway event and invocation context.
//!
//! [`GatewayEvent`] follows the API gateway proxy shape: every map may be
//! `null` on the wire, and the body is an optional raw string. Only the path
//! parameters, query parameters and body take part in binding; the rest is
//! carried through untouched.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// An inbound HTTP-style event delivered by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayEvent {
    /// HTTP method, if the gateway supplied one.
    #[serde(default)]
    pub http_method: Option<String>,

    /// Request path, if the gateway supplied one.
    #[serde(default)]
    pub path: Option<String>,

    /// Path template parameters.
    #[serde(default)]
    pub path_parameters: Option<HashMap<String, String>>,

    /// Query string parameters.
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,

    /// Request headers. Not used by the binding pipeline.
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,

    /// Raw request body.
    #[serde(default)]
    pub body: Option<String>,

    /// Whether the body is base64 encoded.
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl GatewayEvent {
    /// Creates an empty event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a path parameter.
    pub fn path_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_parameters
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Sets a query string parameter.
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_string_parameters
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Sets the raw body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the body to the JSON encoding of `value`.
    pub fn json_body(self, value: &serde_json::Value) -> Self {
        self.body(value.to_string())
    }
}

/// Per-invocation metadata supplied by the runtime.
///
/// The pipeline itself only reads the request id (for log correlation); the
/// rest is handed to the action as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationContext {
    /// Unique id of this invocation.
    pub request_id: String,

    /// Name of the deployed function.
    #[serde(default)]
    pub function_name: Option<String>,

    /// Memory limit configured for the function, in megabytes.
    #[serde(default)]
    pub memory_limit_mb: Option<u32>,

    /// Invocation deadline as milliseconds since the Unix epoch.
    #[serde(default)]
    pub deadline_ms: Option<u64>,
}

impl InvocationContext {
    /// Creates a context with the given request id.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            ..Default::default()
        }
    }

    /// Sets the function name.
    pub fn function_name(mut self, name: impl Into<String>) -> Self {
        self.function_name = Some(name.into());
        self
    }
}
