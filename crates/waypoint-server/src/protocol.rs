//! JSON-RPC 2.0 message types for the Waypoint Protocol.
//!
//! Requests arrive as text frames over the WebSocket; each one is answered
//! with exactly one response. Transport-level failures use the standard
//! JSON-RPC error codes; domain failures use the -32000 range.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// An incoming request.
#[derive(Debug, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// An outgoing response: either a result or an error, never both.
#[derive(Debug, Serialize)]
pub struct Response {
    pub jsonrpc: &'static str,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

/// A JSON-RPC error object.
#[derive(Debug, Error, Serialize)]
#[error("rpc error {code}: {message}")]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl Response {
    /// Builds a success response.
    ///
    /// Serialization of the result is infallible for the types handlers
    /// produce; a failure is reported as an internal error rather than
    /// panicking the connection task.
    pub fn success(id: Option<Value>, result: impl Serialize) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => Self {
                jsonrpc: "2.0",
                id,
                result: Some(value),
                error: None,
            },
            Err(e) => Self::error(None, -32603, format!("Internal error: {}", e)),
        }
    }

    /// Builds an error response with an explicit code.
    pub fn error(id: Option<Value>, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }

    /// The request was not valid JSON.
    pub fn parse_error() -> Self {
        Self::error(None, -32700, "Parse error")
    }

    /// The request's params did not match the method's schema.
    pub fn invalid_params(id: Option<Value>, detail: impl Into<String>) -> Self {
        Self::error(id, -32602, format!("Invalid params: {}", detail.into()))
    }

    /// The requested method does not exist.
    pub fn method_not_found(id: Option<Value>, method: &str) -> Self {
        Self::error(id, -32601, format!("Method not found: {}", method))
    }
}

// ── Method params ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NodeAddParams {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct NodeRemoveParams {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct NodeHasParams {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct NeighborsParams {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct EdgeAddParams {
    pub a: String,
    pub b: String,
    pub weight: f64,
}

#[derive(Debug, Deserialize)]
pub struct EdgeRemoveParams {
    pub a: String,
    pub b: String,
}

#[derive(Debug, Deserialize)]
pub struct PathFindParams {
    pub start: String,
    pub goal: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response_has_no_error_field() {
        let response = Response::success(Some(Value::from(1)), serde_json::json!({"ok": true}));
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"result\""));
        assert!(!json.contains("\"error\""));
        assert!(json.contains("\"jsonrpc\":\"2.0\""));
    }

    #[test]
    fn test_error_response_has_no_result_field() {
        let response = Response::method_not_found(Some(Value::from(7)), "graph.unknown");
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("-32601"));
        assert!(json.contains("graph.unknown"));
        assert!(!json.contains("\"result\""));
    }

    #[test]
    fn test_request_params_default_to_null() {
        let request: Request = serde_json::from_str(r#"{"method": "graph.info"}"#).unwrap();

        assert_eq!(request.method, "graph.info");
        assert!(request.id.is_none());
        assert!(request.params.is_null());
    }
}
