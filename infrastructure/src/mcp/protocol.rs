//! JSON-RPC and MCP message types for the tool server.
//!
//! - **Requests**: client → server (`initialize`, `tools/list`, `tools/call`)
//! - **Responses**: server → client (result or error), either as a plain
//!   JSON body or as `data:` lines of a `text/event-stream` body
//! - **Notifications**: client → server without an id (`notifications/initialized`)

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// MCP protocol revision sent in `initialize`
pub const PROTOCOL_VERSION: &str = "2025-06-18";

/// Header carrying the server-assigned session id
pub const SESSION_HEADER: &str = "Mcp-Session-Id";

/// Global request ID counter for JSON-RPC requests.
static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    REQUEST_ID.fetch_add(1, Ordering::SeqCst)
}

/// JSON-RPC request
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl JsonRpcRequest {
    /// Creates a new JSON-RPC request with an auto-generated ID.
    pub fn new(method: impl Into<String>, params: Option<serde_json::Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            id: next_id(),
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC notification (no id, no response expected)
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcNotification {
    pub jsonrpc: &'static str,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl JsonRpcNotification {
    pub fn new(method: impl Into<String>, params: Option<serde_json::Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC response
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub jsonrpc: String,
    pub id: Option<u64>,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
}

/// JSON-RPC error object
#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// `initialize` parameters
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: &'static str,
    pub client_info: ClientInfo,
    pub capabilities: serde_json::Value,
}

impl InitializeParams {
    pub fn conductor() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            client_info: ClientInfo {
                name: "conductor",
                version: env!("CARGO_PKG_VERSION"),
            },
            capabilities: serde_json::json!({}),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientInfo {
    pub name: &'static str,
    pub version: &'static str,
}

/// `tools/list` result page
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListToolsResult {
    #[serde(default)]
    pub tools: Vec<McpTool>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// One advertised tool
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpTool {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub input_schema: Option<serde_json::Value>,
}

/// `tools/call` parameters
#[derive(Debug, Clone, Serialize)]
pub struct CallToolParams<'a> {
    pub name: &'a str,
    pub arguments: serde_json::Map<String, serde_json::Value>,
}

/// `tools/call` result
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    #[serde(default)]
    pub content: Vec<ContentPart>,
    #[serde(default)]
    pub structured_content: Option<serde_json::Value>,
    #[serde(default)]
    pub is_error: bool,
}

/// A content part of a tool result. Only text is surfaced.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    #[serde(other)]
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_increase() {
        let a = JsonRpcRequest::new("tools/list", None);
        let b = JsonRpcRequest::new("tools/list", None);
        assert!(b.id > a.id);
    }

    #[test]
    fn test_notification_has_no_id() {
        let value =
            serde_json::to_value(JsonRpcNotification::new("notifications/initialized", None))
                .unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["method"], "notifications/initialized");
    }

    #[test]
    fn test_initialize_params_shape() {
        let value = serde_json::to_value(InitializeParams::conductor()).unwrap();
        assert_eq!(value["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(value["clientInfo"]["name"], "conductor");
        assert!(value["capabilities"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_call_result_skips_non_text_parts() {
        let result: CallToolResult = serde_json::from_str(
            r#"{
                "content": [
                    {"type": "text", "text": "first"},
                    {"type": "image", "data": "AAAA", "mimeType": "image/png"},
                    {"type": "text", "text": "second"}
                ],
                "structuredContent": {"count": 2}
            }"#,
        )
        .unwrap();

        assert!(!result.is_error);
        assert_eq!(result.content.len(), 3);
        assert!(matches!(result.content[1], ContentPart::Other));
        assert_eq!(result.structured_content.unwrap()["count"], 2);
    }

    #[test]
    fn test_list_tools_with_cursor() {
        let page: ListToolsResult = serde_json::from_str(
            r#"{
                "tools": [{"name": "scrape", "inputSchema": {"type": "object"}}],
                "nextCursor": "p2"
            }"#,
        )
        .unwrap();
        assert_eq!(page.tools[0].name, "scrape");
        assert!(page.tools[0].description.is_none());
        assert_eq!(page.next_cursor.as_deref(), Some("p2"));
    }
}
