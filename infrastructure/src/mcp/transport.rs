//! Streamable-HTTP transport for MCP tool servers.
//!
//! Every JSON-RPC message is POSTed to a single endpoint. The server
//! answers either with a JSON body or with a `text/event-stream` body
//! whose `data:` lines carry the response. A session id handed out on
//! `initialize` is echoed on every later request.

use super::error::{McpError, Result};
use super::protocol::{
    CallToolParams, CallToolResult, ContentPart, InitializeParams, JsonRpcNotification,
    JsonRpcRequest, JsonRpcResponse, ListToolsResult, McpTool, SESSION_HEADER,
};
use async_trait::async_trait;
use conductor_application::{ToolCallOutput, ToolTransport, TransportError, TransportSession};
use conductor_domain::ToolDefinition;
use conductor_domain::util::preview;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

const ACCEPT_BOTH: &str = "application/json, text/event-stream";
const MAX_LIST_PAGES: usize = 64;
const ERROR_BODY_PREVIEW: usize = 300;

/// [`ToolTransport`] adapter for a streamable-HTTP MCP server
pub struct McpHttpTransport {
    endpoint: String,
    client: Client,
}

impl McpHttpTransport {
    pub fn new(endpoint: impl Into<String>) -> std::result::Result<Self, TransportError> {
        Self::with_timeout(endpoint, None)
    }

    pub fn with_timeout(
        endpoint: impl Into<String>,
        timeout: Option<Duration>,
    ) -> std::result::Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            TransportError::Unavailable(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }
}

#[async_trait]
impl ToolTransport for McpHttpTransport {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn connect(&self) -> std::result::Result<Box<dyn TransportSession>, TransportError> {
        let mut session = McpHttpSession {
            endpoint: self.endpoint.clone(),
            client: self.client.clone(),
            session_id: None,
        };

        let request = JsonRpcRequest::new(
            "initialize",
            Some(serde_json::to_value(InitializeParams::conductor()).map_err(McpError::from)?),
        );
        let response = session.post(&request).await?;
        session.session_id = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let init = read_response(response, request.id).await?;
        let server = init
            .get("serverInfo")
            .and_then(|info| info.get("name"))
            .and_then(|name| name.as_str())
            .unwrap_or("unknown");
        info!(
            endpoint = %self.endpoint,
            server = server,
            session = session.session_id.as_deref().unwrap_or("-"),
            "Connected to tool server"
        );

        session
            .notify("notifications/initialized", Some(serde_json::json!({})))
            .await?;

        Ok(Box::new(session))
    }
}

/// One initialized MCP session
struct McpHttpSession {
    endpoint: String,
    client: Client,
    session_id: Option<String>,
}

impl McpHttpSession {
    async fn post(&self, body: &impl Serialize) -> Result<Response> {
        let mut http = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, ACCEPT_BOTH)
            .json(body);
        if let Some(id) = &self.session_id {
            http = http.header(SESSION_HEADER, id);
        }

        let response = http.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::NOT_FOUND && self.session_id.is_some() {
            return Err(McpError::SessionExpired);
        }
        let body = response.text().await.unwrap_or_default();
        Err(McpError::Status {
            status: status.as_u16(),
            body: preview(&body, ERROR_BODY_PREVIEW),
        })
    }

    async fn request(
        &self,
        method: &str,
        params: Option<serde_json::Value>,
    ) -> Result<serde_json::Value> {
        let request = JsonRpcRequest::new(method, params);
        debug!(method = method, id = request.id, "MCP request");
        let response = self.post(&request).await?;
        read_response(response, request.id).await
    }

    async fn notify(&self, method: &str, params: Option<serde_json::Value>) -> Result<()> {
        debug!(method = method, "MCP notification");
        self.post(&JsonRpcNotification::new(method, params)).await?;
        Ok(())
    }
}

#[async_trait]
impl TransportSession for McpHttpSession {
    async fn list_tools(&self) -> std::result::Result<Vec<ToolDefinition>, TransportError> {
        let mut definitions = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_LIST_PAGES {
            let params = match &cursor {
                Some(c) => serde_json::json!({ "cursor": c }),
                None => serde_json::json!({}),
            };
            let value = self
                .request("tools/list", Some(params))
                .await
                .map_err(|e| match e {
                    McpError::RpcError { .. } => TransportError::Protocol(e.to_string()),
                    other => other.into(),
                })?;
            let page: ListToolsResult = serde_json::from_value(value).map_err(McpError::from)?;

            definitions.extend(page.tools.into_iter().map(to_definition));

            match page.next_cursor.filter(|c| !c.is_empty()) {
                Some(next) if cursor.as_deref() != Some(next.as_str()) => cursor = Some(next),
                _ => return Ok(definitions),
            }
        }

        warn!(pages = MAX_LIST_PAGES, "Tool listing did not terminate, using what was read");
        Ok(definitions)
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Map<String, serde_json::Value>,
    ) -> std::result::Result<ToolCallOutput, TransportError> {
        let params = serde_json::to_value(CallToolParams { name, arguments })
            .map_err(McpError::from)?;
        let value = self.request("tools/call", Some(params)).await?;
        let result: CallToolResult = serde_json::from_value(value).map_err(McpError::from)?;
        Ok(to_output(result))
    }

    async fn close(&self) -> std::result::Result<(), TransportError> {
        let Some(id) = &self.session_id else {
            return Ok(());
        };

        // Servers may answer 405 when they do not support explicit termination
        let response = self
            .client
            .delete(&self.endpoint)
            .header(SESSION_HEADER, id)
            .send()
            .await
            .map_err(McpError::from)?;
        debug!(status = %response.status(), "Closed tool server session");
        Ok(())
    }
}

/// Read a JSON-RPC response for `id` from either body format
async fn read_response(response: Response, id: u64) -> Result<serde_json::Value> {
    let is_stream = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("text/event-stream"));
    let body = response.text().await?;

    let rpc = if is_stream {
        find_in_event_stream(&body, id)?
    } else {
        serde_json::from_str::<JsonRpcResponse>(&body).map_err(|e| {
            McpError::UnexpectedResponse(format!(
                "{}: {}",
                e,
                preview(&body, ERROR_BODY_PREVIEW)
            ))
        })?
    };

    into_result(rpc)
}

/// Scan `data:` events for the response whose id matches.
///
/// Other messages on the stream (progress notifications, server
/// requests) are skipped.
fn find_in_event_stream(body: &str, id: u64) -> Result<JsonRpcResponse> {
    let mut data = String::new();
    let mut events = Vec::new();

    for line in body.lines() {
        if line.is_empty() {
            if !data.is_empty() {
                events.push(std::mem::take(&mut data));
            }
            continue;
        }
        if let Some(rest) = line.strip_prefix("data:") {
            if !data.is_empty() {
                data.push('\n');
            }
            data.push_str(rest.strip_prefix(' ').unwrap_or(rest));
        }
    }
    if !data.is_empty() {
        events.push(data);
    }

    events
        .iter()
        .filter_map(|event| serde_json::from_str::<JsonRpcResponse>(event).ok())
        .find(|rpc| rpc.id == Some(id))
        .ok_or_else(|| {
            McpError::UnexpectedResponse(format!("no response with id {} in event stream", id))
        })
}

fn into_result(rpc: JsonRpcResponse) -> Result<serde_json::Value> {
    if let Some(error) = rpc.error {
        return Err(McpError::RpcError {
            code: error.code,
            message: error.message,
        });
    }
    rpc.result
        .ok_or_else(|| McpError::UnexpectedResponse("response has neither result nor error".into()))
}

fn to_definition(tool: McpTool) -> ToolDefinition {
    ToolDefinition::from_input_schema(
        tool.name,
        tool.description.unwrap_or_default(),
        tool.input_schema
            .unwrap_or_else(|| serde_json::json!({ "type": "object" })),
    )
}

fn to_output(result: CallToolResult) -> ToolCallOutput {
    let parts = result.content.into_iter().filter_map(|part| match part {
        ContentPart::Text { text } => Some(text),
        ContentPart::Other => None,
    });

    let mut output = ToolCallOutput::text(parts);
    output.is_error = result.is_error;
    if let Some(structured) = result.structured_content {
        output = output.with_structured(structured);
    }
    output
}
