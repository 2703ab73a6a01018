//! Hand-written mocks shared by the use case tests.

use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::ports::tool_transport::{ToolCallOutput, ToolTransport, TransportError, TransportSession};
use async_trait::async_trait;
use conductor_domain::{ParameterSchema, PropertyKind, ToolDefinition};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ==================== LLM ====================

/// Gateway serving scripted replies in order and recording every request
pub(crate) struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<String, GatewayError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedGateway {
    pub(crate) fn new(replies: Vec<Result<String, GatewayError>>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from(replies)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Other("No more responses".to_string())))
    }
}

/// Gateway that never answers
pub(crate) struct HangingGateway;

#[async_trait]
impl LlmGateway for HangingGateway {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, GatewayError> {
        std::future::pending::<()>().await;
        Err(GatewayError::Other("unreachable".to_string()))
    }
}

// ==================== Tool host ====================

/// State shared between a [`MockTransport`] and the sessions it creates
#[derive(Default)]
pub(crate) struct MockToolHost {
    pub tools: Mutex<Vec<ToolDefinition>>,
    pub outputs: Mutex<VecDeque<Result<ToolCallOutput, TransportError>>>,
    pub calls: Mutex<Vec<(String, serde_json::Map<String, serde_json::Value>)>>,
    pub connects: AtomicUsize,
    pub closes: AtomicUsize,
    pub unreachable: AtomicBool,
    /// Calls to this tool never complete
    pub hang_on: Mutex<Option<String>>,
}

impl MockToolHost {
    pub(crate) fn called_tools(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub(crate) fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub(crate) fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub(crate) fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

pub(crate) struct MockTransport {
    host: Arc<MockToolHost>,
}

impl MockTransport {
    pub(crate) fn new(tools: Vec<ToolDefinition>) -> Self {
        let host = MockToolHost::default();
        *host.tools.lock().unwrap() = tools;
        Self {
            host: Arc::new(host),
        }
    }

    pub(crate) fn with_outputs(self, outputs: Vec<Result<ToolCallOutput, TransportError>>) -> Self {
        *self.host.outputs.lock().unwrap() = VecDeque::from(outputs);
        self
    }

    pub(crate) fn host(&self) -> Arc<MockToolHost> {
        Arc::clone(&self.host)
    }
}

#[async_trait]
impl ToolTransport for MockTransport {
    fn endpoint(&self) -> &str {
        "mock://tools"
    }

    async fn connect(&self) -> Result<Box<dyn TransportSession>, TransportError> {
        self.host.connects.fetch_add(1, Ordering::SeqCst);
        if self.host.unreachable.load(Ordering::SeqCst) {
            return Err(TransportError::Unavailable("connection refused".to_string()));
        }
        Ok(Box::new(MockSession {
            host: Arc::clone(&self.host),
        }))
    }
}

struct MockSession {
    host: Arc<MockToolHost>,
}

#[async_trait]
impl TransportSession for MockSession {
    async fn list_tools(&self) -> Result<Vec<ToolDefinition>, TransportError> {
        if self.host.unreachable.load(Ordering::SeqCst) {
            return Err(TransportError::Unavailable("connection reset".to_string()));
        }
        Ok(self.host.tools.lock().unwrap().clone())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Map<String, serde_json::Value>,
    ) -> Result<ToolCallOutput, TransportError> {
        self.host
            .calls
            .lock()
            .unwrap()
            .push((name.to_string(), arguments));

        let hangs = self.host.hang_on.lock().unwrap().as_deref() == Some(name);
        if hangs {
            std::future::pending::<()>().await;
        }

        self.host
            .outputs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ToolCallOutput::text([format!("{} done", name)])))
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.host.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ==================== Fixtures ====================

pub(crate) fn summarize_tool() -> ToolDefinition {
    ToolDefinition::new("summarize_content", "Summarize a passage of text").with_parameters(
        ParameterSchema::new()
            .with_property("content", PropertyKind::String, true)
            .with_property("max_length", PropertyKind::Integer, false),
    )
}

pub(crate) fn scrape_tool() -> ToolDefinition {
    ToolDefinition::new("scrape_url", "Fetch a web page as text").with_parameters(
        ParameterSchema::new().with_property("url", PropertyKind::String, true),
    )
}
