//! Tool session handle
//!
//! Owns the single, lazily created session to the tool host. The first
//! operation that needs the host connects; later operations reuse the same
//! session until it is lost or [`ToolSessionHandle::shutdown`] releases it.

use crate::ports::tool_transport::{ToolCallOutput, ToolTransport, TransportError, TransportSession};
use crate::use_cases::shared::cancellable;
use conductor_domain::ToolDefinition;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Lazily connected, reusable session to the tool host.
///
/// The session lives behind an async mutex, so creation and use are
/// serialized: concurrent callers never create two sessions.
pub struct ToolSessionHandle {
    transport: Option<Arc<dyn ToolTransport>>,
    session: Mutex<Option<Box<dyn TransportSession>>>,
}

impl ToolSessionHandle {
    pub fn new(transport: Arc<dyn ToolTransport>) -> Self {
        Self {
            transport: Some(transport),
            session: Mutex::new(None),
        }
    }

    /// A handle with no tool host configured: listing yields no tools.
    pub fn disconnected() -> Self {
        Self {
            transport: None,
            session: Mutex::new(None),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.transport.is_some()
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.transport.as_deref().map(|t| t.endpoint())
    }

    pub async fn is_connected(&self) -> bool {
        self.session.lock().await.is_some()
    }

    /// List every tool the host advertises.
    pub async fn list_tools(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<ToolDefinition>, TransportError> {
        let Some(transport) = &self.transport else {
            debug!("No tool server configured, registry stays empty");
            return Ok(Vec::new());
        };

        let mut guard = self.session.lock().await;
        let session = Self::ensure_session(&mut guard, transport.as_ref(), cancel).await?;

        let result = cancellable(cancel, session.list_tools(), || TransportError::Cancelled).await;
        Self::forget_if_lost(&mut guard, &result);
        result
    }

    /// Invoke one tool on the shared session.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Map<String, serde_json::Value>,
        cancel: &CancellationToken,
    ) -> Result<ToolCallOutput, TransportError> {
        let Some(transport) = &self.transport else {
            return Err(TransportError::Unavailable(
                "no tool server configured".to_string(),
            ));
        };

        let mut guard = self.session.lock().await;
        let session = Self::ensure_session(&mut guard, transport.as_ref(), cancel).await?;

        let result = cancellable(cancel, session.call_tool(name, arguments), || {
            TransportError::Cancelled
        })
        .await;
        Self::forget_if_lost(&mut guard, &result);
        result
    }

    /// Close the session if one was created. Safe to call more than once.
    pub async fn shutdown(&self) {
        let Some(session) = self.session.lock().await.take() else {
            return;
        };

        match session.close().await {
            Ok(()) => info!("Tool session closed"),
            Err(e) => warn!("Failed to close tool session: {}", e),
        }
    }

    async fn ensure_session<'a>(
        slot: &'a mut Option<Box<dyn TransportSession>>,
        transport: &dyn ToolTransport,
        cancel: &CancellationToken,
    ) -> Result<&'a dyn TransportSession, TransportError> {
        if slot.is_none() {
            info!(endpoint = transport.endpoint(), "Connecting to tool server");
            let session =
                cancellable(cancel, transport.connect(), || TransportError::Cancelled).await?;
            *slot = Some(session);
        }

        slot.as_deref()
            .ok_or_else(|| TransportError::Unavailable("session not established".to_string()))
    }

    fn forget_if_lost<T>(
        slot: &mut Option<Box<dyn TransportSession>>,
        result: &Result<T, TransportError>,
    ) {
        if let Err(e) = result
            && e.is_session_lost()
            && slot.take().is_some()
        {
            warn!("Tool session lost, will reconnect on next use: {}", e);
        }
    }
}
