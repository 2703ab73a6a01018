//! Tool dispatcher
//!
//! Validates and executes the calls of one decision strictly in order.
//! A call that fails validation or execution is recorded and skipped; the
//! rest of the batch still runs. Only cancellation stops the batch early.

use crate::ports::progress::ProcessProgressNotifier;
use crate::ports::tool_transport::{ToolCallOutput, TransportError};
use crate::use_cases::session::ToolSessionHandle;
use conductor_domain::{
    SchemaValidator, ToolCall, ToolCatalog, ToolExecutionResult, ToolFailure, ToolValidator,
};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// One attempted call and what came of it
#[derive(Debug, Clone, PartialEq)]
pub struct CallOutcome {
    pub call: ToolCall,
    pub result: ToolExecutionResult,
}

/// Outcomes of a batch, in proposal order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchReport {
    pub outcomes: Vec<CallOutcome>,
    /// The batch was cut short by cancellation
    pub cancelled: bool,
}

impl DispatchReport {
    pub fn results(&self) -> Vec<ToolExecutionResult> {
        self.outcomes.iter().map(|o| o.result.clone()).collect()
    }
}

pub struct ToolDispatcher {
    session: Arc<ToolSessionHandle>,
    validator: Arc<dyn ToolValidator + Send + Sync>,
}

impl ToolDispatcher {
    pub fn new(session: Arc<ToolSessionHandle>) -> Self {
        Self {
            session,
            validator: Arc::new(SchemaValidator),
        }
    }

    pub fn with_validator(mut self, validator: Arc<dyn ToolValidator + Send + Sync>) -> Self {
        self.validator = validator;
        self
    }

    /// Validate and execute every call in order against one catalog snapshot.
    pub async fn dispatch_all(
        &self,
        calls: &[ToolCall],
        catalog: &ToolCatalog,
        cancel: &CancellationToken,
        progress: &dyn ProcessProgressNotifier,
    ) -> DispatchReport {
        let total = calls.len();
        let mut report = DispatchReport::default();

        for (index, call) in calls.iter().enumerate() {
            if cancel.is_cancelled() {
                info!(remaining = total - index, "Dispatch cancelled");
                report.cancelled = true;
                break;
            }

            progress.on_tool_start(index, total, call);
            let result = self.execute(call, catalog, cancel).await;
            progress.on_tool_complete(index, total, &result);

            let was_cancelled = result
                .error()
                .is_some_and(|e| e.code == ToolFailure::CANCELLED);

            report.outcomes.push(CallOutcome {
                call: call.clone(),
                result,
            });

            if was_cancelled {
                info!(remaining = total - index - 1, "Dispatch cancelled");
                report.cancelled = true;
                break;
            }
        }

        report
    }

    /// Validate and execute a single call.
    pub async fn execute(
        &self,
        call: &ToolCall,
        catalog: &ToolCatalog,
        cancel: &CancellationToken,
    ) -> ToolExecutionResult {
        if let Err(e) = self.validator.validate(call, catalog) {
            warn!(tool = %call.name, code = e.code(), "Rejected tool call: {}", e);
            return ToolExecutionResult::failure(&call.name, e.into());
        }

        debug!(tool = %call.name, "Dispatching tool call");
        let started = Instant::now();
        let outcome = self
            .session
            .call_tool(&call.name, call.arguments_json(), cancel)
            .await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let result = match outcome {
            Ok(output) => Self::into_result(&call.name, output),
            Err(TransportError::Cancelled) => {
                ToolExecutionResult::failure(&call.name, ToolFailure::cancelled())
            }
            Err(e) => ToolExecutionResult::failure(
                &call.name,
                ToolFailure::execution_failed(e.to_string()),
            ),
        }
        .with_duration(elapsed_ms);

        if result.is_success() {
            info!(
                tool = %call.name,
                success = true,
                duration_ms = elapsed_ms,
                "Tool call finished"
            );
        } else if let Some(error) = result.error() {
            warn!(
                tool = %call.name,
                success = false,
                duration_ms = elapsed_ms,
                "Tool call failed: {}",
                error
            );
        }

        result
    }

    fn into_result(tool: &str, output: ToolCallOutput) -> ToolExecutionResult {
        let text = output.joined_text();

        if output.is_error {
            let message = if text.is_empty() {
                "tool reported an error".to_string()
            } else {
                text
            };
            return ToolExecutionResult::failure(tool, ToolFailure::execution_failed(message));
        }

        let result = ToolExecutionResult::success(tool, text);
        match output.structured {
            Some(structured) => result.with_structured(structured),
            None => result,
        }
    }
}
