//! Progress notification port
//!
//! Defines the interface for reporting progress while a request moves
//! through the pipeline.

use conductor_domain::{IntentDecision, ToolCall, ToolExecutionResult};

/// Callback for progress updates during request processing
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, plain log, etc.). Every method has a
/// no-op default.
pub trait ProcessProgressNotifier: Send + Sync {
    /// The tool registry is being refreshed
    fn on_refresh_start(&self) {}

    fn on_refresh_complete(&self, _tool_count: usize) {}

    /// The decision call is in flight
    fn on_decision_start(&self) {}

    fn on_decision_complete(&self, _decision: &IntentDecision) {}

    /// Call `index` (zero-based) of `total` is about to be dispatched
    fn on_tool_start(&self, _index: usize, _total: usize, _call: &ToolCall) {}

    fn on_tool_complete(&self, _index: usize, _total: usize, _result: &ToolExecutionResult) {}

    fn on_post_process_start(&self, _verb: &str) {}

    fn on_post_process_complete(&self, _success: bool) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProcessProgressNotifier for NoProgress {}
