//! Progress reporting for request processing

use colored::Colorize;
use conductor_application::ProcessProgressNotifier;
use conductor_domain::{IntentDecision, ToolCall, ToolExecutionResult};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Reports pipeline progress with a single spinner on stderr
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn start(&self, prefix: &str, message: impl Into<String>) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(prefix.to_string());
        pb.set_message(message.into());
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut slot) = self.spinner.lock()
            && let Some(previous) = slot.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn finish(&self, message: String) {
        if let Ok(mut slot) = self.spinner.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(message);
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.spinner.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_and_clear();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.clear();
    }
}

impl ProcessProgressNotifier for ProgressReporter {
    fn on_refresh_start(&self) {
        self.start("Tools", "refreshing registry...");
    }

    fn on_refresh_complete(&self, tool_count: usize) {
        self.finish(format!("{} tools available", tool_count));
    }

    fn on_decision_start(&self) {
        self.start("Thinking", "choosing tools...");
    }

    fn on_decision_complete(&self, decision: &IntentDecision) {
        if decision.wants_tools() {
            self.finish(format!("{} tool call(s) planned", decision.tool_calls.len()));
        } else {
            self.clear();
        }
    }

    fn on_tool_start(&self, index: usize, total: usize, call: &ToolCall) {
        self.start(&format!("[{}/{}]", index + 1, total), call.name.clone());
    }

    fn on_tool_complete(&self, index: usize, total: usize, result: &ToolExecutionResult) {
        let status = if result.is_success() {
            format!("{} {}", "v".green(), result.tool_name)
        } else {
            format!("{} {}", "x".red(), result.tool_name)
        };
        if let Ok(mut slot) = self.spinner.lock()
            && let Some(pb) = slot.take()
        {
            pb.set_prefix(format!("[{}/{}]", index + 1, total));
            pb.finish_with_message(status);
        }
    }

    fn on_post_process_start(&self, verb: &str) {
        self.start("Post-process", format!("{}...", verb));
    }

    fn on_post_process_complete(&self, success: bool) {
        if success {
            self.clear();
        } else {
            self.finish(format!("{}", "post-processing failed".yellow()));
        }
    }
}
