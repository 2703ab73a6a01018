//! Process Request use case
//!
//! Runs one user request through the whole pipeline:
//!
//! ```text
//! registry snapshot → intent decision → validate + dispatch (in order)
//!                   → aggregate → post-process (optional)
//! ```
//!
//! Only two conditions abort a request: the tool host is unreachable during
//! a mandatory refresh, or the decision call itself fails. Everything after
//! the decision degrades into a partial result instead.

use crate::config::{AgentConfig, RefreshPolicy};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::progress::{NoProgress, ProcessProgressNotifier};
use crate::ports::tool_transport::TransportError;
use crate::use_cases::dispatch::{CallOutcome, ToolDispatcher};
use crate::use_cases::post_process::PostProcessor;
use crate::use_cases::registry_cache::ToolRegistryCache;
use crate::use_cases::resolve_intent::IntentResolver;
use crate::use_cases::session::ToolSessionHandle;
use conductor_domain::{
    IntentDecision, ToolCatalog, ToolExecutionResult, ToolValidator, aggregate_content,
};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that abort a request
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Tool server unavailable: {0}")]
    TransportUnavailable(TransportError),

    #[error("LLM request failed: {0}")]
    LlmRequestFailed(GatewayError),

    #[error("Request cancelled")]
    Cancelled,
}

impl From<TransportError> for ProcessError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Cancelled => ProcessError::Cancelled,
            other => ProcessError::TransportUnavailable(other),
        }
    }
}

impl From<GatewayError> for ProcessError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::Cancelled => ProcessError::Cancelled,
            other => ProcessError::LlmRequestFailed(other),
        }
    }
}

/// Everything a request produced, failures included
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutput {
    /// The user's original text
    pub request: String,
    pub message: String,
    pub confidence: f64,
    pub explanation: String,
    pub should_call: bool,
    /// The post-process verb the model asked for, if any
    pub post_process: Option<String>,
    /// Every attempted call, in proposal order
    pub outcomes: Vec<CallOutcome>,
    /// Successful contents joined by blank lines
    pub aggregate: String,
    pub post_processed: Option<String>,
    pub post_process_error: Option<String>,
    /// The request was cancelled after the decision was made
    pub cancelled: bool,
}

impl ProcessOutput {
    fn from_decision(request: &str, decision: &IntentDecision) -> Self {
        Self {
            request: request.to_string(),
            message: decision.message.clone(),
            confidence: decision.confidence,
            explanation: decision.explanation.clone(),
            should_call: decision.should_call,
            post_process: decision.post_process_verb().map(str::to_string),
            outcomes: Vec::new(),
            aggregate: String::new(),
            post_processed: None,
            post_process_error: None,
            cancelled: false,
        }
    }

    pub fn results(&self) -> impl Iterator<Item = &ToolExecutionResult> {
        self.outcomes.iter().map(|o| &o.result)
    }

    pub fn tools_executed(&self) -> bool {
        !self.outcomes.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.results().filter(|r| r.is_success()).count()
    }

    /// The text to show as the request's answer: the post-processed text
    /// when there is one, otherwise the raw aggregate. `None` when neither
    /// has content.
    pub fn final_text(&self) -> Option<&str> {
        self.post_processed
            .as_deref()
            .or(Some(self.aggregate.as_str()))
            .filter(|text| !text.is_empty())
    }

    pub fn is_low_confidence(&self, threshold: f64) -> bool {
        self.confidence < threshold
    }
}

/// Use case for processing user requests
///
/// Owns the agent context: the tool session, the registry snapshot and the
/// pipeline stages. One instance serves every request of a run.
pub struct ProcessRequestUseCase {
    config: AgentConfig,
    session: Arc<ToolSessionHandle>,
    registry: ToolRegistryCache,
    resolver: IntentResolver,
    dispatcher: ToolDispatcher,
    post_processor: PostProcessor,
}

impl ProcessRequestUseCase {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        session: Arc<ToolSessionHandle>,
        config: AgentConfig,
    ) -> Self {
        Self {
            resolver: IntentResolver::new(Arc::clone(&gateway), config.decision.clone()),
            post_processor: PostProcessor::new(gateway, config.post_process.clone()),
            dispatcher: ToolDispatcher::new(Arc::clone(&session)),
            registry: ToolRegistryCache::new(),
            session,
            config,
        }
    }

    pub fn with_validator(mut self, validator: Arc<dyn ToolValidator + Send + Sync>) -> Self {
        self.dispatcher = self.dispatcher.with_validator(validator);
        self
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Load the initial registry. An unreachable tool host leaves the
    /// agent usable with zero tools.
    pub async fn initialize(&self, cancel: &CancellationToken) -> Arc<ToolCatalog> {
        let catalog = self.registry.refresh_or_empty(&self.session, cancel).await;
        info!(
            tool_count = catalog.len(),
            refresh = %self.config.refresh,
            "Agent initialized"
        );
        catalog
    }

    /// The current registry snapshot
    pub fn tools(&self) -> Arc<ToolCatalog> {
        self.registry.get()
    }

    /// Refresh the registry now, reporting failures.
    pub async fn refresh_tools(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Arc<ToolCatalog>, TransportError> {
        self.registry.refresh(&self.session, cancel).await
    }

    /// Execute the use case with default (no-op) progress
    pub async fn process(
        &self,
        request: &str,
        cancel: &CancellationToken,
    ) -> Result<ProcessOutput, ProcessError> {
        self.process_with_progress(request, cancel, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn process_with_progress(
        &self,
        request: &str,
        cancel: &CancellationToken,
        progress: &dyn ProcessProgressNotifier,
    ) -> Result<ProcessOutput, ProcessError> {
        info!(input = request, "Processing request");

        // Pin one snapshot for the whole request
        let catalog = match self.config.refresh {
            RefreshPolicy::PerRequest => {
                progress.on_refresh_start();
                let catalog = self.registry.refresh(&self.session, cancel).await?;
                progress.on_refresh_complete(catalog.len());
                catalog
            }
            RefreshPolicy::Once => self.registry.get(),
        };

        progress.on_decision_start();
        let decision = self.resolver.decide(request, &catalog, cancel).await?;
        progress.on_decision_complete(&decision);

        let mut output = ProcessOutput::from_decision(request, &decision);

        if !decision.wants_tools() {
            if decision.should_call {
                debug!("Decision asked for tools but proposed none, nothing to run");
            }
            return Ok(output);
        }

        let report = self
            .dispatcher
            .dispatch_all(&decision.tool_calls, &catalog, cancel, progress)
            .await;
        output.cancelled = report.cancelled;
        output.outcomes = report.outcomes;
        output.aggregate = aggregate_content(&output.results().cloned().collect::<Vec<_>>());

        info!(
            attempted = output.outcomes.len(),
            succeeded = output.success_count(),
            "Tool calls complete"
        );

        if output.cancelled {
            return Ok(output);
        }

        if let Some(verb) = decision.post_process_verb()
            && PostProcessor::applies(Some(verb), &output.aggregate)
        {
            progress.on_post_process_start(verb);
            match self
                .post_processor
                .apply(verb, request, &output.aggregate, cancel)
                .await
            {
                Ok(text) => {
                    progress.on_post_process_complete(true);
                    output.post_processed = Some(text);
                }
                Err(e) => {
                    progress.on_post_process_complete(false);
                    warn!(verb, "Post-processing failed, keeping raw output: {}", e);
                    output.cancelled = matches!(e, GatewayError::Cancelled);
                    output.post_process_error = Some(e.to_string());
                }
            }
        }

        Ok(output)
    }

    /// Release the tool session. Safe to call more than once.
    pub async fn shutdown(&self) {
        self.session.shutdown().await;
    }
}
