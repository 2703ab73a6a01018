//! Post-processor
//!
//! Applies one free-text instruction verb ("Summarize", "Recommend", ...)
//! to the aggregated tool output with one more completion call.

use crate::config::CompletionParams;
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::use_cases::shared::cancellable;
use conductor_domain::PostProcessPromptTemplate;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub struct PostProcessor {
    gateway: Arc<dyn LlmGateway>,
    params: CompletionParams,
}

impl PostProcessor {
    pub fn new(gateway: Arc<dyn LlmGateway>, params: CompletionParams) -> Self {
        Self { gateway, params }
    }

    /// Whether a post-process call is warranted at all
    pub fn applies(verb: Option<&str>, aggregate: &str) -> bool {
        verb.is_some_and(|v| !v.trim().is_empty()) && !aggregate.is_empty()
    }

    /// Apply `verb` to `content`, with `request` given as context.
    ///
    /// A blank reply counts as a failure so the caller keeps the raw content.
    pub async fn apply(
        &self,
        verb: &str,
        request: &str,
        content: &str,
        cancel: &CancellationToken,
    ) -> Result<String, GatewayError> {
        let verb = verb.trim();
        let completion = CompletionRequest::new(
            PostProcessPromptTemplate::system(),
            PostProcessPromptTemplate::user(verb, request, content),
            &self.params,
        );

        info!(verb, content_len = content.len(), "Post-processing tool output");
        let reply = cancellable(cancel, self.gateway.complete(&completion), || {
            GatewayError::Cancelled
        })
        .await?;

        let reply = reply.trim();
        if reply.is_empty() {
            return Err(GatewayError::EmptyResponse);
        }
        Ok(reply.to_string())
    }
}
