//! Intent resolver
//!
//! Makes the single decision call for a request and turns the model's reply
//! into an [`IntentDecision`]. A reply that cannot be parsed never becomes
//! an error: it is logged and replaced by [`IntentDecision::fallback`].

use crate::config::CompletionParams;
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::use_cases::shared::cancellable;
use conductor_domain::util::truncate_str;
use conductor_domain::{IntentDecision, IntentPromptTemplate, ToolCatalog, parse_decision};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const PREVIEW_BYTES: usize = 200;

pub struct IntentResolver {
    gateway: Arc<dyn LlmGateway>,
    params: CompletionParams,
}

impl IntentResolver {
    pub fn new(gateway: Arc<dyn LlmGateway>, params: CompletionParams) -> Self {
        Self { gateway, params }
    }

    /// Ask the model what to do about `request`, given the tools in `catalog`.
    ///
    /// Only a failed completion call is an error; a malformed or empty
    /// reply yields the fallback decision.
    pub async fn decide(
        &self,
        request: &str,
        catalog: &ToolCatalog,
        cancel: &CancellationToken,
    ) -> Result<IntentDecision, GatewayError> {
        let completion = CompletionRequest::new(
            IntentPromptTemplate::system(catalog),
            IntentPromptTemplate::user(request),
            &self.params,
        );

        debug!(
            model = %self.params.model,
            tool_count = catalog.len(),
            "Requesting intent decision"
        );
        let reply = match cancellable(cancel, self.gateway.complete(&completion), || {
            GatewayError::Cancelled
        })
        .await
        {
            Ok(reply) => reply,
            // A blank reply is malformed output, not a failed call
            Err(GatewayError::EmptyResponse) => String::new(),
            Err(e) => return Err(e),
        };

        let decision = Self::interpret(&reply);
        info!(
            should_call = decision.should_call,
            tool_calls = decision.tool_calls.len(),
            confidence = decision.confidence,
            "Intent decision complete"
        );
        Ok(decision)
    }

    /// Parse a raw reply, recovering into the fallback decision.
    pub fn interpret(reply: &str) -> IntentDecision {
        match parse_decision(reply) {
            Ok(decision) => decision,
            Err(e) => {
                warn!(
                    error = %e,
                    content = truncate_str(reply.trim(), PREVIEW_BYTES),
                    "Failed to parse decision reply, using fallback"
                );
                IntentDecision::fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{HangingGateway, ScriptedGateway, summarize_tool};
    use conductor_domain::ToolCall;

    fn params() -> CompletionParams {
        CompletionParams::new("gpt-4o-mini", 1000, 0.2)
    }

    fn catalog() -> ToolCatalog {
        ToolCatalog::new().register(summarize_tool())
    }

    const WELL_FORMED: &str = r#"{
        "message": "Summarizing your text.",
        "tool_calls": [{
            "name": "summarize_content",
            "arguments": {"content": "Rust is fast."},
            "reasoning": "User asked for a summary"
        }],
        "should_call": true,
        "confidence": 0.9,
        "explanation": "Explicit summary request",
        "post_process": ""
    }"#;

    #[tokio::test]
    async fn test_decide_well_formed_unchanged() {
        let gateway = Arc::new(ScriptedGateway::replying(&[WELL_FORMED]));
        let resolver = IntentResolver::new(gateway.clone(), params());

        let decision = resolver
            .decide("Summarize this: Rust is fast.", &catalog(), &CancellationToken::new())
            .await
            .unwrap();

        let expected = IntentDecision::no_tools("Summarizing your text.", 0.9)
            .with_call(
                ToolCall::new("summarize_content")
                    .with_arg("content", "Rust is fast.")
                    .with_reasoning("User asked for a summary"),
            )
            .with_explanation("Explicit summary request");
        assert_eq!(decision, expected);
    }

    #[tokio::test]
    async fn test_decide_sends_catalog_and_params() {
        let gateway = Arc::new(ScriptedGateway::replying(&[WELL_FORMED]));
        let resolver = IntentResolver::new(gateway.clone(), params());

        resolver
            .decide("hello", &catalog(), &CancellationToken::new())
            .await
            .unwrap();

        let requests = gateway.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].system_prompt.contains("summarize_content"));
        assert!(requests[0].user_prompt.contains("User Request: \"hello\""));
        assert_eq!(requests[0].model, "gpt-4o-mini");
        assert_eq!(requests[0].max_tokens, 1000);
        assert_eq!(requests[0].temperature, 0.2);
    }

    #[tokio::test]
    async fn test_decide_malformed_replies_fall_back() {
        let malformed = [
            "I think you want a summary.",
            &WELL_FORMED[..40],
            r#"{"message": "hi", "confidence": 0.8}"#,
            r#"{"should_call": true, "confidence": 0.8, "tool_calls": []}"#,
            "",
        ];

        for reply in malformed {
            let gateway = Arc::new(ScriptedGateway::replying(&[reply]));
            let resolver = IntentResolver::new(gateway, params());
            let decision = resolver
                .decide("summarize", &catalog(), &CancellationToken::new())
                .await
                .unwrap();

            assert!(!decision.should_call, "reply: {reply}");
            assert_eq!(decision.confidence, 0.1);
            assert!(decision.is_fallback());
        }
    }

    #[tokio::test]
    async fn test_decide_fenced_reply() {
        let fenced = format!("```json\n{}\n```", WELL_FORMED);
        let gateway = Arc::new(ScriptedGateway::replying(&[fenced.as_str()]));
        let resolver = IntentResolver::new(gateway, params());

        let decision = resolver
            .decide("summarize", &catalog(), &CancellationToken::new())
            .await
            .unwrap();
        assert!(decision.wants_tools());
    }

    #[tokio::test]
    async fn test_decide_gateway_failure_is_error() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Err(GatewayError::ConnectionError(
            "401 Unauthorized".to_string(),
        ))]));
        let resolver = IntentResolver::new(gateway, params());

        let result = resolver
            .decide("summarize", &catalog(), &CancellationToken::new())
            .await;
        assert!(matches!(result, Err(GatewayError::ConnectionError(_))));
    }

    #[tokio::test]
    async fn test_decide_empty_response_falls_back() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Err(GatewayError::EmptyResponse)]));
        let resolver = IntentResolver::new(gateway, params());

        let decision = resolver
            .decide("summarize", &catalog(), &CancellationToken::new())
            .await
            .unwrap();
        assert!(decision.is_fallback());
        assert!(!decision.should_call);
    }

    #[tokio::test]
    async fn test_decide_cancelled() {
        let resolver = IntentResolver::new(Arc::new(HangingGateway), params());
        let cancel = CancellationToken::new();
        let canceller = cancel.clone();
        tokio::spawn(async move { canceller.cancel() });

        let result = resolver.decide("summarize", &catalog(), &cancel).await;
        assert!(matches!(result, Err(GatewayError::Cancelled)));
    }
}
