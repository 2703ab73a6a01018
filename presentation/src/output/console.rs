//! Console output formatter for request results

use colored::Colorize;
use conductor_application::{CallOutcome, ProcessOutput};
use conductor_domain::ToolCatalog;
use conductor_domain::util::preview;

/// Confidence below which the decision is flagged to the user
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Tool output longer than this is shown as a preview
const PREVIEW_BYTES: usize = 500;

/// Formats request results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete result of one request
    pub fn format(output: &ProcessOutput) -> String {
        let mut text = String::new();

        text.push_str(&format!("{} {}\n", "Agent:".cyan().bold(), output.message));

        if output.is_low_confidence(LOW_CONFIDENCE_THRESHOLD) {
            text.push_str(&format!(
                "{}\n",
                format!(
                    "Low confidence ({:.0}%), the request may have been misread",
                    output.confidence * 100.0
                )
                .yellow()
            ));
        }

        if !output.tools_executed() {
            if !output.explanation.is_empty() {
                text.push_str(&format!("{} {}\n", "Note:".dimmed(), output.explanation));
            }
            return text;
        }

        text.push_str(&Self::section_header("Tool calls"));
        let total = output.outcomes.len();
        for (i, outcome) in output.outcomes.iter().enumerate() {
            text.push_str(&Self::format_outcome(i + 1, total, outcome));
        }

        if output.cancelled {
            text.push_str(&format!("\n{}\n", "Cancelled, remaining work skipped".yellow()));
        }

        if let Some(processed) = &output.post_processed {
            let verb = output.post_process.as_deref().unwrap_or("post-process");
            text.push_str(&Self::section_header(&format!("Result ({})", verb)));
            text.push_str(processed);
            text.push('\n');
        } else if !output.aggregate.is_empty() {
            if let Some(error) = &output.post_process_error {
                text.push_str(&format!(
                    "\n{} {}\n",
                    "Post-processing failed:".red(),
                    error
                ));
            }
            text.push_str(&Self::section_header("Result"));
            text.push_str(&output.aggregate);
            text.push('\n');
        }

        text
    }

    fn format_outcome(position: usize, total: usize, outcome: &CallOutcome) -> String {
        let result = &outcome.result;
        let mut text = String::new();

        let marker = if result.is_success() {
            "v".green()
        } else {
            "x".red()
        };
        let timing = result
            .duration_ms
            .map(|ms| format!(" ({} ms)", ms))
            .unwrap_or_default();
        text.push_str(&format!(
            "\n{} [{}/{}] {}{}\n",
            marker,
            position,
            total,
            outcome.call.name.bold(),
            timing.dimmed()
        ));

        if !outcome.call.reasoning.is_empty() {
            text.push_str(&format!("  {} {}\n", "why:".dimmed(), outcome.call.reasoning));
        }

        match result.error() {
            Some(failure) => {
                text.push_str(&format!("  {} {}\n", "error:".red(), failure));
            }
            None => {
                text.push_str(&Self::indent(&preview(&result.content, PREVIEW_BYTES), "  "));
                text.push('\n');
            }
        }

        text
    }

    /// Format the tool listing
    pub fn format_tools(catalog: &ToolCatalog) -> String {
        if catalog.is_empty() {
            return format!("{}\n", "No tools available.".yellow());
        }

        let title = format!("Available tools ({}):", catalog.len());
        let mut text = format!("{}\n", title.cyan().bold());
        for tool in catalog.all() {
            text.push_str(&format!("\n{}\n", tool.name.bold()));
            let description = if tool.description.is_empty() {
                "<no description>"
            } else {
                &tool.description
            };
            text.push_str(&format!("  {}\n", description));

            let schema = match &tool.input_schema {
                Some(schema) => serde_json::to_string_pretty(schema).unwrap_or_default(),
                None if tool.parameters.properties.is_empty() => String::new(),
                None => serde_json::to_string_pretty(&tool.schema_json()).unwrap_or_default(),
            };
            let schema = if schema.is_empty() { "<none>".to_string() } else { schema };
            text.push_str(&format!("  {}\n", "parameters:".dimmed()));
            text.push_str(&Self::indent(&schema, "    "));
            text.push('\n');
        }

        text
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conductor_domain::{ToolCall, ToolDefinition, ToolExecutionResult, ToolFailure};

    fn plain() {
        colored::control::set_override(false);
    }

    fn output(message: &str, confidence: f64) -> ProcessOutput {
        ProcessOutput {
            request: "do it".to_string(),
            message: message.to_string(),
            confidence,
            explanation: String::new(),
            should_call: false,
            post_process: None,
            outcomes: Vec::new(),
            aggregate: String::new(),
            post_processed: None,
            post_process_error: None,
            cancelled: false,
        }
    }

    #[test]
    fn test_no_tools_shows_explanation() {
        plain();
        let mut out = output("Hello! How can I help?", 0.9);
        out.explanation = "Greeting, no tool needed".to_string();

        let text = ConsoleFormatter::format(&out);
        assert!(text.contains("Hello! How can I help?"));
        assert!(text.contains("Greeting, no tool needed"));
        assert!(!text.contains("Low confidence"));
    }

    #[test]
    fn test_low_confidence_warning() {
        plain();
        let text = ConsoleFormatter::format(&output("Not sure", 0.3));
        assert!(text.contains("Low confidence (30%)"));
    }

    #[test]
    fn test_outcomes_numbered_with_errors() {
        plain();
        let mut out = output("Running two tools", 0.9);
        out.should_call = true;
        out.outcomes = vec![
            CallOutcome {
                call: ToolCall::new("scrape_url").with_reasoning("fetch the page"),
                result: ToolExecutionResult::success("scrape_url", "page body"),
            },
            CallOutcome {
                call: ToolCall::new("summarize_content"),
                result: ToolExecutionResult::failure(
                    "summarize_content",
                    ToolFailure::new(ToolFailure::MISSING_PARAMETER, "missing content"),
                ),
            },
        ];
        out.aggregate = "page body".to_string();

        let text = ConsoleFormatter::format(&out);
        assert!(text.contains("[1/2] scrape_url"));
        assert!(text.contains("why: fetch the page"));
        assert!(text.contains("[2/2] summarize_content"));
        assert!(text.contains("[MISSING_PARAMETER] missing content"));
        assert!(text.contains("page body"));
    }

    #[test]
    fn test_post_processed_replaces_raw() {
        plain();
        let mut out = output("Summarizing", 0.9);
        out.outcomes = vec![CallOutcome {
            call: ToolCall::new("scrape_url"),
            result: ToolExecutionResult::success("scrape_url", "raw raw raw"),
        }];
        out.aggregate = "raw raw raw".to_string();
        out.post_process = Some("summarize".to_string());
        out.post_processed = Some("short".to_string());

        let text = ConsoleFormatter::format(&out);
        assert!(text.contains("Result (summarize)"));
        assert!(text.trim_end().ends_with("short"));
    }

    #[test]
    fn test_post_process_error_shows_raw() {
        plain();
        let mut out = output("Summarizing", 0.9);
        out.outcomes = vec![CallOutcome {
            call: ToolCall::new("scrape_url"),
            result: ToolExecutionResult::success("scrape_url", "raw text"),
        }];
        out.aggregate = "raw text".to_string();
        out.post_process_error = Some("LLM returned an empty response".to_string());

        let text = ConsoleFormatter::format(&out);
        assert!(text.contains("Post-processing failed: LLM returned an empty response"));
        assert!(text.trim_end().ends_with("raw text"));
    }

    #[test]
    fn test_long_content_is_previewed() {
        plain();
        let mut out = output("Scraping", 0.9);
        out.outcomes = vec![CallOutcome {
            call: ToolCall::new("scrape_url"),
            result: ToolExecutionResult::success("scrape_url", "x".repeat(2000)),
        }];

        let text = ConsoleFormatter::format(&out);
        assert!(text.contains("(2000 bytes total)"));
        assert!(text.len() < 1000);
    }

    #[test]
    fn test_format_tools() {
        plain();
        let catalog = ToolCatalog::new()
            .register(ToolDefinition::from_input_schema(
                "scrape_url",
                "Fetch a web page",
                serde_json::json!({"type": "object", "properties": {"url": {"type": "string"}}}),
            ))
            .register(ToolDefinition::new("ping", ""));

        let text = ConsoleFormatter::format_tools(&catalog);
        assert!(text.contains("Available tools (2):"));
        assert!(text.contains("Fetch a web page"));
        assert!(text.contains("\"url\""));
        assert!(text.contains("<no description>"));
        assert!(text.contains("<none>"));
    }

    #[test]
    fn test_format_empty_catalog() {
        plain();
        assert!(ConsoleFormatter::format_tools(&ToolCatalog::new()).contains("No tools available"));
    }
}
