//! Prompt templates for the intent decision call

use crate::tool::entities::ToolCatalog;

/// Templates for the single decision call made per request
pub struct IntentPromptTemplate;

impl IntentPromptTemplate {
    /// System prompt describing every available tool and the reply contract.
    ///
    /// Each tool is embedded as `{name, description, parameters}` with its
    /// JSON schema, pretty-printed.
    pub fn system(catalog: &ToolCatalog) -> String {
        let tools: Vec<serde_json::Value> = catalog.all().map(|t| t.to_prompt_json()).collect();
        let tools_json = serde_json::to_string_pretty(&tools).unwrap_or_else(|_| "[]".to_string());

        format!(
            r#"You are an intelligent agent that helps users with tasks. You have access to the following tools:

{tools_json}

Your job is to analyze user requests and determine:
1. Whether any tools should be called to fulfill the request
2. Which specific tools to call and with what parameters
3. The reasoning behind your decisions
4. Whether the combined tool output needs one more transformation before it is shown

IMPORTANT: Reply ONLY with a single valid JSON object with this exact structure:
{{
  "message": "A helpful message to the user about what you understand from their request",
  "tool_calls": [
    {{
      "name": "tool_name",
      "arguments": {{
        "param1": "value1",
        "param2": "value2"
      }},
      "reasoning": "Why this tool call is needed"
    }}
  ],
  "should_call": true,
  "confidence": 0.9,
  "explanation": "Detailed explanation of your analysis and decisions",
  "post_process": "Summarize"
}}

Field rules:
- "should_call" is true or false
- "confidence" is a number between 0.0 and 1.0
- "tool_calls" lists calls in the order they should run; use [] when no tool is needed
- "post_process" is a single imperative verb (e.g. Summarize, Recommend, Exclude, Transform), or "" when the tool output should be shown as is

Guidelines:
- If the request can be answered without any of the tools above, set "should_call" to false
- Be conservative: only call tools when clearly needed
- Only use tool names from the list above, and supply every required parameter
- Extract parameters accurately from the user's input
- Provide clear reasoning for each call
- Set confidence based on how clear the user's intent is"#,
            tools_json = tools_json
        )
    }

    /// User prompt wrapping the raw request
    pub fn user(request: &str) -> String {
        format!(
            r#"Analyze this user request and determine if any tools should be called:

User Request: "{}"

Instructions:
1. Decide if any of the available tools are needed based on their names, descriptions, and JSON schemas
2. If tools should be used, specify which ones and with what parameters
3. Provide reasoning for your decisions
4. Respond in JSON format as specified in the system prompt
5. Decide whether the tool output needs post-processing; if so, name the action as a verb (e.g. Summarize, Recommend)"#,
            request
        )
    }
}
