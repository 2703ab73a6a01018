//! Prompt templates for the post-process call

/// Templates for applying one instruction verb to aggregated tool output
pub struct PostProcessPromptTemplate;

impl PostProcessPromptTemplate {
    pub fn system() -> &'static str {
        "You are an expert post-processing assistant. You perform a single action described \
         by an imperative verb (e.g., Summarize, Recommend, Exclude, Transform) on the given \
         content. Return only the final result with no preamble. Keep it faithful, concise, \
         and helpful."
    }

    /// User prompt carrying the verb, the original request and the content
    pub fn user(instruction: &str, request: &str, content: &str) -> String {
        format!(
            "Instruction: {}\n\nUser Request: {}\n\nContent to process:\n{}",
            instruction, request, content
        )
    }
}
