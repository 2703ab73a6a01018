//! Prompt domain
//!
//! Templates for the two kinds of LLM call the pipeline makes: the intent
//! decision and the optional post-process step.

mod intent;
mod post_process;

pub use intent::IntentPromptTemplate;
pub use post_process::PostProcessPromptTemplate;
