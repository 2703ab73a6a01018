//! Presentation layer for conductor
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod interrupt;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use cli::commands::Cli;
pub use interrupt::InterruptGuard;
pub use output::console::{ConsoleFormatter, LOW_CONFIDENCE_THRESHOLD};
pub use progress::reporter::ProgressReporter;
