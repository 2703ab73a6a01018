//! Interactive chat module
//!
//! Provides a readline-based interactive loop over the request pipeline.

mod repl;

pub use repl::ChatRepl;
