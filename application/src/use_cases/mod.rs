//! Use cases
//!
//! Application-level operations that orchestrate domain logic. Each
//! pipeline stage is its own type; [`process_request`] wires them together.

pub mod dispatch;
pub mod post_process;
pub mod process_request;
pub mod registry_cache;
pub mod resolve_intent;
pub mod session;
pub(crate) mod shared;

#[cfg(test)]
pub(crate) mod test_support;
