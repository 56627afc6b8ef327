//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod discover_tools;
pub mod execute_tool;
pub mod request_completion;
pub mod run_agent;
pub(crate) mod shared;

#[cfg(test)]
pub(crate) mod test_support;
