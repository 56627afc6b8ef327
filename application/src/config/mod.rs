//! Application-level configuration.
//!
//! - [`AgentConfig`]: agent loop control (iterations, approval, origins, settle delay)

pub mod agent_config;

pub use agent_config::{AgentConfig, TextReplyPolicy};
