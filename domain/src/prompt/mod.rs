//! Prompt domain
//!
//! Instructions handed to the model on every turn.

pub mod agent;

pub use agent::{AGENT_SYSTEM_PROMPT, AgentPromptTemplate};
