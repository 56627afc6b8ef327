//! Presentation layer for pagepilot
//!
//! This crate contains console adapters a host can plug into an agent run:
//! a coloured event reporter and interactive approval and reply prompts.

pub mod agent;

// Re-export commonly used types
pub use agent::{ConsoleEventReporter, InteractiveApproval, InteractiveUserReply};
