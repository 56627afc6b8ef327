//! Domain layer for pagepilot
//!
//! This crate contains the core types of the page-driving agent. It has no
//! dependencies on infrastructure or presentation concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Tools and origins
//!
//! A page exposes [`Tool`]s from one or more origins (its top-level document
//! and embedded frames). Each tool carries an [`OriginKey`] for routing and a
//! trust flag. The set changes as the page changes, so it is rediscovered on
//! every iteration.
//!
//! ## Conversation
//!
//! The model backend keeps the history; the agent only threads a
//! [`ContinuationHandle`] and the next batch of [`InputItem`]s through
//! [`ConversationState`].
//!
//! ## Events
//!
//! Every observable transition of a run is an [`AgentEvent`].

pub mod agent;
pub mod conversation;
pub mod core;
pub mod event;
pub mod prompt;
pub mod tool;

// Re-export commonly used types
pub use agent::{AgentPhase, AgentRun};
pub use conversation::{
    CONTINUE_PROMPT, CompletionOutcome, ContinuationHandle, ConversationState, InputItem,
    OutputItem,
};
pub use event::{AgentEvent, CompletionReason};
pub use prompt::{AGENT_SYSTEM_PROMPT, AgentPromptTemplate};
pub use tool::{
    BuiltinTool, ExecutionOutcome, FunctionTool, OriginKey, Tool, ToolDescriptor,
    ToolInvocationRequest, ToolInvocationResult, builtin_function_tools,
    invocation::SKIPPED_BY_USER,
};
