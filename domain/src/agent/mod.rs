//! Agent domain module
//!
//! Contains the phases of the agent loop and the per-run state it carries
//! between iterations.

pub mod entities;

pub use entities::{AgentPhase, AgentRun};
