//! Human interaction ports: approval gate and user replies.
//!
//! # Architecture
//!
//! Following the Ports and Adapters pattern:
//! - **Ports**: [`ApprovalPort`], [`UserReplyPort`] - defined here
//! - **Adapters**: `InteractiveApproval`, `InteractiveUserReply` - presentation layer
//!
//! # Flow
//!
//! ```text
//! tool_call_pending
//!        ↓
//! waiting_approval ──▶ ApprovalPort::request_approval()
//!        ↓
//!   true  → execute
//!   false → "Tool call was skipped by the user."
//!   Err(Cancelled) → run aborted
//! ```
//!
//! Neither port needs to resolve promptly: the agent races both against its
//! cancellation token.
//!
//! # Built-in Implementations
//!
//! - [`AutoApprove`] - Always approves
//! - [`EmptyUserReply`] - Always answers with an empty string

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Error type for interaction collaborators.
///
/// These represent failures of the collaborator, not decisions made by the
/// user. A user declining a call is `Ok(false)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InteractionError {
    /// The user asked to stop the whole run.
    #[error("Operation cancelled")]
    Cancelled,

    /// Input/output error (e.g., terminal read failure).
    #[error("I/O error: {0}")]
    Io(String),

    /// No way to reach the user.
    #[error("Interaction unavailable: {0}")]
    Unavailable(String),
}

/// Approval checkpoint invoked before a page tool runs.
#[async_trait]
pub trait ApprovalPort: Send + Sync {
    /// Ask whether `tool_name` may run with the given (parsed) arguments.
    async fn request_approval(&self, tool_name: &str, args: &Value) -> Result<bool, InteractionError>;
}

/// Collaborator that answers the model's `ask_user` questions.
#[async_trait]
pub trait UserReplyPort: Send + Sync {
    async fn ask(&self, question: &str) -> Result<String, InteractionError>;
}

/// Approves every call.
pub struct AutoApprove;

#[async_trait]
impl ApprovalPort for AutoApprove {
    async fn request_approval(&self, _tool_name: &str, _args: &Value) -> Result<bool, InteractionError> {
        Ok(true)
    }
}

/// Answers every question with an empty reply.
pub struct EmptyUserReply;

#[async_trait]
impl UserReplyPort for EmptyUserReply {
    async fn ask(&self, _question: &str) -> Result<String, InteractionError> {
        Ok(String::new())
    }
}
