use crate::ports::interaction::InteractionError;
use crate::use_cases::request_completion::CompletionError;
use pagepilot_domain::{CompletionReason, ConversationState, ToolInvocationResult};
use thiserror::Error;

/// Errors that can occur during agent execution
///
/// Tool failures are not listed here: they become tool output text and the
/// run continues.
#[derive(Error, Debug)]
pub enum RunAgentError {
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Completion failed: {0}")]
    Completion(CompletionError),

    #[error("Interaction failed: {0}")]
    Interaction(InteractionError),
}

impl RunAgentError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunAgentError::Cancelled)
    }
}

impl From<CompletionError> for RunAgentError {
    fn from(error: CompletionError) -> Self {
        match error {
            CompletionError::Cancelled => RunAgentError::Cancelled,
            other => RunAgentError::Completion(other),
        }
    }
}

impl From<InteractionError> for RunAgentError {
    fn from(error: InteractionError) -> Self {
        match error {
            InteractionError::Cancelled => RunAgentError::Cancelled,
            other => RunAgentError::Interaction(other),
        }
    }
}

/// Result of a run that ended with a `completed` event.
#[derive(Debug, Clone)]
pub struct RunAgentOutput {
    pub reason: CompletionReason,
    /// Text carried by the `completed` event
    pub summary: String,
    /// Iterations started, including the last one
    pub iterations: usize,
    /// Conversation as it stood when the run ended
    pub conversation: ConversationState,
}

/// How a batch of tool calls ended.
pub(super) enum DispatchOutcome {
    /// Every call produced a result, in request order
    Results(Vec<ToolInvocationResult>),
    /// The model called `complete`; later calls were dropped
    Completed(String),
}
