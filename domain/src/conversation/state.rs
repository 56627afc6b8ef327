//! Conversation state threaded through the agent loop.

use crate::tool::invocation::ToolInvocationResult;
use serde::{Deserialize, Serialize};

/// User message that nudges the model on after an intermediate utterance.
pub const CONTINUE_PROMPT: &str = "Continue.";

/// Opaque token for the history held by the completion backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContinuationHandle(String);

impl ContinuationHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContinuationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One item submitted to the model on the next turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputItem {
    /// A user-role message (the goal, or the continuation prompt)
    Message { content: String },
    /// The output of a tool call, correlated by call id
    FunctionCallOutput { call_id: String, output: String },
}

impl InputItem {
    pub fn user(content: impl Into<String>) -> Self {
        InputItem::Message {
            content: content.into(),
        }
    }

    pub fn goal(goal: &str) -> Self {
        Self::user(format!("Goal: {}", goal))
    }

    pub fn continue_prompt() -> Self {
        Self::user(CONTINUE_PROMPT)
    }
}

impl From<ToolInvocationResult> for InputItem {
    fn from(result: ToolInvocationResult) -> Self {
        InputItem::FunctionCallOutput {
            call_id: result.call_id,
            output: result.output_text,
        }
    }
}

/// Everything needed to make the next model call.
///
/// History lives with the backend behind [`ContinuationHandle`]; the caller
/// only ever holds the handle and the not-yet-submitted input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConversationState {
    pub continuation: Option<ContinuationHandle>,
    pub pending_input: Vec<InputItem>,
}

impl ConversationState {
    /// Fresh conversation whose first input is the user's goal.
    pub fn new(goal: &str) -> Self {
        Self {
            continuation: None,
            pending_input: vec![InputItem::goal(goal)],
        }
    }

    /// State after a successful model call: the new handle, nothing pending.
    pub fn continued(handle: ContinuationHandle) -> Self {
        Self {
            continuation: Some(handle),
            pending_input: Vec::new(),
        }
    }

    /// Replace the pending input for the next turn.
    pub fn queue(&mut self, items: Vec<InputItem>) {
        self.pending_input = items;
    }

    pub fn queue_tool_results(&mut self, results: Vec<ToolInvocationResult>) {
        self.queue(results.into_iter().map(InputItem::from).collect());
    }

    pub fn queue_continue_prompt(&mut self) {
        self.queue(vec![InputItem::continue_prompt()]);
    }

    pub fn is_started(&self) -> bool {
        self.continuation.is_some()
    }
}
