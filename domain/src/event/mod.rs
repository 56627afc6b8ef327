//! Agent events
//!
//! [`AgentEvent`] is the only channel through which a run talks to its host.
//! One event is emitted per observable transition, in order, and each one
//! carries the iteration it happened in.
//!
//! Serialized as `{"type": "<snake_case>", "data": {...}}`, e.g.
//!
//! ```
//! use pagepilot_domain::event::AgentEvent;
//!
//! let event = AgentEvent::Aborted { iteration: 3 };
//! let json = serde_json::to_value(&event).unwrap();
//! assert_eq!(json["type"], "aborted");
//! assert_eq!(json["data"]["iteration"], 3);
//! ```

use crate::tool::entities::Tool;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Why a run ended successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    /// The model called `complete`
    GoalAchieved,
    /// Discovery found nothing left to do
    NoToolsAvailable,
    /// Single-turn mode stopped after one round of calls
    SingleTurn,
    /// The iteration cap was reached
    IterationLimit,
    /// The model answered with text and the run treats that as final
    FinalText,
}

impl CompletionReason {
    /// Human-readable message for reasons that carry no text of their own.
    pub fn default_message(&self) -> &'static str {
        match self {
            CompletionReason::GoalAchieved => "Goal achieved.",
            CompletionReason::NoToolsAvailable => "No tools available, end state reached.",
            CompletionReason::SingleTurn => "Single-turn mode, stopping after first tool call.",
            CompletionReason::IterationLimit => "Max iterations reached.",
            CompletionReason::FinalText => "Model finished with a text reply.",
        }
    }
}

impl std::fmt::Display for CompletionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.default_message())
    }
}

/// An externally observable transition of the agent loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum AgentEvent {
    ToolsDiscovered {
        iteration: usize,
        tools: Vec<Tool>,
    },
    LlmRequest {
        iteration: usize,
        message_count: usize,
    },
    ToolCallPending {
        iteration: usize,
        name: String,
        args: Value,
        tool_call_id: String,
    },
    WaitingApproval {
        iteration: usize,
        name: String,
        args: Value,
    },
    ToolExecuting {
        iteration: usize,
        name: String,
    },
    ToolResult {
        iteration: usize,
        name: String,
        result: String,
    },
    AskUser {
        iteration: usize,
        question: String,
    },
    Completed {
        iteration: usize,
        reason: String,
        kind: CompletionReason,
    },
    Skipped {
        iteration: usize,
        name: String,
    },
    Aborted {
        iteration: usize,
    },
    Error {
        iteration: usize,
        error: String,
    },
}

impl AgentEvent {
    pub fn completed(iteration: usize, kind: CompletionReason, reason: impl Into<String>) -> Self {
        AgentEvent::Completed {
            iteration,
            reason: reason.into(),
            kind,
        }
    }

    pub fn iteration(&self) -> usize {
        match self {
            AgentEvent::ToolsDiscovered { iteration, .. }
            | AgentEvent::LlmRequest { iteration, .. }
            | AgentEvent::ToolCallPending { iteration, .. }
            | AgentEvent::WaitingApproval { iteration, .. }
            | AgentEvent::ToolExecuting { iteration, .. }
            | AgentEvent::ToolResult { iteration, .. }
            | AgentEvent::AskUser { iteration, .. }
            | AgentEvent::Completed { iteration, .. }
            | AgentEvent::Skipped { iteration, .. }
            | AgentEvent::Aborted { iteration }
            | AgentEvent::Error { iteration, .. } => *iteration,
        }
    }

    /// The wire name of this event (`tools_discovered`, `llm_request`, ...).
    pub fn event_type(&self) -> &'static str {
        match self {
            AgentEvent::ToolsDiscovered { .. } => "tools_discovered",
            AgentEvent::LlmRequest { .. } => "llm_request",
            AgentEvent::ToolCallPending { .. } => "tool_call_pending",
            AgentEvent::WaitingApproval { .. } => "waiting_approval",
            AgentEvent::ToolExecuting { .. } => "tool_executing",
            AgentEvent::ToolResult { .. } => "tool_result",
            AgentEvent::AskUser { .. } => "ask_user",
            AgentEvent::Completed { .. } => "completed",
            AgentEvent::Skipped { .. } => "skipped",
            AgentEvent::Aborted { .. } => "aborted",
            AgentEvent::Error { .. } => "error",
        }
    }

    /// Terminal events end a run; nothing is emitted after one.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AgentEvent::Completed { .. } | AgentEvent::Aborted { .. } | AgentEvent::Error { .. }
        )
    }
}
