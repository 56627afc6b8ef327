//! Tool invocation requests, results and execution outcomes

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Output text recorded for a call the user declined to approve.
pub const SKIPPED_BY_USER: &str = "Tool call was skipped by the user.";

/// A tool call requested by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInvocationRequest {
    /// Correlates to exactly one [`ToolInvocationResult`]
    pub call_id: String,
    pub name: String,
    /// Arguments exactly as the model produced them
    pub raw_arguments: String,
}

impl ToolInvocationRequest {
    pub fn new(
        call_id: impl Into<String>,
        name: impl Into<String>,
        raw_arguments: impl Into<String>,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            name: name.into(),
            raw_arguments: raw_arguments.into(),
        }
    }

    /// Arguments parsed as JSON, or the raw string when they are not JSON.
    ///
    /// Arguments are opaque to the orchestrator; validating them against the
    /// schema is the tool's job.
    pub fn parsed_arguments(&self) -> Value {
        serde_json::from_str(&self.raw_arguments)
            .unwrap_or_else(|_| Value::String(self.raw_arguments.clone()))
    }
}

/// Model-facing result of one tool call. Always plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInvocationResult {
    pub call_id: String,
    pub output_text: String,
}

impl ToolInvocationResult {
    pub fn new(call_id: impl Into<String>, output_text: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            output_text: output_text.into(),
        }
    }

    pub fn skipped(call_id: impl Into<String>) -> Self {
        Self::new(call_id, SKIPPED_BY_USER)
    }
}

/// Normalised outcome of routing a call to an origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    Success { output: String },
    Failure { error: String },
}

impl ExecutionOutcome {
    pub fn success(output: impl Into<String>) -> Self {
        ExecutionOutcome::Success {
            output: output.into(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        ExecutionOutcome::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Success { .. })
    }

    /// Text handed back to the model: the output, or `Error: <message>`.
    pub fn output_text(&self) -> String {
        match self {
            ExecutionOutcome::Success { output } => output.clone(),
            ExecutionOutcome::Failure { error } => format!("Error: {}", error),
        }
    }
}
