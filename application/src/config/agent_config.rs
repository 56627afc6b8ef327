//! Agent run parameters.
//!
//! [`AgentConfig`] is passed to
//! [`RunAgentUseCase`](crate::use_cases::run_agent::RunAgentUseCase) at
//! construction. The loop never reads settings from anywhere else.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What the loop does when the model answers with text and no tool call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextReplyPolicy {
    /// Report the text, queue "Continue." and run another iteration.
    #[default]
    Continue,
    /// Treat the text as the final answer and complete the run.
    Complete,
}

/// Agent loop control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum number of model requests per run (at least 1).
    pub max_iterations: usize,
    /// Skip the approval gate for page tools.
    pub auto_approve: bool,
    /// Discover and execute tools in embedded documents, not just the top-level one.
    pub allow_embedded_origins: bool,
    /// Pause after each successful page tool so the page can settle.
    pub settle_delay: Duration,
    /// Stop after the first round of tool calls.
    pub single_turn: bool,
    pub text_reply: TextReplyPolicy,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            auto_approve: true,
            allow_embedded_origins: false,
            settle_delay: Duration::from_millis(500),
            single_turn: false,
            text_reply: TextReplyPolicy::Continue,
        }
    }
}

impl AgentConfig {
    // ==================== Builder Methods ====================

    /// Values below 1 are raised to 1.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max.max(1);
        self
    }

    pub fn with_auto_approve(mut self, auto_approve: bool) -> Self {
        self.auto_approve = auto_approve;
        self
    }

    pub fn with_allow_embedded_origins(mut self, allow: bool) -> Self {
        self.allow_embedded_origins = allow;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_single_turn(mut self, single_turn: bool) -> Self {
        self.single_turn = single_turn;
        self
    }

    pub fn with_text_reply(mut self, policy: TextReplyPolicy) -> Self {
        self.text_reply = policy;
        self
    }
}
