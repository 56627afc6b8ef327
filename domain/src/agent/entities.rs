//! Agent domain entities

use crate::conversation::state::ConversationState;
use crate::tool::entities::Tool;
use serde::{Deserialize, Serialize};

/// Phase of the agent loop.
///
/// ```text
/// Discovering ─▶ Requesting ─┬─▶ DispatchingCalls ─▶ Settling ─┐
///      ▲                     ├─▶ FinalText ────────────────────┤
///      │                     └─▶ NoOp ─────────────────────────┤
///      └───────────────────────────────────────────────────────┘
/// terminal: Completed | Aborted | Error | IterationLimitReached
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentPhase {
    /// Querying origins for the current tool set
    Discovering,
    /// Waiting on the model
    Requesting,
    /// Running the calls the model asked for
    DispatchingCalls,
    /// The model produced text without calling a tool
    FinalText,
    /// The model produced nothing usable
    NoOp,
    /// Preparing the next turn's input
    Settling,
    Completed,
    Aborted,
    Error,
    IterationLimitReached,
}

impl AgentPhase {
    pub fn as_str(&self) -> &str {
        match self {
            AgentPhase::Discovering => "discovering",
            AgentPhase::Requesting => "requesting",
            AgentPhase::DispatchingCalls => "dispatching_calls",
            AgentPhase::FinalText => "final_text",
            AgentPhase::NoOp => "no_op",
            AgentPhase::Settling => "settling",
            AgentPhase::Completed => "completed",
            AgentPhase::Aborted => "aborted",
            AgentPhase::Error => "error",
            AgentPhase::IterationLimitReached => "iteration_limit_reached",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AgentPhase::Completed
                | AgentPhase::Aborted
                | AgentPhase::Error
                | AgentPhase::IterationLimitReached
        )
    }
}

impl std::fmt::Display for AgentPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mutable state of one agent run.
#[derive(Debug, Clone)]
pub struct AgentRun {
    pub goal: String,
    pub phase: AgentPhase,
    /// 1-based; 0 until the first iteration starts
    pub iteration: usize,
    pub max_iterations: usize,
    pub conversation: ConversationState,
    /// Snapshot from the most recent discovery
    pub tools: Vec<Tool>,
}

impl AgentRun {
    pub fn new(goal: impl Into<String>, max_iterations: usize) -> Self {
        let goal = goal.into();
        let conversation = ConversationState::new(&goal);
        Self {
            goal,
            phase: AgentPhase::Discovering,
            iteration: 0,
            max_iterations,
            conversation,
            tools: Vec::new(),
        }
    }

    /// Move to the next iteration. Returns `false` once the cap is reached.
    pub fn next_iteration(&mut self) -> bool {
        if self.iteration >= self.max_iterations {
            return false;
        }
        self.iteration += 1;
        self.phase = AgentPhase::Discovering;
        true
    }

    /// Iteration to report in events; never 0.
    pub fn reported_iteration(&self) -> usize {
        self.iteration.max(1)
    }

    pub fn set_phase(&mut self, phase: AgentPhase) {
        self.phase = phase;
    }

    /// Replace the tool snapshot wholesale.
    pub fn replace_tools(&mut self, tools: Vec<Tool>) {
        self.tools = tools;
    }

    /// The snapshot entry a call named `name` should be routed to.
    ///
    /// When several origins expose the same name the first one discovered wins.
    pub fn find_tool(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.name == name)
    }
}
