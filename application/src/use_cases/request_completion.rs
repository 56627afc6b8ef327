//! Completion Client
//!
//! Builds one [`CompletionRequest`] from the current tool snapshot and
//! conversation state, sends it, and interprets the response.
//!
//! The request is the only network call that is aborted mid-flight on
//! cancellation. The caller's [`ConversationState`] is borrowed, not taken,
//! so an aborted or failed call leaves it exactly as it was.

use crate::ports::completion_backend::{BackendError, CompletionBackend, CompletionRequest};
use crate::use_cases::shared::cancellable;
use pagepilot_domain::{
    AgentPromptTemplate, CompletionOutcome, ConversationState, FunctionTool, Tool,
    builtin_function_tools,
};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Error type for a model call.
#[derive(Error, Debug, Clone)]
pub enum CompletionError {
    #[error("Operation cancelled")]
    Cancelled,

    #[error("No response from model backend")]
    EmptyResponse,

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

impl CompletionError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CompletionError::Cancelled)
    }
}

/// Use case for asking the model what to do next.
pub struct CompletionClient<L: CompletionBackend + 'static> {
    backend: Arc<L>,
    show_origins: bool,
    cancellation_token: Option<CancellationToken>,
}

impl<L: CompletionBackend + 'static> Clone for CompletionClient<L> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            show_origins: self.show_origins,
            cancellation_token: self.cancellation_token.clone(),
        }
    }
}

impl<L: CompletionBackend + 'static> CompletionClient<L> {
    /// `show_origins` labels each tool with its origin in the instructions.
    pub fn new(backend: Arc<L>, show_origins: bool) -> Self {
        Self {
            backend,
            show_origins,
            cancellation_token: None,
        }
    }

    /// Set a cancellation token that aborts an outstanding request
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Build the request for this turn.
    ///
    /// Discovered tools come first, then the built-in control tools.
    pub fn build_request(&self, tools: &[Tool], state: &ConversationState) -> CompletionRequest {
        let mut function_tools: Vec<FunctionTool> = tools.iter().map(Tool::to_function_tool).collect();
        function_tools.extend(builtin_function_tools());

        CompletionRequest {
            instructions: AgentPromptTemplate::instructions(tools, self.show_origins),
            tools: function_tools,
            input: state.pending_input.clone(),
            continuation: state.continuation.clone(),
        }
    }

    /// Ask the model for the next step.
    ///
    /// Returns the interpreted outcome and the state to use afterwards: the
    /// response's continuation handle with nothing pending yet.
    pub async fn complete(
        &self,
        tools: &[Tool],
        state: &ConversationState,
    ) -> Result<(CompletionOutcome, ConversationState), CompletionError> {
        let request = self.build_request(tools, state);
        debug!(
            "Requesting completion: {} tool(s), {} input item(s), continuation={:?}",
            request.tools.len(),
            request.input.len(),
            request.continuation.as_ref().map(|c| c.as_str())
        );

        let response = cancellable(&self.cancellation_token, self.backend.complete(request))
            .await
            .map_err(|_| CompletionError::Cancelled)??;

        if response.output.is_empty() {
            return Err(CompletionError::EmptyResponse);
        }

        let outcome = CompletionOutcome::from_output(&response.output);
        Ok((outcome, ConversationState::continued(response.id)))
    }
}
