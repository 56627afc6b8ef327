//! Completion backend port
//!
//! Defines the interface to the model. The wire format (HTTP API, auth,
//! streaming) belongs to the adapter; the agent only sees one request in and
//! one response out per turn.

use async_trait::async_trait;
use pagepilot_domain::{ContinuationHandle, FunctionTool, InputItem, OutputItem};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while talking to the model backend
#[derive(Error, Debug, Clone)]
pub enum BackendError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Backend not configured: {0}")]
    NotConfigured(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,
}

/// One model call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Instructions regenerated for this turn
    pub instructions: String,
    /// Discovered tools followed by the built-in control tools
    pub tools: Vec<FunctionTool>,
    /// Input items added since the previous call
    pub input: Vec<InputItem>,
    /// Handle of the previous response, chaining this call onto it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation: Option<ContinuationHandle>,
}

/// The backend's answer to one [`CompletionRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Handle to reference from the next request
    pub id: ContinuationHandle,
    pub output: Vec<OutputItem>,
}

impl CompletionResponse {
    pub fn new(id: impl Into<String>, output: Vec<OutputItem>) -> Self {
        Self {
            id: ContinuationHandle::new(id),
            output,
        }
    }
}

/// Port for the model backend.
///
/// Dropping the returned future must abort the request; the agent does this
/// when a run is cancelled mid-flight.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, BackendError>;
}
