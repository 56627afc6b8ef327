//! Execution Router
//!
//! Dispatches a tool call to the origin that exposes it and normalises the
//! bridge's reply into an [`ExecutionOutcome`]. Nothing escapes as an error:
//! policy refusals, transport failures and tool failures all come back as
//! [`ExecutionOutcome::Failure`] so the model can react to them.

use crate::ports::page_bridge::{BridgeReply, PageBridgePort};
use pagepilot_domain::{ExecutionOutcome, OriginKey, Tool};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Failure text when an embedded origin is targeted while the policy forbids it.
pub const EMBEDDED_ORIGIN_DISABLED: &str =
    "Embedded-origin tool execution is disabled (allow_embedded_origins is off).";

/// Failure text when a bridge reports failure without saying why.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Use case for executing one tool call on the page.
pub struct ExecutionRouter<B: PageBridgePort + 'static> {
    bridge: Arc<B>,
    allow_embedded_origins: bool,
}

impl<B: PageBridgePort + 'static> Clone for ExecutionRouter<B> {
    fn clone(&self) -> Self {
        Self {
            bridge: self.bridge.clone(),
            allow_embedded_origins: self.allow_embedded_origins,
        }
    }
}

impl<B: PageBridgePort + 'static> ExecutionRouter<B> {
    pub fn new(bridge: Arc<B>, allow_embedded_origins: bool) -> Self {
        Self {
            bridge,
            allow_embedded_origins,
        }
    }

    /// Execute `name` in `origin` with the model's raw arguments.
    ///
    /// The policy check runs before anything is sent, so a refused call never
    /// reaches the bridge.
    pub async fn execute(&self, name: &str, raw_arguments: &str, origin: OriginKey) -> ExecutionOutcome {
        if !origin.is_top_level() && !self.allow_embedded_origins {
            warn!("Refusing {} in {}: embedded origins disabled", name, origin);
            return ExecutionOutcome::failure(EMBEDDED_ORIGIN_DISABLED);
        }

        debug!("Executing {} in {}", name, origin);
        match self.bridge.execute_tool(origin, name, raw_arguments).await {
            Ok(reply) => normalize_reply(reply),
            Err(e) => {
                warn!("Tool {} failed in {}: {}", name, origin, e);
                ExecutionOutcome::failure(e.to_string())
            }
        }
    }

    /// Execute a discovered tool in the origin it came from.
    pub async fn execute_tool(&self, tool: &Tool, raw_arguments: &str) -> ExecutionOutcome {
        self.execute(&tool.name, raw_arguments, tool.origin).await
    }
}

fn normalize_reply(reply: BridgeReply) -> ExecutionOutcome {
    if !reply.success {
        let error = reply
            .error
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
        return ExecutionOutcome::failure(error);
    }

    let output = match reply.result {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    };
    ExecutionOutcome::success(output)
}
