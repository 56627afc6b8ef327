//! Tool-call dispatch for one model turn.
//!
//! Calls run strictly in the order the model returned them. Built-in control
//! tools are intercepted here; everything else passes the approval gate (when
//! enabled) and goes to the execution router.

use super::RunAgentUseCase;
use super::types::{DispatchOutcome, RunAgentError};
use crate::ports::completion_backend::CompletionBackend;
use crate::ports::event_sink::AgentEventSink;
use crate::ports::interaction::InteractionError;
use crate::ports::page_bridge::PageBridgePort;
use crate::use_cases::shared::cancellable;
use pagepilot_domain::tool::builtin::ASK_USER_TOOL_NAME;
use pagepilot_domain::{
    AgentEvent, AgentRun, BuiltinTool, OriginKey, ToolInvocationRequest, ToolInvocationResult,
};
use serde_json::Value;
use std::future::Future;
use tracing::{debug, info};

impl<B, L> RunAgentUseCase<B, L>
where
    B: PageBridgePort + 'static,
    L: CompletionBackend + 'static,
{
    pub(super) async fn dispatch(
        &self,
        run: &mut AgentRun,
        calls: Vec<ToolInvocationRequest>,
        events: &dyn AgentEventSink,
    ) -> Result<DispatchOutcome, RunAgentError> {
        let total = calls.len();
        let mut results = Vec::with_capacity(total);

        for (index, call) in calls.into_iter().enumerate() {
            self.ensure_not_cancelled(run, events)?;
            let args = call.parsed_arguments();

            match BuiltinTool::from_name(&call.name) {
                Some(BuiltinTool::Complete) => {
                    let dropped = total - index - 1;
                    if dropped > 0 {
                        debug!("complete called; dropping {} remaining call(s)", dropped);
                    }
                    return Ok(DispatchOutcome::Completed(BuiltinTool::Complete.argument(&args)));
                }
                Some(BuiltinTool::AskUser) => {
                    let result = self.ask_user(run, call, &args, events).await?;
                    results.push(result);
                }
                None => {
                    let result = self.dispatch_page_tool(run, call, args, events).await?;
                    results.push(result);
                }
            }
        }

        Ok(DispatchOutcome::Results(results))
    }

    async fn ask_user(
        &self,
        run: &mut AgentRun,
        call: ToolInvocationRequest,
        args: &Value,
        events: &dyn AgentEventSink,
    ) -> Result<ToolInvocationResult, RunAgentError> {
        let question = BuiltinTool::AskUser.argument(args);
        events.emit(&AgentEvent::AskUser {
            iteration: run.iteration,
            question: question.clone(),
        });

        let reply = self
            .await_interaction(run, events, self.user_reply.ask(&question))
            .await?;

        events.emit(&AgentEvent::ToolResult {
            iteration: run.iteration,
            name: ASK_USER_TOOL_NAME.to_string(),
            result: reply.clone(),
        });
        Ok(ToolInvocationResult::new(call.call_id, reply))
    }

    async fn dispatch_page_tool(
        &self,
        run: &mut AgentRun,
        call: ToolInvocationRequest,
        args: Value,
        events: &dyn AgentEventSink,
    ) -> Result<ToolInvocationResult, RunAgentError> {
        let iteration = run.iteration;
        events.emit(&AgentEvent::ToolCallPending {
            iteration,
            name: call.name.clone(),
            args: args.clone(),
            tool_call_id: call.call_id.clone(),
        });

        if !self.config.auto_approve {
            events.emit(&AgentEvent::WaitingApproval {
                iteration,
                name: call.name.clone(),
                args: args.clone(),
            });
            let approved = self
                .await_interaction(run, events, self.approval.request_approval(&call.name, &args))
                .await?;
            if !approved {
                info!("Tool call {} skipped by user", call.name);
                events.emit(&AgentEvent::Skipped {
                    iteration,
                    name: call.name.clone(),
                });
                return Ok(ToolInvocationResult::skipped(call.call_id));
            }
        }

        self.ensure_not_cancelled(run, events)?;
        events.emit(&AgentEvent::ToolExecuting {
            iteration,
            name: call.name.clone(),
        });

        let origin = run
            .find_tool(&call.name)
            .map(|t| t.origin)
            .unwrap_or(OriginKey::TOP_LEVEL);
        let outcome = self.router.execute(&call.name, &call.raw_arguments, origin).await;
        let output_text = outcome.output_text();

        events.emit(&AgentEvent::ToolResult {
            iteration,
            name: call.name.clone(),
            result: output_text.clone(),
        });

        if outcome.is_success() && !self.config.settle_delay.is_zero() {
            let settle = tokio::time::sleep(self.config.settle_delay);
            if cancellable(&self.cancellation_token, settle).await.is_err() {
                return Err(self.abort(run, events));
            }
        }

        Ok(ToolInvocationResult::new(call.call_id, output_text))
    }

    /// Wait on an approval or user-reply collaborator, racing cancellation.
    ///
    /// A collaborator answering `Cancelled` aborts the run just like the
    /// token firing; any other collaborator failure ends the run in error.
    async fn await_interaction<T, F>(
        &self,
        run: &mut AgentRun,
        events: &dyn AgentEventSink,
        wait: F,
    ) -> Result<T, RunAgentError>
    where
        F: Future<Output = Result<T, InteractionError>>,
    {
        self.ensure_not_cancelled(run, events)?;
        match cancellable(&self.cancellation_token, wait).await {
            Ok(Ok(value)) => Ok(value),
            Err(_) | Ok(Err(InteractionError::Cancelled)) => Err(self.abort(run, events)),
            Ok(Err(e)) => {
                self.fail(run, events, e.to_string());
                Err(e.into())
            }
        }
    }
}
