//! Run Agent use case
//!
//! Drives a page toward a goal, one model turn per iteration:
//!
//! ```text
//! ┌──────────────▶ Discovering ── no tools ──▶ Completed
//! │                    │
//! │                Requesting ── backend error ──▶ Error
//! │          ┌─────────┼──────────┐
//! │        NoOp    FinalText   DispatchingCalls ── complete ──▶ Completed
//! │          │         │          │  (approval → execute → settle)*
//! │          └─────────┴────┬─────┘
//! └──────────────────── Settling
//!
//! cap reached ──▶ IterationLimitReached     cancellation ──▶ Aborted
//! ```
//!
//! Every transition is reported as an [`AgentEvent`]. Cancellation is checked
//! on entering each phase and raced against every suspension point:
//! discovery, the completion request, approval, user replies and the settle
//! delay.

mod dispatch;
mod types;

pub use types::{RunAgentError, RunAgentOutput};

use types::DispatchOutcome;

use crate::config::{AgentConfig, TextReplyPolicy};
use crate::ports::completion_backend::CompletionBackend;
use crate::ports::event_sink::AgentEventSink;
use crate::ports::interaction::{ApprovalPort, AutoApprove, EmptyUserReply, UserReplyPort};
use crate::ports::page_bridge::PageBridgePort;
use crate::use_cases::discover_tools::CapabilityDirectory;
use crate::use_cases::execute_tool::ExecutionRouter;
use crate::use_cases::request_completion::CompletionClient;
use crate::use_cases::shared::{cancellable, check_cancelled};
use pagepilot_domain::core::string::truncate;
use pagepilot_domain::{AgentEvent, AgentPhase, AgentRun, CompletionOutcome, CompletionReason};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Name reported on `tool_result` events carrying the model's own text.
pub const ASSISTANT_RESULT_NAME: &str = "assistant";

/// Use case for running the page-driving agent
pub struct RunAgentUseCase<B: PageBridgePort + 'static, L: CompletionBackend + 'static> {
    pub(super) directory: CapabilityDirectory<B>,
    pub(super) router: ExecutionRouter<B>,
    pub(super) client: CompletionClient<L>,
    pub(super) config: AgentConfig,
    pub(super) approval: Arc<dyn ApprovalPort>,
    pub(super) user_reply: Arc<dyn UserReplyPort>,
    pub(super) cancellation_token: Option<CancellationToken>,
}

impl<B, L> Clone for RunAgentUseCase<B, L>
where
    B: PageBridgePort + 'static,
    L: CompletionBackend + 'static,
{
    fn clone(&self) -> Self {
        Self {
            directory: self.directory.clone(),
            router: self.router.clone(),
            client: self.client.clone(),
            config: self.config.clone(),
            approval: self.approval.clone(),
            user_reply: self.user_reply.clone(),
            cancellation_token: self.cancellation_token.clone(),
        }
    }
}

impl<B, L> RunAgentUseCase<B, L>
where
    B: PageBridgePort + 'static,
    L: CompletionBackend + 'static,
{
    pub fn new(bridge: Arc<B>, backend: Arc<L>, config: AgentConfig) -> Self {
        let embedded = config.allow_embedded_origins;
        Self {
            directory: CapabilityDirectory::new(bridge.clone(), embedded),
            router: ExecutionRouter::new(bridge, embedded),
            client: CompletionClient::new(backend, embedded),
            config,
            approval: Arc::new(AutoApprove),
            user_reply: Arc::new(EmptyUserReply),
            cancellation_token: None,
        }
    }

    /// Set the approval gate consulted when `auto_approve` is off
    pub fn with_approval(mut self, approval: Arc<dyn ApprovalPort>) -> Self {
        self.approval = approval;
        self
    }

    /// Set the collaborator that answers `ask_user`
    pub fn with_user_reply(mut self, user_reply: Arc<dyn UserReplyPort>) -> Self {
        self.user_reply = user_reply;
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.client = self.client.with_cancellation(token.clone());
        self.cancellation_token = Some(token);
        self
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Run the agent until it completes, aborts or fails.
    ///
    /// Exactly one terminal event (`completed`, `aborted` or `error`) is
    /// emitted, and it is always the last one.
    pub async fn execute(
        &self,
        goal: &str,
        events: &dyn AgentEventSink,
    ) -> Result<RunAgentOutput, RunAgentError> {
        info!("Starting agent run: {}", truncate(goal, 80));
        let mut run = AgentRun::new(goal, self.config.max_iterations);

        let result = self.run_loop(&mut run, events).await;
        match &result {
            Ok(output) => info!(
                "Agent run completed after {} iteration(s): {}",
                output.iterations, output.reason
            ),
            Err(e) if e.is_cancelled() => info!("Agent run aborted at iteration {}", run.reported_iteration()),
            Err(e) => warn!("Agent run failed at iteration {}: {}", run.reported_iteration(), e),
        }
        result
    }

    async fn run_loop(
        &self,
        run: &mut AgentRun,
        events: &dyn AgentEventSink,
    ) -> Result<RunAgentOutput, RunAgentError> {
        while run.next_iteration() {
            let iteration = run.iteration;

            // Discovering
            self.enter(run, AgentPhase::Discovering, events)?;
            let tools = match cancellable(&self.cancellation_token, self.directory.discover()).await {
                Ok(tools) => tools,
                Err(_) => return Err(self.abort(run, events)),
            };
            events.emit(&AgentEvent::ToolsDiscovered {
                iteration,
                tools: tools.clone(),
            });
            if tools.is_empty() {
                let reason = CompletionReason::NoToolsAvailable;
                return Ok(self.finish(run, events, reason, reason.default_message()));
            }
            run.replace_tools(tools);

            // Requesting
            self.enter(run, AgentPhase::Requesting, events)?;
            events.emit(&AgentEvent::LlmRequest {
                iteration,
                message_count: run.conversation.pending_input.len(),
            });
            let (outcome, next_state) = match self.client.complete(&run.tools, &run.conversation).await {
                Ok(reply) => reply,
                Err(e) if e.is_cancelled() => return Err(self.abort(run, events)),
                Err(e) => {
                    self.fail(run, events, e.to_string());
                    return Err(e.into());
                }
            };
            run.conversation = next_state;

            match outcome {
                CompletionOutcome::Empty => {
                    run.set_phase(AgentPhase::NoOp);
                    debug!("Model returned neither text nor tool calls");
                    run.conversation.queue_continue_prompt();
                }
                CompletionOutcome::Text(text) => {
                    run.set_phase(AgentPhase::FinalText);
                    match self.config.text_reply {
                        TextReplyPolicy::Complete => {
                            return Ok(self.finish(run, events, CompletionReason::FinalText, text));
                        }
                        TextReplyPolicy::Continue => {
                            events.emit(&AgentEvent::ToolResult {
                                iteration,
                                name: ASSISTANT_RESULT_NAME.to_string(),
                                result: text,
                            });
                            run.conversation.queue_continue_prompt();
                        }
                    }
                }
                CompletionOutcome::ToolCalls(calls) => {
                    self.enter(run, AgentPhase::DispatchingCalls, events)?;
                    match self.dispatch(run, calls, events).await? {
                        DispatchOutcome::Completed(summary) => {
                            return Ok(self.finish(run, events, CompletionReason::GoalAchieved, summary));
                        }
                        DispatchOutcome::Results(results) => {
                            if self.config.single_turn {
                                let reason = CompletionReason::SingleTurn;
                                return Ok(self.finish(run, events, reason, reason.default_message()));
                            }
                            run.conversation.queue_tool_results(results);
                        }
                    }
                }
            }

            run.set_phase(AgentPhase::Settling);
        }

        let reason = CompletionReason::IterationLimit;
        Ok(self.finish(run, events, reason, reason.default_message()))
    }

    /// Enter `phase`, unless cancellation was requested.
    fn enter(
        &self,
        run: &mut AgentRun,
        phase: AgentPhase,
        events: &dyn AgentEventSink,
    ) -> Result<(), RunAgentError> {
        self.ensure_not_cancelled(run, events)?;
        debug!("Iteration {}: {}", run.reported_iteration(), phase);
        run.set_phase(phase);
        Ok(())
    }

    pub(super) fn ensure_not_cancelled(
        &self,
        run: &mut AgentRun,
        events: &dyn AgentEventSink,
    ) -> Result<(), RunAgentError> {
        check_cancelled(&self.cancellation_token).map_err(|_| self.abort(run, events))
    }

    /// Record the abort and return the matching error.
    pub(super) fn abort(&self, run: &mut AgentRun, events: &dyn AgentEventSink) -> RunAgentError {
        run.set_phase(AgentPhase::Aborted);
        events.emit(&AgentEvent::Aborted {
            iteration: run.reported_iteration(),
        });
        RunAgentError::Cancelled
    }

    pub(super) fn fail(&self, run: &mut AgentRun, events: &dyn AgentEventSink, error: String) {
        run.set_phase(AgentPhase::Error);
        events.emit(&AgentEvent::Error {
            iteration: run.reported_iteration(),
            error,
        });
    }

    fn finish(
        &self,
        run: &mut AgentRun,
        events: &dyn AgentEventSink,
        reason: CompletionReason,
        summary: impl Into<String>,
    ) -> RunAgentOutput {
        let summary = summary.into();
        run.set_phase(match reason {
            CompletionReason::IterationLimit => AgentPhase::IterationLimitReached,
            _ => AgentPhase::Completed,
        });
        events.emit(&AgentEvent::completed(run.reported_iteration(), reason, summary.clone()));
        RunAgentOutput {
            reason,
            summary,
            iterations: run.iteration,
            conversation: run.conversation.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::completion_backend::{BackendError, CompletionResponse};
    use crate::ports::event_sink::RecordingEventSink;
    use crate::ports::interaction::InteractionError;
    use crate::ports::page_bridge::{BridgeReply, FrameInfo};
    use crate::use_cases::test_support::{
        ScriptedApproval, ScriptedBackend, ScriptedBridge, ScriptedUserReply, call, respond,
    };
    use pagepilot_domain::{
        ContinuationHandle, InputItem, OriginKey, OutputItem, SKIPPED_BY_USER, ToolDescriptor,
    };
    use serde_json::json;
    use std::time::Duration;

    fn config() -> AgentConfig {
        AgentConfig::default().with_settle_delay(Duration::ZERO)
    }

    fn shop_bridge() -> ScriptedBridge {
        ScriptedBridge::new()
            .with_tools(
                OriginKey::TOP_LEVEL,
                vec![
                    ToolDescriptor::new("add-to-cart", "Add an item to the cart"),
                    ToolDescriptor::new("checkout", "Place the order"),
                ],
            )
            .with_reply("add-to-cart", BridgeReply::ok("added"))
            .with_reply("checkout", BridgeReply::ok(json!({"order": 17})))
    }

    fn use_case(
        bridge: ScriptedBridge,
        responses: Vec<Result<CompletionResponse, BackendError>>,
        config: AgentConfig,
    ) -> (
        RunAgentUseCase<ScriptedBridge, ScriptedBackend>,
        Arc<ScriptedBridge>,
        Arc<ScriptedBackend>,
    ) {
        let bridge = Arc::new(bridge);
        let backend = Arc::new(ScriptedBackend::new(responses));
        let use_case = RunAgentUseCase::new(bridge.clone(), backend.clone(), config);
        (use_case, bridge, backend)
    }

    fn completed_kind(events: &[AgentEvent]) -> Option<CompletionReason> {
        match events.last() {
            Some(AgentEvent::Completed { kind, .. }) => Some(*kind),
            _ => None,
        }
    }

    // ==================== Scenarios ====================

    #[tokio::test]
    async fn test_no_tools_completes_without_requesting() {
        let (use_case, _, backend) = use_case(ScriptedBridge::new(), vec![], config());
        let sink = RecordingEventSink::new();

        let output = use_case.execute("buy socks", &sink).await.unwrap();

        assert_eq!(output.reason, CompletionReason::NoToolsAvailable);
        assert_eq!(sink.event_types(), vec!["tools_discovered", "completed"]);
        assert_eq!(
            sink.events()[0],
            AgentEvent::ToolsDiscovered {
                iteration: 1,
                tools: vec![]
            }
        );
        assert_eq!(
            sink.events()[1],
            AgentEvent::completed(1, CompletionReason::NoToolsAvailable, "No tools available, end state reached.")
        );
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_tool_call_then_final_text() {
        let responses = vec![
            Ok(respond("resp_1", vec![call("call_1", "add-to-cart", r#"{"sku":"A1"}"#)])),
            Ok(respond("resp_2", vec![OutputItem::message("Order placed")])),
        ];
        let config = config().with_text_reply(TextReplyPolicy::Complete);
        let (use_case, bridge, backend) = use_case(shop_bridge(), responses, config);
        let sink = RecordingEventSink::new();

        let output = use_case.execute("buy socks", &sink).await.unwrap();

        assert_eq!(
            sink.event_types(),
            vec![
                "tools_discovered",
                "llm_request",
                "tool_call_pending",
                "tool_executing",
                "tool_result",
                "tools_discovered",
                "llm_request",
                "completed",
            ]
        );
        assert_eq!(output.reason, CompletionReason::FinalText);
        assert_eq!(output.summary, "Order placed");
        assert_eq!(output.iterations, 2);
        assert_eq!(bridge.executions().len(), 1);

        let requests = backend.requests();
        assert_eq!(requests[1].continuation, Some(ContinuationHandle::new("resp_1")));
        assert_eq!(
            requests[1].input,
            vec![InputItem::FunctionCallOutput {
                call_id: "call_1".into(),
                output: "added".into(),
            }]
        );
    }

    #[tokio::test]
    async fn test_text_reply_continues_by_default() {
        let responses = vec![
            Ok(respond("resp_1", vec![OutputItem::message("Let me look at the cart first.")])),
            Ok(respond("resp_2", vec![call("call_1", "complete", r#"{"summary":"Done"}"#)])),
        ];
        let (use_case, _, backend) = use_case(shop_bridge(), responses, config());
        let sink = RecordingEventSink::new();

        let output = use_case.execute("buy socks", &sink).await.unwrap();

        assert_eq!(output.reason, CompletionReason::GoalAchieved);
        assert_eq!(output.summary, "Done");
        assert!(sink.events().contains(&AgentEvent::ToolResult {
            iteration: 1,
            name: "assistant".into(),
            result: "Let me look at the cart first.".into(),
        }));
        assert_eq!(backend.requests()[1].input, vec![InputItem::user("Continue.")]);
    }

    #[tokio::test]
    async fn test_ask_user_folds_reply_into_next_input() {
        let responses = vec![
            Ok(respond("resp_1", vec![call("call_q", "ask_user", r#"{"question":"What size?"}"#)])),
            Ok(respond("resp_2", vec![call("call_c", "complete", "{}")])),
        ];
        let (use_case, bridge, backend) = use_case(shop_bridge(), responses, config());
        let replies = Arc::new(ScriptedUserReply::new(vec![Ok("large".into())]));
        let use_case = use_case.with_user_reply(replies.clone());
        let sink = RecordingEventSink::new();

        let output = use_case.execute("buy socks", &sink).await.unwrap();

        let events = sink.events();
        let ask = events
            .iter()
            .position(|e| matches!(e, AgentEvent::AskUser { question, .. } if question == "What size?"))
            .unwrap();
        assert_eq!(
            events[ask + 1],
            AgentEvent::ToolResult {
                iteration: 1,
                name: "ask_user".into(),
                result: "large".into(),
            }
        );
        assert_eq!(replies.questions(), vec!["What size?"]);
        assert_eq!(
            backend.requests()[1].input,
            vec![InputItem::FunctionCallOutput {
                call_id: "call_q".into(),
                output: "large".into(),
            }]
        );
        assert_eq!(output.summary, "Goal achieved.");
        assert!(bridge.executions().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_during_completion_request() {
        let token = CancellationToken::new();
        let bridge = Arc::new(shop_bridge());
        let backend = Arc::new(ScriptedBackend::cancel_and_hang(token.clone()));
        let use_case = RunAgentUseCase::new(bridge.clone(), backend, config()).with_cancellation(token);
        let sink = RecordingEventSink::new();

        let err = use_case.execute("buy socks", &sink).await.unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(sink.event_types(), vec!["tools_discovered", "llm_request", "aborted"]);
        assert!(bridge.executions().is_empty());
    }

    #[tokio::test]
    async fn test_tool_failure_is_reported_and_run_continues() {
        let bridge = shop_bridge().with_reply("add-to-cart", BridgeReply::err("out of stock"));
        let responses = vec![
            Ok(respond(
                "resp_1",
                vec![
                    call("call_1", "add-to-cart", r#"{"sku":"A1"}"#),
                    call("call_2", "checkout", "{}"),
                ],
            )),
            Ok(respond("resp_2", vec![call("call_3", "complete", r#"{"summary":"Ordered"}"#)])),
        ];
        let (use_case, bridge, backend) = use_case(bridge, responses, config());
        let sink = RecordingEventSink::new();

        let output = use_case.execute("buy socks", &sink).await.unwrap();

        assert!(sink.events().contains(&AgentEvent::ToolResult {
            iteration: 1,
            name: "add-to-cart".into(),
            result: "Error: out of stock".into(),
        }));
        assert_eq!(bridge.executions().len(), 2);
        assert_eq!(
            backend.requests()[1].input,
            vec![
                InputItem::FunctionCallOutput {
                    call_id: "call_1".into(),
                    output: "Error: out of stock".into(),
                },
                InputItem::FunctionCallOutput {
                    call_id: "call_2".into(),
                    output: r#"{"order":17}"#.into(),
                },
            ]
        );
        assert_eq!(output.reason, CompletionReason::GoalAchieved);
    }

    // ==================== Loop properties ====================

    #[tokio::test]
    async fn test_iteration_limit_is_a_completion() {
        let responses = (1..=5)
            .map(|i| Ok(respond(&format!("resp_{}", i), vec![call(&format!("call_{}", i), "add-to-cart", "{}")])))
            .collect();
        let (use_case, _, backend) = use_case(shop_bridge(), responses, config().with_max_iterations(3));
        let sink = RecordingEventSink::new();

        let output = use_case.execute("buy socks", &sink).await.unwrap();

        assert_eq!(backend.requests().len(), 3);
        assert_eq!(output.reason, CompletionReason::IterationLimit);
        assert_eq!(output.iterations, 3);
        let events = sink.events();
        let completed: Vec<_> = events.iter().filter(|e| e.is_terminal()).collect();
        assert_eq!(completed.len(), 1);
        assert_eq!(
            events.last(),
            Some(&AgentEvent::completed(3, CompletionReason::IterationLimit, "Max iterations reached."))
        );
    }

    #[tokio::test]
    async fn test_complete_drops_remaining_calls() {
        let responses = vec![Ok(respond(
            "resp_1",
            vec![
                call("call_1", "add-to-cart", "{}"),
                call("call_2", "complete", r#"{"summary":"Cart filled"}"#),
                call("call_3", "checkout", "{}"),
            ],
        ))];
        let (use_case, bridge, _) = use_case(shop_bridge(), responses, config());
        let sink = RecordingEventSink::new();

        let output = use_case.execute("fill the cart", &sink).await.unwrap();

        let executed: Vec<_> = bridge.executions().into_iter().map(|(_, name, _)| name).collect();
        assert_eq!(executed, vec!["add-to-cart"]);
        assert_eq!(output.summary, "Cart filled");
        assert_eq!(completed_kind(&sink.events()), Some(CompletionReason::GoalAchieved));
    }

    #[tokio::test]
    async fn test_skipped_call_never_reaches_router() {
        let responses = vec![
            Ok(respond("resp_1", vec![call("call_1", "checkout", "{}")])),
            Ok(respond("resp_2", vec![call("call_2", "complete", "{}")])),
        ];
        let (use_case, bridge, backend) = use_case(shop_bridge(), responses, config().with_auto_approve(false));
        let approval = Arc::new(ScriptedApproval::new(vec![Ok(false)]));
        let use_case = use_case.with_approval(approval.clone());
        let sink = RecordingEventSink::new();

        use_case.execute("buy socks", &sink).await.unwrap();

        assert!(bridge.executions().is_empty());
        assert_eq!(approval.asked(), vec![("checkout".to_string(), json!({}))]);
        assert_eq!(
            &sink.event_types()[..5],
            &["tools_discovered", "llm_request", "tool_call_pending", "waiting_approval", "skipped"]
        );
        assert_eq!(
            backend.requests()[1].input,
            vec![InputItem::FunctionCallOutput {
                call_id: "call_1".into(),
                output: SKIPPED_BY_USER.into(),
            }]
        );
    }

    #[tokio::test]
    async fn test_approved_call_executes() {
        let responses = vec![Ok(respond("resp_1", vec![call("call_1", "add-to-cart", "{}")]))];
        let (use_case, bridge, _) = use_case(
            shop_bridge(),
            responses,
            config().with_auto_approve(false).with_single_turn(true),
        );
        let use_case = use_case.with_approval(Arc::new(ScriptedApproval::new(vec![Ok(true)])));
        let sink = RecordingEventSink::new();

        let output = use_case.execute("buy socks", &sink).await.unwrap();

        assert_eq!(bridge.executions().len(), 1);
        assert_eq!(output.reason, CompletionReason::SingleTurn);
        assert_eq!(
            sink.event_types(),
            vec![
                "tools_discovered",
                "llm_request",
                "tool_call_pending",
                "waiting_approval",
                "tool_executing",
                "tool_result",
                "completed",
            ]
        );
    }

    #[tokio::test]
    async fn test_approval_abort_cancels_run() {
        let responses = vec![Ok(respond("resp_1", vec![call("call_1", "checkout", "{}")]))];
        let (use_case, bridge, _) = use_case(shop_bridge(), responses, config().with_auto_approve(false));
        let use_case =
            use_case.with_approval(Arc::new(ScriptedApproval::new(vec![Err(InteractionError::Cancelled)])));
        let sink = RecordingEventSink::new();

        let err = use_case.execute("buy socks", &sink).await.unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(sink.events().last(), Some(&AgentEvent::Aborted { iteration: 1 }));
        assert!(bridge.executions().is_empty());
    }

    #[tokio::test]
    async fn test_unresolved_approval_is_preempted_by_cancellation() {
        let token = CancellationToken::new();
        let responses = vec![Ok(respond("resp_1", vec![call("call_1", "checkout", "{}")]))];
        let (use_case, bridge, _) = use_case(shop_bridge(), responses, config().with_auto_approve(false));
        let use_case = use_case
            .with_approval(Arc::new(ScriptedApproval::cancel_and_hang(token.clone())))
            .with_cancellation(token);
        let sink = RecordingEventSink::new();

        let err = use_case.execute("buy socks", &sink).await.unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(sink.event_types().last(), Some(&"aborted"));
        assert!(bridge.executions().is_empty());
    }

    #[tokio::test]
    async fn test_unanswered_question_is_preempted_by_cancellation() {
        let token = CancellationToken::new();
        let responses = vec![Ok(respond(
            "resp_1",
            vec![call("call_q", "ask_user", r#"{"question":"What size?"}"#)],
        ))];
        let (use_case, _, backend) = use_case(shop_bridge(), responses, config());
        let replies = Arc::new(ScriptedUserReply::cancel_and_hang(token.clone()));
        let use_case = use_case
            .with_user_reply(replies.clone())
            .with_cancellation(token);
        let sink = RecordingEventSink::new();

        let err = use_case.execute("buy socks", &sink).await.unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(
            sink.event_types(),
            vec!["tools_discovered", "llm_request", "ask_user", "aborted"]
        );
        assert_eq!(replies.questions(), vec!["What size?"]);
        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_user_reply_failure_is_an_error() {
        let responses = vec![Ok(respond("resp_1", vec![call("call_q", "ask_user", "{}")]))];
        let (use_case, _, _) = use_case(shop_bridge(), responses, config());
        let use_case = use_case.with_user_reply(Arc::new(ScriptedUserReply::new(vec![Err(
            InteractionError::Unavailable("no sidebar".into()),
        )])));
        let sink = RecordingEventSink::new();

        let err = use_case.execute("buy socks", &sink).await.unwrap_err();

        assert!(matches!(err, RunAgentError::Interaction(_)));
        assert!(matches!(
            sink.events().last(),
            Some(AgentEvent::Error { error, .. }) if error == "Interaction unavailable: no sidebar"
        ));
    }

    #[tokio::test]
    async fn test_empty_turn_is_a_noop() {
        let responses = vec![
            Ok(respond("resp_1", vec![OutputItem::Other { kind: "reasoning".into() }])),
            Ok(respond("resp_2", vec![call("call_1", "complete", "{}")])),
        ];
        let (use_case, _, backend) = use_case(shop_bridge(), responses, config());
        let sink = RecordingEventSink::new();

        let output = use_case.execute("buy socks", &sink).await.unwrap();

        assert_eq!(
            sink.event_types(),
            vec!["tools_discovered", "llm_request", "tools_discovered", "llm_request", "completed"]
        );
        assert_eq!(output.iterations, 2);
        let second = &backend.requests()[1];
        assert_eq!(second.continuation, Some(ContinuationHandle::new("resp_1")));
        assert_eq!(second.input, vec![InputItem::user("Continue.")]);
    }

    #[tokio::test]
    async fn test_backend_error_ends_run() {
        let responses = vec![Err(BackendError::ConnectionError("refused".into()))];
        let (use_case, _, _) = use_case(shop_bridge(), responses, config());
        let sink = RecordingEventSink::new();

        let err = use_case.execute("buy socks", &sink).await.unwrap_err();

        assert!(matches!(err, RunAgentError::Completion(_)));
        assert_eq!(sink.event_types(), vec!["tools_discovered", "llm_request", "error"]);
    }

    #[tokio::test]
    async fn test_response_without_output_ends_run() {
        let (use_case, _, _) = use_case(shop_bridge(), vec![Ok(respond("resp_1", vec![]))], config());
        let sink = RecordingEventSink::new();

        use_case.execute("buy socks", &sink).await.unwrap_err();

        assert!(matches!(
            sink.events().last(),
            Some(AgentEvent::Error { error, .. }) if error == "No response from model backend"
        ));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let (use_case, _, backend) = use_case(shop_bridge(), vec![], config());
        let use_case = use_case.with_cancellation(token);
        let sink = RecordingEventSink::new();

        let err = use_case.execute("buy socks", &sink).await.unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(sink.events(), vec![AgentEvent::Aborted { iteration: 1 }]);
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_during_settle_delay() {
        let token = CancellationToken::new();
        let responses = vec![Ok(respond("resp_1", vec![call("call_1", "add-to-cart", "{}")]))];
        let config = config().with_settle_delay(Duration::from_secs(3600));
        let (use_case, _, backend) = use_case(shop_bridge(), responses, config);
        let use_case = use_case.with_cancellation(token.clone());
        let sink = RecordingEventSink::new();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });
        let err = use_case.execute("buy socks", &sink).await.unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(sink.event_types().last(), Some(&"aborted"));
        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_page_tools_change_between_iterations() {
        let responses = vec![
            Ok(respond("resp_1", vec![call("call_1", "add-to-cart", "{}")])),
            Ok(respond("resp_2", vec![call("call_2", "complete", "{}")])),
        ];
        // Adding to the cart swaps the page to a checkout-only tool set
        let bridge = shop_bridge().with_tools_after(
            "add-to-cart",
            OriginKey::TOP_LEVEL,
            vec![ToolDescriptor::new("checkout", "Place the order")],
        );
        let (use_case, _, backend) = use_case(bridge, responses, config());
        let sink = RecordingEventSink::new();

        use_case.execute("buy socks", &sink).await.unwrap();

        let names = |i: usize| -> Vec<String> {
            backend.requests()[i].tools.iter().map(|t| t.name.clone()).collect()
        };
        assert_eq!(names(0), vec!["add-to-cart", "checkout", "complete", "ask_user"]);
        assert_eq!(names(1), vec!["checkout", "complete", "ask_user"]);
        assert!(!backend.requests()[1].instructions.contains("add-to-cart"));
    }

    #[tokio::test]
    async fn test_embedded_tool_routed_to_its_origin() {
        let bridge = ScriptedBridge::new()
            .with_frame(FrameInfo::top_level("https://shop.example/"))
            .with_frame(FrameInfo::embedded(OriginKey::new(4), OriginKey::TOP_LEVEL, "https://pay.example/"))
            .with_tools(OriginKey::TOP_LEVEL, vec![ToolDescriptor::new("add-to-cart", "Add")])
            .with_tools(OriginKey::new(4), vec![ToolDescriptor::new("pay", "Pay")])
            .with_reply("pay", BridgeReply::ok("paid"));
        let responses = vec![
            Ok(respond("resp_1", vec![call("call_1", "pay", "{}"), call("call_2", "ghost", "{}")])),
            Ok(respond("resp_2", vec![call("call_3", "complete", "{}")])),
        ];
        let (use_case, bridge, backend) =
            use_case(bridge, responses, config().with_allow_embedded_origins(true));
        let sink = RecordingEventSink::new();

        use_case.execute("pay", &sink).await.unwrap();

        let routed: Vec<_> = bridge.executions().into_iter().map(|(o, n, _)| (o, n)).collect();
        assert_eq!(
            routed,
            vec![(OriginKey::new(4), "pay".to_string()), (OriginKey::TOP_LEVEL, "ghost".to_string())]
        );
        assert!(backend.requests()[0].instructions.contains("- pay [iframe: https://pay.example/]: Pay"));
        assert_eq!(
            backend.requests()[1].input[1],
            InputItem::FunctionCallOutput {
                call_id: "call_2".into(),
                output: "Error: Tool not found: ghost".into(),
            }
        );
    }
}
