//! Application layer for pagepilot
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{AgentConfig, TextReplyPolicy};
pub use ports::{
    completion_backend::{BackendError, CompletionBackend, CompletionRequest, CompletionResponse},
    event_sink::{
        AgentEventSink, ChannelEventSink, CompositeEventSink, NoEventSink, RecordingEventSink,
    },
    interaction::{ApprovalPort, AutoApprove, EmptyUserReply, InteractionError, UserReplyPort},
    page_bridge::{BridgeError, BridgeReply, FrameInfo, PageBridgePort, ToolListing},
};
pub use use_cases::discover_tools::CapabilityDirectory;
pub use use_cases::execute_tool::ExecutionRouter;
pub use use_cases::request_completion::{CompletionClient, CompletionError};
pub use use_cases::run_agent::{RunAgentError, RunAgentOutput, RunAgentUseCase};
