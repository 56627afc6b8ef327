//! Logging infrastructure.
//!
//! - [`init_tracing`] installs the diagnostic `tracing` subscriber
//! - [`JsonlEventLog`] records agent events as JSONL through the
//!   [`AgentEventSink`](pagepilot_application::AgentEventSink) port

mod jsonl_event_log;
mod tracing_init;

pub use jsonl_event_log::{JsonlEventLog, event_record};
pub use tracing_init::{LOG_FILE_PREFIX, filter_for, init_tracing};
