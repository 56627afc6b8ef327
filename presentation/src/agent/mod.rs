//! Agent presentation components
//!
//! Console adapters for the agent's output and interaction ports:
//! - Event reporting in the sidebar's vocabulary
//! - Approval prompt and user replies read from stdin

pub mod event_reporter;
pub mod interaction;

pub use event_reporter::ConsoleEventReporter;
pub use interaction::{ApprovalCommand, InteractiveApproval, InteractiveUserReply};
