//! Conversation domain
//!
//! The exchange between the agent and the model: an opaque continuation
//! handle plus the input items to submit next, and the interpretation of
//! what the model sent back.

pub mod outcome;
pub mod state;

pub use outcome::{CompletionOutcome, OutputItem};
pub use state::{CONTINUE_PROMPT, ContinuationHandle, ConversationState, InputItem};
