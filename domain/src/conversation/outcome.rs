//! Model output items and their interpretation.
//!
//! A model call yields a list of output items. The agent loop only cares
//! about one of three shapes, captured by [`CompletionOutcome`]:
//!
//! | Output items                          | Outcome      |
//! |---------------------------------------|--------------|
//! | at least one function call            | `ToolCalls`  |
//! | no function call, non-blank text      | `Text`       |
//! | no function call, no text             | `Empty`      |

use crate::tool::invocation::ToolInvocationRequest;
use serde::{Deserialize, Serialize};

/// One item of a model response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    /// The model wants a tool called
    FunctionCall {
        call_id: String,
        name: String,
        arguments: String,
    },
    /// Natural-language output
    Message { text: String },
    /// Anything else the backend emits (reasoning traces, annotations...)
    Other { kind: String },
}

impl OutputItem {
    pub fn function_call(
        call_id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        OutputItem::FunctionCall {
            call_id: call_id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    pub fn message(text: impl Into<String>) -> Self {
        OutputItem::Message { text: text.into() }
    }
}

/// What one model call asked the orchestrator to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    ToolCalls(Vec<ToolInvocationRequest>),
    Text(String),
    Empty,
}

impl CompletionOutcome {
    /// Interpret a non-empty list of output items.
    ///
    /// Function calls win over text: a response that carries both is
    /// treated purely as a tool-call turn.
    pub fn from_output(items: &[OutputItem]) -> Self {
        let calls: Vec<_> = items
            .iter()
            .filter_map(|item| match item {
                OutputItem::FunctionCall {
                    call_id,
                    name,
                    arguments,
                } => Some(ToolInvocationRequest::new(
                    call_id.clone(),
                    name.clone(),
                    arguments.clone(),
                )),
                _ => None,
            })
            .collect();

        if !calls.is_empty() {
            return CompletionOutcome::ToolCalls(calls);
        }

        let text = items
            .iter()
            .filter_map(|item| match item {
                OutputItem::Message { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            CompletionOutcome::Empty
        } else {
            CompletionOutcome::Text(text)
        }
    }
}
