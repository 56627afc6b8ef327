//! Built-in control tools
//!
//! `complete` and `ask_user` are not page capabilities. They are appended to
//! every tool surface offered to the model and intercepted by the agent loop
//! before anything reaches an origin.

use super::entities::FunctionTool;
use serde_json::{Value, json};

pub const COMPLETE_TOOL_NAME: &str = "complete";
pub const ASK_USER_TOOL_NAME: &str = "ask_user";

/// Summary used when the model calls `complete` without one.
pub const DEFAULT_COMPLETION_SUMMARY: &str = "Goal achieved.";
/// Question used when the model calls `ask_user` without one.
pub const DEFAULT_USER_QUESTION: &str = "Please provide more information.";

/// A control tool handled by the orchestrator itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTool {
    Complete,
    AskUser,
}

impl BuiltinTool {
    pub const ALL: [BuiltinTool; 2] = [BuiltinTool::Complete, BuiltinTool::AskUser];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            COMPLETE_TOOL_NAME => Some(BuiltinTool::Complete),
            ASK_USER_TOOL_NAME => Some(BuiltinTool::AskUser),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinTool::Complete => COMPLETE_TOOL_NAME,
            BuiltinTool::AskUser => ASK_USER_TOOL_NAME,
        }
    }

    pub fn function_tool(&self) -> FunctionTool {
        match self {
            BuiltinTool::Complete => FunctionTool {
                name: COMPLETE_TOOL_NAME.to_string(),
                description: "Call this tool when the user's goal has been fully achieved. \
                              Provide a short summary of what was accomplished."
                    .to_string(),
                parameters: single_string_parameter(
                    "summary",
                    "A short summary of what was accomplished.",
                ),
            },
            BuiltinTool::AskUser => FunctionTool {
                name: ASK_USER_TOOL_NAME.to_string(),
                description: "Call this tool when you need additional information from the user \
                              that was not provided in the goal (e.g., name, phone number, email, \
                              preferences). Ask a clear, specific question."
                    .to_string(),
                parameters: single_string_parameter("question", "The question to ask the user."),
            },
        }
    }

    /// Pull this tool's single string argument out of parsed arguments,
    /// falling back to the documented default.
    pub fn argument(&self, args: &Value) -> String {
        let (key, default) = match self {
            BuiltinTool::Complete => ("summary", DEFAULT_COMPLETION_SUMMARY),
            BuiltinTool::AskUser => ("question", DEFAULT_USER_QUESTION),
        };
        args.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(default)
            .to_string()
    }
}

/// Function definitions for every built-in tool, in a stable order.
pub fn builtin_function_tools() -> Vec<FunctionTool> {
    BuiltinTool::ALL.iter().map(|b| b.function_tool()).collect()
}

fn single_string_parameter(name: &str, description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            name: { "type": "string", "description": description }
        },
        "required": [name]
    })
}
