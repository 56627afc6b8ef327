//! Console rendering of agent events

use colored::Colorize;
use pagepilot_application::ports::event_sink::AgentEventSink;
use pagepilot_domain::AgentEvent;
use pagepilot_domain::core::string::{single_line, truncate};

/// Longest tool result echoed to the console.
const MAX_RESULT_LEN: usize = 200;

/// Prints one line per agent event, in the sidebar's vocabulary.
///
/// ```text
/// ── Step 1 ──
///   Tools: add-to-cart, checkout
///   Thinking... (1 messages in context)
///   → add-to-cart({"sku":"A1"})
///   Executing add-to-cart...
///   ← added
/// ✓ Order placed
/// ```
pub struct ConsoleEventReporter {
    show_tool_lists: bool,
}

impl ConsoleEventReporter {
    pub fn new() -> Self {
        Self {
            show_tool_lists: true,
        }
    }

    /// Omit the per-step tool list.
    pub fn quiet() -> Self {
        Self {
            show_tool_lists: false,
        }
    }

    /// Plain-text lines for an event, without colour.
    pub fn format(&self, event: &AgentEvent) -> Vec<String> {
        match event {
            AgentEvent::ToolsDiscovered { iteration, tools } => {
                let mut lines = vec![format!("── Step {} ──", iteration)];
                if self.show_tool_lists {
                    let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
                    let listed = if names.is_empty() {
                        "(none)".to_string()
                    } else {
                        names.join(", ")
                    };
                    lines.push(format!("  Tools: {}", listed));
                }
                lines
            }
            AgentEvent::LlmRequest { message_count, .. } => {
                vec![format!("  Thinking... ({} messages in context)", message_count)]
            }
            AgentEvent::ToolCallPending { name, args, .. } => {
                vec![format!("  → {}({})", name, args)]
            }
            AgentEvent::WaitingApproval { name, .. } => {
                vec![format!("  ⏸ Waiting for approval: {}", name)]
            }
            AgentEvent::ToolExecuting { name, .. } => vec![format!("  Executing {}...", name)],
            AgentEvent::ToolResult { result, .. } => {
                vec![format!("  ← {}", truncate(&single_line(result), MAX_RESULT_LEN))]
            }
            AgentEvent::AskUser { question, .. } => vec![format!("  ❓ {}", question)],
            AgentEvent::Completed { reason, .. } => vec![format!("✓ {}", reason)],
            AgentEvent::Skipped { name, .. } => vec![format!("  ⊘ Skipped {}", name)],
            AgentEvent::Aborted { iteration } => vec![format!("⏹ Aborted at step {}", iteration)],
            AgentEvent::Error { error, .. } => vec![format!("✗ {}", error)],
        }
    }
}

impl Default for ConsoleEventReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentEventSink for ConsoleEventReporter {
    fn emit(&self, event: &AgentEvent) {
        for line in self.format(event) {
            let styled = match event {
                AgentEvent::ToolsDiscovered { .. } if line.starts_with('─') => line.cyan().bold(),
                AgentEvent::ToolsDiscovered { .. } | AgentEvent::LlmRequest { .. } => line.dimmed(),
                AgentEvent::ToolCallPending { .. } => line.blue(),
                AgentEvent::WaitingApproval { .. }
                | AgentEvent::AskUser { .. }
                | AgentEvent::Skipped { .. } => line.yellow(),
                AgentEvent::ToolExecuting { .. } => line.dimmed(),
                AgentEvent::ToolResult { .. } => line.normal(),
                AgentEvent::Completed { .. } => line.green().bold(),
                AgentEvent::Aborted { .. } | AgentEvent::Error { .. } => line.red().bold(),
            };
            println!("{}", styled);
        }
    }
}
