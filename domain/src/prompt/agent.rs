//! Instructions for the page-driving agent

use crate::tool::entities::Tool;

/// Fixed part of the instructions sent on every turn.
pub const AGENT_SYSTEM_PROMPT: &str = r#"You are a browser automation agent. You interact with web pages by calling WebMCP tools exposed by the page.

RULES:
1. Call exactly ONE tool per turn. After each call, the available tools may change (the page updates its state). You will receive the updated tool list.
2. When the goal is fully achieved, call the "complete" tool with a short summary.
3. If you need information the goal does not contain, call the "ask_user" tool with a clear question.
4. Use the tool descriptions to understand what each tool does and what parameters it expects.
5. Always progress toward the user's goal. Do not repeat actions already completed."#;

/// Templates for generating agent instructions
pub struct AgentPromptTemplate;

impl AgentPromptTemplate {
    /// Instructions for one turn, regenerated from the current tool snapshot.
    ///
    /// With `show_origins` each entry is labelled with the document that
    /// exposes it, so the model can tell same-named tools apart.
    pub fn instructions(tools: &[Tool], show_origins: bool) -> String {
        let listing = tools
            .iter()
            .map(|t| {
                let label = if show_origins {
                    format!(" [{}]", t.origin_label())
                } else {
                    String::new()
                };
                format!(
                    "- {}{}: {}\n  inputSchema: {}",
                    t.name,
                    label,
                    t.description,
                    t.schema_text()
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "{}\n\nCURRENTLY AVAILABLE TOOLS:\n{}",
            AGENT_SYSTEM_PROMPT, listing
        )
    }
}
