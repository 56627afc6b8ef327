//! Interactive approval and user replies for console hosts.
//!
//! # User Interface
//!
//! ```text
//! Approve tool call?
//!   checkout({"express":true})
//!
//!   approve (a) | skip (s) | abort (q)
//! approve>
//! ```
//!
//! Both adapters read stdin on a blocking thread so the agent can still
//! pre-empt them when the run is cancelled.

use async_trait::async_trait;
use colored::Colorize;
use pagepilot_application::ports::interaction::{ApprovalPort, InteractionError, UserReplyPort};
use serde_json::Value;
use std::io::{self, Write};

/// Reply reported when the user answers with a blank line.
pub const NO_REPLY: &str = "(no reply)";

/// A decision typed at the approval prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalCommand {
    Approve,
    Skip,
    Abort,
}

impl ApprovalCommand {
    /// Parse one line of input; `None` for anything unrecognised.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "/approve" | "approve" | "a" | "y" | "yes" => Some(Self::Approve),
            "/skip" | "skip" | "s" | "n" | "no" => Some(Self::Skip),
            "/abort" | "abort" | "q" | "quit" => Some(Self::Abort),
            _ => None,
        }
    }
}

/// The text handed back to the model for a user's reply.
pub fn normalize_reply(input: &str) -> String {
    let reply = input.trim();
    if reply.is_empty() {
        NO_REPLY.to_string()
    } else {
        reply.to_string()
    }
}

fn read_line(prompt: &str) -> Result<String, InteractionError> {
    print!("{} ", prompt.magenta().bold());
    io::stdout()
        .flush()
        .map_err(|e| InteractionError::Io(format!("Failed to flush stdout: {}", e)))?;

    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .map_err(|e| InteractionError::Io(format!("Failed to read input: {}", e)))?;
    if read == 0 {
        return Err(InteractionError::Unavailable("stdin closed".to_string()));
    }
    Ok(input)
}

async fn read_line_blocking(prompt: &'static str) -> Result<String, InteractionError> {
    tokio::task::spawn_blocking(move || read_line(prompt))
        .await
        .map_err(|e| InteractionError::Io(format!("Input task failed: {}", e)))?
}

/// Terminal approval gate.
pub struct InteractiveApproval;

impl InteractiveApproval {
    pub fn new() -> Self {
        Self
    }

    fn display_prompt(&self, tool_name: &str, args: &Value) {
        println!();
        println!("{}", "Approve tool call?".yellow().bold());
        println!("  {}({})", tool_name.cyan(), args);
        println!();
        println!(
            "  {} (a) | {} (s) | {} (q)",
            "approve".green(),
            "skip".yellow(),
            "abort".red()
        );
    }
}

impl Default for InteractiveApproval {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ApprovalPort for InteractiveApproval {
    async fn request_approval(&self, tool_name: &str, args: &Value) -> Result<bool, InteractionError> {
        self.display_prompt(tool_name, args);

        loop {
            let input = read_line_blocking("approve>").await?;
            match ApprovalCommand::parse(&input) {
                Some(ApprovalCommand::Approve) => return Ok(true),
                Some(ApprovalCommand::Skip) => return Ok(false),
                Some(ApprovalCommand::Abort) => return Err(InteractionError::Cancelled),
                None if input.trim().is_empty() => continue,
                None => {
                    println!("{} Unknown command: {}", "⚠️".yellow(), input.trim().red());
                    println!("Available commands: approve, skip, abort");
                }
            }
        }
    }
}

/// Terminal collaborator for the model's questions.
pub struct InteractiveUserReply;

impl InteractiveUserReply {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InteractiveUserReply {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserReplyPort for InteractiveUserReply {
    async fn ask(&self, question: &str) -> Result<String, InteractionError> {
        println!();
        println!("{} {}", "❓".yellow(), question.bold());
        let input = read_line_blocking("reply>").await?;
        Ok(normalize_reply(&input))
    }
}
