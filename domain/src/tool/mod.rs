//! Tool domain module
//!
//! Pages expose a dynamically changing set of callable tools, possibly from
//! several origins at once (the top document and embedded frames). Every
//! iteration of the agent loop works against a fresh snapshot of them.
//!
//! ```text
//! ┌────────────────┐   annotate   ┌──────────┐   model    ┌───────────────────────┐
//! │ ToolDescriptor │─────────────▶│ Tool     │──────────▶ │ ToolInvocationRequest │
//! │ (per origin)   │  origin+trust│ snapshot │            └───────────┬───────────┘
//! └────────────────┘              └──────────┘                        │ route
//!                                                                     ▼
//!                                 ┌──────────────────────┐   ┌──────────────────┐
//!                                 │ ToolInvocationResult │◀──│ ExecutionOutcome │
//!                                 └──────────────────────┘   └──────────────────┘
//! ```
//!
//! Two [built-in](builtin) control tools, `complete` and `ask_user`, are
//! always offered alongside the page's tools and never routed to an origin.

pub mod builtin;
pub mod entities;
pub mod invocation;

pub use builtin::{BuiltinTool, builtin_function_tools};
pub use entities::{FunctionTool, OriginKey, Tool, ToolDescriptor};
pub use invocation::{ExecutionOutcome, ToolInvocationRequest, ToolInvocationResult};
