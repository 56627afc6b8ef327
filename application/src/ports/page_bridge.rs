//! Page bridge port
//!
//! Defines the origin-keyed request/response transport to the tools a page
//! exposes. The agent never needs to know whether origins are browser frames
//! or any other multi-endpoint addressing scheme.
//!
//! ```text
//! CapabilityDirectory ──frames()──────────▶ ┌──────────────┐
//!                     ──list_tools(o)─────▶ │ PageBridge   │──▶ origin o
//! ExecutionRouter     ──execute_tool(o)───▶ └──────────────┘
//! ```

use async_trait::async_trait;
use pagepilot_domain::{OriginKey, ToolDescriptor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors raised by the transport itself (not by a tool).
#[derive(Error, Debug, Clone)]
pub enum BridgeError {
    /// No bridge is listening in the origin (e.g. no content script)
    #[error("Origin unreachable: {0}")]
    Unreachable(OriginKey),

    /// The page has no tool API available
    #[error("Tool API not available: {0}")]
    Unavailable(String),

    /// The message could not be delivered or answered
    #[error("Transport error: {0}")]
    Transport(String),
}

/// A document of the active page that may expose tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInfo {
    pub origin: OriginKey,
    /// `None` for the top-level document
    pub parent: Option<OriginKey>,
    pub url: String,
}

impl FrameInfo {
    pub fn top_level(url: impl Into<String>) -> Self {
        Self {
            origin: OriginKey::TOP_LEVEL,
            parent: None,
            url: url.into(),
        }
    }

    pub fn embedded(origin: OriginKey, parent: OriginKey, url: impl Into<String>) -> Self {
        Self {
            origin,
            parent: Some(parent),
            url: url.into(),
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }
}

/// Reply to a list request from one origin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolListing {
    pub tools: Vec<ToolDescriptor>,
    /// The document URL as the origin reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ToolListing {
    pub fn new(tools: Vec<ToolDescriptor>) -> Self {
        Self { tools, url: None }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Reply to an execute request, as the origin's bridge sends it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BridgeReply {
    pub fn ok(result: impl Into<Value>) -> Self {
        Self {
            success: true,
            result: Some(result.into()),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(message.into()),
        }
    }
}

/// Port for talking to the tools exposed by the active page.
///
/// Implementations (adapters) live outside this crate: a browser extension
/// messaging bridge, a test double, a remote-browser protocol, ...
#[async_trait]
pub trait PageBridgePort: Send + Sync {
    /// Enumerate the documents of the active page, top-level included.
    async fn frames(&self) -> Result<Vec<FrameInfo>, BridgeError>;

    /// List the tools one origin currently exposes.
    async fn list_tools(&self, origin: OriginKey) -> Result<ToolListing, BridgeError>;

    /// Invoke a tool in one origin with JSON-encoded arguments.
    async fn execute_tool(
        &self,
        origin: OriginKey,
        name: &str,
        arguments: &str,
    ) -> Result<BridgeReply, BridgeError>;
}
