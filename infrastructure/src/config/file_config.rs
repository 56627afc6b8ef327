//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types.

use pagepilot_application::{AgentConfig, TextReplyPolicy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default API version sent to the model backend.
pub const DEFAULT_API_VERSION: &str = "2025-03-01-preview";

/// Configuration validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("agent.max_iterations cannot be 0")]
    ZeroIterations,

    #[error("backend.endpoint must use https: {0}")]
    InsecureEndpoint(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Agent loop settings
    pub agent: FileAgentConfig,
    /// Model backend connection settings
    pub backend: FileBackendConfig,
    /// Log destinations
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.agent.max_iterations == 0 {
            return Err(ConfigValidationError::ZeroIterations);
        }
        self.backend.validate()
    }
}

/// Raw agent configuration from TOML
///
/// # Example
///
/// ```toml
/// [agent]
/// max_iterations = 20
/// auto_approve = true
/// allow_embedded_origins = false
/// settle_delay_ms = 500
/// single_turn = false
/// text_reply = "continue"        # "continue" or "complete"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub max_iterations: usize,
    pub auto_approve: bool,
    pub allow_embedded_origins: bool,
    /// Pause after each successful tool call, in milliseconds
    pub settle_delay_ms: u64,
    pub single_turn: bool,
    pub text_reply: TextReplyPolicy,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        let defaults = AgentConfig::default();
        Self {
            max_iterations: defaults.max_iterations,
            auto_approve: defaults.auto_approve,
            allow_embedded_origins: defaults.allow_embedded_origins,
            settle_delay_ms: defaults.settle_delay.as_millis() as u64,
            single_turn: defaults.single_turn,
            text_reply: defaults.text_reply,
        }
    }
}

impl FileAgentConfig {
    pub fn to_agent_config(&self) -> AgentConfig {
        AgentConfig::default()
            .with_max_iterations(self.max_iterations)
            .with_auto_approve(self.auto_approve)
            .with_allow_embedded_origins(self.allow_embedded_origins)
            .with_settle_delay(Duration::from_millis(self.settle_delay_ms))
            .with_single_turn(self.single_turn)
            .with_text_reply(self.text_reply)
    }
}

/// Raw model backend configuration from TOML
///
/// ```toml
/// [backend]
/// endpoint = "https://my-resource.openai.azure.com"
/// deployment = "gpt-4.1"
/// api_version = "2025-03-01-preview"
/// api_key = "..."                 # or PAGEPILOT_BACKEND__API_KEY
/// ```
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment: Option<String>,
    pub api_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for FileBackendConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            deployment: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            api_key: None,
        }
    }
}

impl std::fmt::Debug for FileBackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileBackendConfig")
            .field("endpoint", &self.endpoint)
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl FileBackendConfig {
    /// True when endpoint, key and deployment are all set and non-blank.
    pub fn is_configured(&self) -> bool {
        [&self.endpoint, &self.api_key, &self.deployment]
            .iter()
            .all(|v| v.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }

    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        match &self.endpoint {
            Some(endpoint) if !endpoint.starts_with("https://") => {
                Err(ConfigValidationError::InsecureEndpoint(endpoint.clone()))
            }
            _ => Ok(()),
        }
    }
}

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL file receiving every agent event
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_log: Option<PathBuf>,
    /// Directory for daily-rolling diagnostic logs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}
