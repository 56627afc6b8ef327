//! Infrastructure layer for pagepilot
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, plus configuration file loading and
//! logging setup.

pub mod config;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileAgentConfig, FileBackendConfig, FileConfig,
    FileLoggingConfig,
};
pub use logging::{JsonlEventLog, init_tracing};
