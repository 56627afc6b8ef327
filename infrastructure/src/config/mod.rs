//! Configuration file loading for pagepilot
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `PAGEPILOT_*` environment variables
//! 2. Explicitly specified file
//! 3. Project root: `./pagepilot.toml` or `./.pagepilot.toml`
//! 4. Global: `$XDG_CONFIG_HOME/pagepilot/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_API_VERSION, FileAgentConfig, FileBackendConfig, FileConfig,
    FileLoggingConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
