//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod completion_backend;
pub mod event_sink;
pub mod interaction;
pub mod page_bridge;
