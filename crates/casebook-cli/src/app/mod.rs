//! Application-level utilities for the Casebook CLI.
//!
//! This module provides:
//! - Path resolution for the config file and data directory
//! - The per-invocation `AppContext`

mod context;
mod resolver;

// Re-export public API
pub use context::AppContext;
pub use resolver::resolve_config_path;
