//! UI primitives for the Casebook CLI.
//!
//! This module provides:
//! - **Context**: Environment detection (TTY, width, color, unicode)
//! - **Mode**: Output mode resolution (json, plain, pretty)
//! - **Theme**: Badge tokens and styling
//! - **Render**: Tables, headers, receipts, hints, formatted text
//! - **Format**: String utilities (truncate, short ids, dates, amounts)

mod context;
pub mod format;
mod mode;
pub mod render;
pub mod theme;

// Re-export core types at module level
pub use context::UiContext;
pub use mode::{validate_format, OutputMode};
pub use theme::Badge;

// Re-export commonly used render functions
pub use render::{
    badge, blank_line, header, hint, kv, print, print_error, print_json, print_warning, receipt,
    simple_table, Column,
};

// Re-export commonly used format functions
pub use format::{format_datetime, or_dash, short_id, single_line, truncate};
