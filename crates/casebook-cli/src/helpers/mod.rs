//! Input and lookup helpers for the CLI.
//!
//! - `parsing`: KEY=VALUE pairs, timezones and ID prefixes
//! - `lookup`: resolve user-supplied references to records
//! - `prompts`: interactive prompts (placeholders, crimes, confirmation)

mod lookup;
mod parsing;
mod prompts;

pub use lookup::{find_crime, find_file, find_note, find_preset, find_report, resolve_crimes};
pub use parsing::{parse_key_values, parse_timezone};
pub use prompts::{
    confirm_delete, fill_placeholders, interactive, prompt_crimes, prompt_perpetrator, prompt_text,
};
