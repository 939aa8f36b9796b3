//! Output mode routing logic.

use crate::errors::CliError;

/// Output mode determines how results are formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Machine-readable JSON output only
    Json,
    /// Plain text, stable for logs and scripts
    #[default]
    Plain,
    /// Human-friendly with colors and tables (TTY only)
    Pretty,
}

impl OutputMode {
    /// Resolve output mode from flags and environment.
    ///
    /// Routing rules:
    /// 1. `--json` overrides everything
    /// 2. `--format plain` forces plain
    /// 3. `TERM=dumb` forces plain
    /// 4. Pretty only when stdout is a TTY
    pub fn resolve(
        json_flag: bool,
        format_flag: Option<&str>,
        is_tty: bool,
        term_is_dumb: bool,
    ) -> Self {
        if json_flag {
            return Self::Json;
        }
        if matches!(format_flag, Some("plain")) || term_is_dumb {
            return Self::Plain;
        }
        if is_tty {
            Self::Pretty
        } else {
            Self::Plain
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_pretty(&self) -> bool {
        matches!(self, Self::Pretty)
    }
}

/// Validate a `--format` value.
pub fn validate_format(format: Option<&str>, json: bool) -> anyhow::Result<()> {
    match format {
        None => Ok(()),
        Some(_) if json => {
            Err(CliError::invalid_input("--format cannot be used with --json").into())
        }
        Some("table") | Some("plain") => Ok(()),
        Some(other) => Err(CliError::invalid_input(format!(
            "Unknown format '{}' (expected table or plain)",
            other
        ))
        .into()),
    }
}
