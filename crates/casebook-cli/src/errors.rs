//! CLI error type carrying an exit code and a hint.

use std::fmt;

use casebook_core::CasebookError;

use crate::constants::exit_codes;

/// Error raised by command handlers when the exit code or hint matters.
#[derive(Debug)]
pub struct CliError {
    pub message: String,
    pub hint: Option<String>,
    pub exit_code: i32,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: i32) -> Self {
        Self {
            message: message.into(),
            hint: None,
            exit_code,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::new(message, exit_codes::NOT_FOUND).with_hint(hint)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(message, exit_codes::INVALID_INPUT)
    }

    pub fn integrity_failed(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::new(message, exit_codes::INTEGRITY_FAILED).with_hint(hint)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

/// Message, hint and exit code for an error that reached `main`.
pub fn describe_error(err: &anyhow::Error) -> (String, Option<String>, i32) {
    if let Some(cli) = err.downcast_ref::<CliError>() {
        return (cli.message.clone(), cli.hint.clone(), cli.exit_code);
    }
    if let Some(core) = err.downcast_ref::<CasebookError>() {
        let (hint, code) = match core {
            CasebookError::NotFound(_) => (
                Some("List records with `casebook <note|report|file|crime|preset> list`"),
                exit_codes::NOT_FOUND,
            ),
            CasebookError::DuplicateName(_) => (
                Some("Use `casebook file list` to find the existing file"),
                exit_codes::INVALID_INPUT,
            ),
            CasebookError::Validation(_) | CasebookError::Duplicate(_) => {
                (None, exit_codes::INVALID_INPUT)
            }
            CasebookError::CorruptData { .. } => (
                Some("Restore the document from a backup or run `casebook check`"),
                exit_codes::STORAGE,
            ),
            CasebookError::Persistence(_) => (
                Some("Check that the data directory is writable"),
                exit_codes::STORAGE,
            ),
        };
        return (core.to_string(), hint.map(str::to_string), code);
    }
    (format!("{:#}", err), None, exit_codes::FAILURE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_error_keeps_code_and_hint() {
        let err: anyhow::Error = CliError::not_found("No note", "casebook note list").into();
        let (message, hint, code) = describe_error(&err);
        assert_eq!(message, "No note");
        assert_eq!(hint.as_deref(), Some("casebook note list"));
        assert_eq!(code, exit_codes::NOT_FOUND);
    }

    #[test]
    fn test_core_errors_map_to_exit_codes() {
        let err: anyhow::Error = CasebookError::Validation("Title must not be empty".into()).into();
        assert_eq!(describe_error(&err).2, exit_codes::INVALID_INPUT);

        let err: anyhow::Error = CasebookError::Persistence("disk full".into()).into();
        assert_eq!(describe_error(&err).2, exit_codes::STORAGE);

        let err: anyhow::Error = CasebookError::NotFound("report".into()).into();
        assert_eq!(describe_error(&err).2, exit_codes::NOT_FOUND);
    }

    #[test]
    fn test_other_errors_are_general_failures() {
        let err = anyhow::anyhow!("boom");
        assert_eq!(describe_error(&err).2, exit_codes::FAILURE);
    }
}
