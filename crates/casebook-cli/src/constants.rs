//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells, used by clap)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// General failure.
    pub const FAILURE: i32 = 1;

    /// Resource not found (data directory, note, report, file, crime, preset).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Reading or writing the data directory failed.
    pub const STORAGE: i32 = 5;

    /// Integrity check failed.
    pub const INTEGRITY_FAILED: i32 = 6;
}

/// Environment variable holding the tracing filter.
pub const LOG_ENV: &str = "CASEBOOK_LOG";

/// Filter used when `CASEBOOK_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Filter used with `--verbose`.
pub const VERBOSE_LOG_FILTER: &str = "casebook=info,casebook_core=info";

/// Default report type for `report add`.
pub const DEFAULT_REPORT_TYPE: &str = "Anzeige";
