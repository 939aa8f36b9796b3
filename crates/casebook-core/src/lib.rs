//! # Casebook Core
//!
//! Core library for Casebook - a record keeper for role-play police case
//! management: notes, incident reports, cumulative perpetrator files and
//! fill-in-the-blank report templates.
//!
//! This crate provides the domain logic, the document store and the data
//! models independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **store**: Whole-collection JSON documents and legacy migrations
//! - **catalog**: Reusable crime definitions
//! - **ledger**: Reports, perpetrator files and penalty totals
//! - **template**: `[placeholder]` extraction and rendering
//! - **notes** / **presets**: Free-text notes and named report templates
//! - **images**: Image side directory for perpetrator files
//! - **session**: `Casebook`, the owner of all state for an open data directory

pub mod case_number;
pub mod catalog;
pub mod error;
pub mod fs;
pub mod images;
pub mod ledger;
pub mod notes;
pub mod presets;
pub mod session;
pub mod store;
pub mod template;
pub mod types;

pub use catalog::CrimeCatalog;
pub use error::{CasebookError, Result};
pub use ledger::{format_crime_list, CaseLedger, IntegrityIssue};
pub use session::Casebook;
pub use store::{Collection, JsonStore, Store};
pub use types::{
    Cost, Crime, CrimeChanges, CrimeKey, ImageChange, NewPerpetratorFile, NewReport, Note,
    NoteChanges, PerpetratorFile, PerpetratorFileChanges, PresetChanges, Report, ReportChanges,
    ReportPreset,
};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
