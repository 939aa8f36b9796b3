//! Persistent store.
//!
//! Collections are stored as whole JSON documents and rewritten in full on
//! every save. The `Store` trait is the seam the session talks to; `JsonStore`
//! is the on-disk implementation.

mod json;
mod migrate;

use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

pub use json::JsonStore;

/// The named collections persisted by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Notes,
    Reports,
    PerpetratorFiles,
    Crimes,
    Presets,
}

impl Collection {
    /// Document path relative to the data directory.
    pub fn file_name(&self) -> &'static Path {
        Path::new(match self {
            Collection::Notes => "notizen.json",
            Collection::Reports => "anzeigen.json",
            Collection::PerpetratorFiles => "taeterakten/taeterakten.json",
            Collection::Crimes => "predefined_crimes.json",
            Collection::Presets => "anzeigen_presets.json",
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Notes => "notes",
            Collection::Reports => "reports",
            Collection::PerpetratorFiles => "perpetrator files",
            Collection::Crimes => "crimes",
            Collection::Presets => "presets",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whole-collection persistence.
///
/// Implementations must:
/// - return an empty sequence for a collection that was never written
/// - fail with `CasebookError::CorruptData` for a document that cannot be parsed
/// - fail with `CasebookError::Persistence` when writing fails, leaving the
///   previous document in place
pub trait Store {
    /// Load every record of a collection.
    fn load<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>>;

    /// Replace the stored collection with `items`.
    fn save<T: Serialize>(&self, collection: Collection, items: &[T]) -> Result<()>;
}
