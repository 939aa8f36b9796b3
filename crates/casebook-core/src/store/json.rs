//! JSON document store.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use super::{migrate, Collection, Store};
use crate::error::{CasebookError, Result};
use crate::fs::write_atomic;

/// Store that keeps each collection as a pretty-printed JSON array under a
/// data directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, collection: Collection) -> PathBuf {
        self.root.join(collection.file_name())
    }

    fn encode<T: Serialize + ?Sized>(collection: Collection, items: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        items
            .serialize(&mut serializer)
            .map_err(|e| CasebookError::Persistence(format!("Failed to encode {}: {}", collection, e)))?;
        Ok(buf)
    }

    /// Write an upgraded document back so assigned ids stay stable. A failed
    /// write only costs a repeat of the upgrade on the next load.
    fn rewrite_upgraded(&self, collection: Collection, value: &Value) {
        let path = self.path_for(collection);
        let written = Self::encode(collection, value).and_then(|buf| {
            write_atomic(&path, &buf).map_err(|e| {
                CasebookError::Persistence(format!("Failed to write {}: {}", path.display(), e))
            })
        });
        if let Err(err) = written {
            tracing::warn!(%collection, error = %err, "could not rewrite upgraded document");
        }
    }

    fn corrupt(collection: Collection, message: impl ToString) -> CasebookError {
        CasebookError::CorruptData {
            collection,
            message: message.to_string(),
        }
    }
}

impl Store for JsonStore {
    fn load<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>> {
        let path = self.path_for(collection);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(%collection, path = %path.display(), "document absent, starting empty");
                return Ok(Vec::new());
            }
            Err(err) => {
                return Err(CasebookError::Persistence(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    err
                )))
            }
        };

        let mut value: Value =
            serde_json::from_str(&raw).map_err(|e| Self::corrupt(collection, e))?;
        let records = value
            .as_array_mut()
            .ok_or_else(|| Self::corrupt(collection, "expected a JSON array"))?;

        let migrated = migrate::upgrade(collection, records);
        let items: Vec<T> =
            serde_json::from_value(value.clone()).map_err(|e| Self::corrupt(collection, e))?;
        if migrated > 0 {
            tracing::info!(%collection, records = migrated, "migrated legacy records");
            self.rewrite_upgraded(collection, &value);
        }
        tracing::debug!(%collection, count = items.len(), "loaded collection");
        Ok(items)
    }

    fn save<T: Serialize>(&self, collection: Collection, items: &[T]) -> Result<()> {
        let path = self.path_for(collection);
        let buf = Self::encode(collection, items)?;
        write_atomic(&path, &buf).map_err(|e| {
            CasebookError::Persistence(format!("Failed to write {}: {}", path.display(), e))
        })?;
        tracing::debug!(%collection, count = items.len(), "saved collection");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Crime, ReportPreset};
    use tempfile::TempDir;

    #[test]
    fn test_missing_document_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());
        let crimes: Vec<Crime> = store.load(Collection::Crimes).unwrap();
        assert!(crimes.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());
        let crimes = vec![Crime::new("Körperverletzung", "§ 223 StGB", 7, 200)];
        store.save(Collection::Crimes, &crimes).unwrap();

        let loaded: Vec<Crime> = store.load(Collection::Crimes).unwrap();
        assert_eq!(loaded, crimes);
    }

    #[test]
    fn test_save_writes_four_space_indent_and_raw_utf8() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());
        store
            .save(Collection::Crimes, &[Crime::new("Nötigung", "§ 240 StGB", 4, 100)])
            .unwrap();

        let raw = fs::read_to_string(dir.path().join("predefined_crimes.json")).unwrap();
        assert!(raw.contains("\n    {\n        \"name\": \"Nötigung\""));
        assert!(raw.contains("\"paragraph\": \"§ 240 StGB\""));
    }

    #[test]
    fn test_save_creates_nested_directory() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());
        store
            .save::<Crime>(Collection::PerpetratorFiles, &[])
            .unwrap();
        assert!(dir.path().join("taeterakten/taeterakten.json").exists());
    }

    #[test]
    fn test_unparsable_document_is_corrupt() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("anzeigen.json"), "{ not json").unwrap();
        let store = JsonStore::new(dir.path());

        let err = store.load::<Crime>(Collection::Reports).unwrap_err();
        assert!(matches!(
            err,
            CasebookError::CorruptData {
                collection: Collection::Reports,
                ..
            }
        ));
    }

    #[test]
    fn test_upgraded_document_is_rewritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("anzeigen_presets.json");
        fs::write(&path, r#"[{"name": "Kurz", "template_string": "[name]"}]"#).unwrap();
        let store = JsonStore::new(dir.path());

        let first: Vec<ReportPreset> = store.load(Collection::Presets).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains(&format!("\"id\": \"{}\"", first[0].id)));

        let second: Vec<ReportPreset> = store.load(Collection::Presets).unwrap();
        assert_eq!(first[0].id, second[0].id);
    }

    #[test]
    fn test_non_array_document_is_corrupt() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("predefined_crimes.json"), "{}").unwrap();
        let store = JsonStore::new(dir.path());
        assert!(store.load::<Crime>(Collection::Crimes).is_err());
    }
}
