//! Session context owning every collection and the store behind them.
//!
//! Collections are loaded once when the session opens and the affected
//! collections are written back after every successful mutation. A failed
//! save is reported to the caller; the in-memory state keeps the mutation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::catalog::CrimeCatalog;
use crate::error::{CasebookError, Result};
use crate::images::ImageStore;
use crate::ledger::{CaseLedger, FileUpdate, IntegrityIssue};
use crate::notes::Notebook;
use crate::presets::{self, PresetBook};
use crate::store::{Collection, JsonStore, Store};
use crate::types::{
    Crime, CrimeChanges, CrimeKey, NewPerpetratorFile, NewReport, Note, NoteChanges,
    PerpetratorFile, PerpetratorFileChanges, PresetChanges, Report, ReportChanges, ReportPreset,
};

/// Image directory relative to the data directory.
pub const IMAGE_DIR: &str = "taeterakten/bilder";

/// An open data directory.
pub struct Casebook<S: Store = JsonStore> {
    store: S,
    images: ImageStore,
    notes: Notebook,
    catalog: CrimeCatalog,
    ledger: CaseLedger,
    presets: PresetBook,
    load_issues: Vec<CasebookError>,
}

impl Casebook<JsonStore> {
    /// Open the JSON data directory at `root`.
    pub fn open_dir(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let images = ImageStore::new(root.join(IMAGE_DIR));
        Self::open(JsonStore::new(root), images)
    }
}

impl<S: Store> Casebook<S> {
    /// Load every collection. Corrupt documents start empty and are recorded
    /// as load issues; an empty crime catalog or preset list is seeded with
    /// the defaults. A seed that cannot be written stays in memory and is
    /// recorded as a load issue too.
    pub fn open(store: S, images: ImageStore) -> Result<Self> {
        let mut load_issues = Vec::new();

        let notes = load_or_empty(&store, Collection::Notes, &mut load_issues)?;
        let reports = load_or_empty(&store, Collection::Reports, &mut load_issues)?;
        let files = load_or_empty(&store, Collection::PerpetratorFiles, &mut load_issues)?;
        let crimes: Option<Vec<Crime>> = load_checked(&store, Collection::Crimes, &mut load_issues)?;
        let presets: Option<Vec<ReportPreset>> =
            load_checked(&store, Collection::Presets, &mut load_issues)?;

        let catalog = match crimes {
            Some(crimes) if crimes.is_empty() => {
                let catalog = CrimeCatalog::with_defaults();
                tracing::info!(count = catalog.len(), "seeded default crime catalog");
                seed(&store, Collection::Crimes, catalog.crimes(), &mut load_issues);
                catalog
            }
            Some(crimes) => CrimeCatalog::new(crimes),
            None => CrimeCatalog::default(),
        };
        let presets = match presets {
            Some(presets) if presets.is_empty() => {
                let book = PresetBook::with_defaults();
                tracing::info!(count = book.presets().len(), "seeded default presets");
                seed(&store, Collection::Presets, book.presets(), &mut load_issues);
                book
            }
            Some(presets) => PresetBook::new(presets),
            None => PresetBook::default(),
        };

        Ok(Self {
            store,
            images,
            notes: Notebook::new(notes),
            catalog,
            ledger: CaseLedger::new(reports, files),
            presets,
            load_issues,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    pub fn notes(&self) -> &Notebook {
        &self.notes
    }

    pub fn catalog(&self) -> &CrimeCatalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &CaseLedger {
        &self.ledger
    }

    pub fn presets(&self) -> &PresetBook {
        &self.presets
    }

    /// Problems met at open: unreadable documents and unwritten seeds.
    pub fn load_issues(&self) -> &[CasebookError] {
        &self.load_issues
    }

    // --- Notes ---

    pub fn add_note(&mut self, title: &str, content: &str) -> Result<Note> {
        let note = self.notes.add(title, content)?;
        self.persist(&[Collection::Notes])?;
        Ok(note)
    }

    pub fn edit_note(&mut self, id: Uuid, changes: NoteChanges) -> Result<Note> {
        let note = self.notes.edit(id, changes)?;
        self.persist(&[Collection::Notes])?;
        Ok(note)
    }

    pub fn delete_note(&mut self, id: Uuid) -> Result<Note> {
        let note = self.notes.delete(id)?;
        self.persist(&[Collection::Notes])?;
        Ok(note)
    }

    // --- Crime catalog ---

    pub fn add_crime(
        &mut self,
        name: &str,
        statute: &str,
        detention_units: i64,
        fine: i64,
    ) -> Result<Crime> {
        let crime = self.catalog.add(name, statute, detention_units, fine)?;
        self.persist(&[Collection::Crimes])?;
        Ok(crime)
    }

    pub fn edit_crime(&mut self, key: &CrimeKey, changes: CrimeChanges) -> Result<Crime> {
        let crime = self.catalog.edit(key, changes)?;
        self.persist(&[Collection::Crimes])?;
        Ok(crime)
    }

    pub fn remove_crime(&mut self, key: &CrimeKey) -> Result<Crime> {
        let crime = self.catalog.remove(key)?;
        self.persist(&[Collection::Crimes])?;
        Ok(crime)
    }

    // --- Reports and perpetrator files ---

    pub fn create_report(&mut self, new: NewReport) -> Result<Report> {
        let report = self.ledger.create_report(new)?;
        self.persist(&[Collection::Reports, Collection::PerpetratorFiles])?;
        Ok(report)
    }

    pub fn edit_report(&mut self, id: Uuid, changes: ReportChanges) -> Result<Report> {
        let report = self.ledger.edit_report(id, changes)?;
        self.persist(&[Collection::Reports, Collection::PerpetratorFiles])?;
        Ok(report)
    }

    /// Delete a report. Returns `None` (and writes nothing) for an unknown id.
    pub fn delete_report(&mut self, id: Uuid) -> Result<Option<Report>> {
        let removed = self.ledger.delete_report(id)?;
        if removed.is_some() {
            self.persist(&[Collection::Reports, Collection::PerpetratorFiles])?;
        }
        Ok(removed)
    }

    pub fn create_perpetrator_file(&mut self, new: NewPerpetratorFile) -> Result<PerpetratorFile> {
        let file = self.ledger.create_perpetrator_file(new)?;
        self.persist(&[Collection::PerpetratorFiles])?;
        Ok(file)
    }

    /// Edit a perpetrator file; a superseded image is removed from disk.
    pub fn edit_perpetrator_file(
        &mut self,
        id: Uuid,
        changes: PerpetratorFileChanges,
    ) -> Result<PerpetratorFile> {
        let FileUpdate {
            file,
            superseded_image,
        } = self.ledger.edit_perpetrator_file(id, changes)?;
        self.persist(&[Collection::PerpetratorFiles, Collection::Reports])?;
        if let Some(image_ref) = superseded_image {
            self.discard_image(&image_ref);
        }
        Ok(file)
    }

    /// Delete a perpetrator file and its image. Linked reports are kept.
    pub fn delete_perpetrator_file(&mut self, id: Uuid) -> Result<PerpetratorFile> {
        let file = self.ledger.delete_perpetrator_file(id)?;
        self.persist(&[Collection::PerpetratorFiles, Collection::Reports])?;
        if let Some(image_ref) = &file.image_ref {
            self.discard_image(image_ref);
        }
        Ok(file)
    }

    /// Copy an image into the image directory.
    pub fn import_image(&self, source: &Path) -> Result<String> {
        self.images.import(source)
    }

    pub fn verify(&self) -> Vec<IntegrityIssue> {
        self.ledger.verify()
    }

    /// Recompute totals and links, then write both collections.
    pub fn rebuild_totals(&mut self) -> Result<usize> {
        let changed = self.ledger.rebuild_totals()?;
        self.persist(&[Collection::Reports, Collection::PerpetratorFiles])?;
        Ok(changed)
    }

    // --- Presets ---

    pub fn add_preset(&mut self, name: &str, template: &str) -> Result<ReportPreset> {
        let preset = self.presets.add(name, template)?;
        self.persist(&[Collection::Presets])?;
        Ok(preset)
    }

    pub fn edit_preset(&mut self, id: Uuid, changes: PresetChanges) -> Result<ReportPreset> {
        let preset = self.presets.edit(id, changes)?;
        self.persist(&[Collection::Presets])?;
        Ok(preset)
    }

    pub fn delete_preset(&mut self, id: Uuid) -> Result<ReportPreset> {
        let preset = self.presets.delete(id)?;
        self.persist(&[Collection::Presets])?;
        Ok(preset)
    }

    /// Render the preset with `values`.
    pub fn generate(&self, preset_id: Uuid, values: &BTreeMap<String, String>) -> Result<String> {
        let preset = self
            .presets
            .get(preset_id)
            .ok_or_else(|| CasebookError::NotFound(format!("preset {}", preset_id)))?;
        Ok(presets::generate(preset, values))
    }

    fn persist(&self, collections: &[Collection]) -> Result<()> {
        let mut first_error = None;
        for collection in collections {
            let result = match collection {
                Collection::Notes => self.store.save(*collection, self.notes.notes()),
                Collection::Reports => self.store.save(*collection, self.ledger.reports()),
                Collection::PerpetratorFiles => self
                    .store
                    .save(*collection, self.ledger.perpetrator_files()),
                Collection::Crimes => self.store.save(*collection, self.catalog.crimes()),
                Collection::Presets => self.store.save(*collection, self.presets.presets()),
            };
            if let Err(err) = result {
                tracing::error!(%collection, error = %err, "save failed");
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn discard_image(&self, image_ref: &str) {
        if let Err(err) = self.images.remove(image_ref) {
            tracing::warn!(image = %image_ref, error = %err, "failed to remove image");
        }
    }
}

/// Load a collection; a corrupt document yields `None` and a load issue.
fn load_checked<S: Store, T: serde::de::DeserializeOwned>(
    store: &S,
    collection: Collection,
    issues: &mut Vec<CasebookError>,
) -> Result<Option<Vec<T>>> {
    match store.load(collection) {
        Ok(items) => Ok(Some(items)),
        Err(err @ CasebookError::CorruptData { .. }) => {
            tracing::warn!(%collection, error = %err, "starting collection empty");
            issues.push(err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn seed<S: Store, T: serde::Serialize>(
    store: &S,
    collection: Collection,
    items: &[T],
    issues: &mut Vec<CasebookError>,
) {
    if let Err(err) = store.save(collection, items) {
        tracing::warn!(%collection, error = %err, "defaults kept in memory only");
        issues.push(err);
    }
}

fn load_or_empty<S: Store, T: serde::de::DeserializeOwned>(
    store: &S,
    collection: Collection,
    issues: &mut Vec<CasebookError>,
) -> Result<Vec<T>> {
    Ok(load_checked(store, collection, issues)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_open_empty_dir_seeds_defaults() {
        let dir = TempDir::new().unwrap();
        let book = Casebook::open_dir(dir.path()).unwrap();
        assert_eq!(book.catalog().len(), 16);
        assert_eq!(book.presets().presets().len(), 6);
        assert!(book.load_issues().is_empty());
        assert!(dir.path().join("predefined_crimes.json").exists());
        assert!(dir.path().join("anzeigen_presets.json").exists());
    }

    #[test]
    fn test_mutations_persist_across_sessions() {
        let dir = TempDir::new().unwrap();
        let report_id = {
            let mut book = Casebook::open_dir(dir.path()).unwrap();
            let raub = book.catalog().resolve("Raub").unwrap();
            book.add_note("Streife", "ruhig").unwrap();
            book.create_report(NewReport::new("AZ-7", "Max", "Anzeige", vec![raub]))
                .unwrap()
                .id
        };

        let book = Casebook::open_dir(dir.path()).unwrap();
        assert_eq!(book.notes().notes().len(), 1);
        let report = book.ledger().get_report(report_id).unwrap();
        assert_eq!(report.display_id, "AZ-7");
        let file = book.ledger().find_perpetrator_by_name("max").unwrap();
        assert_eq!(file.total_fine, 500);
        assert!(book.verify().is_empty());
    }

    #[test]
    fn test_corrupt_document_is_a_load_issue() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notizen.json"), "[{").unwrap();

        let book = Casebook::open_dir(dir.path()).unwrap();
        assert_eq!(book.load_issues().len(), 1);
        assert!(book.notes().notes().is_empty());
    }

    #[test]
    fn test_delete_perpetrator_file_removes_image() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("foto.jpg");
        fs::write(&source, b"jpg").unwrap();

        let mut book = Casebook::open_dir(dir.path()).unwrap();
        let image_ref = book.import_image(&source).unwrap();
        let file = book
            .create_perpetrator_file(NewPerpetratorFile::new("Max").with_image_ref(&image_ref))
            .unwrap();
        let image_path = book.images().path(&image_ref).unwrap();
        assert!(image_path.exists());

        book.delete_perpetrator_file(file.id).unwrap();
        assert!(!image_path.exists());
    }

    #[test]
    fn test_delete_perpetrator_file_leaves_outside_paths_alone() {
        let dir = TempDir::new().unwrap();
        let outside = dir.path().join("notizen.json");
        fs::write(&outside, b"[]").unwrap();

        let mut book = Casebook::open_dir(dir.path()).unwrap();
        let file = book
            .create_perpetrator_file(
                NewPerpetratorFile::new("Max").with_image_ref("../../notizen.json"),
            )
            .unwrap();
        book.delete_perpetrator_file(file.id).unwrap();
        assert!(outside.exists());
    }

    #[test]
    fn test_generate_unknown_preset() {
        let dir = TempDir::new().unwrap();
        let book = Casebook::open_dir(dir.path()).unwrap();
        assert!(matches!(
            book.generate(Uuid::new_v4(), &BTreeMap::new()),
            Err(CasebookError::NotFound(_))
        ));
    }
}
