//! Image side directory for perpetrator files.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use uuid::Uuid;

use crate::error::{CasebookError, Result};

/// Directory of images referenced by opaque file names.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy `source` into the directory under a fresh name and return the
    /// reference to store on the file.
    pub fn import(&self, source: &Path) -> Result<String> {
        if !source.is_file() {
            return Err(CasebookError::Validation(format!(
                "Image not found: {}",
                source.display()
            )));
        }
        let image_ref = match source.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext.to_ascii_lowercase()),
            None => Uuid::new_v4().to_string(),
        };

        fs::create_dir_all(&self.dir)?;
        fs::copy(source, self.dir.join(&image_ref)).map_err(|e| {
            CasebookError::Persistence(format!(
                "Failed to copy image {}: {}",
                source.display(),
                e
            ))
        })?;
        tracing::debug!(image = %image_ref, "image imported");
        Ok(image_ref)
    }

    /// Resolve a reference inside the directory. Only a plain file name is
    /// accepted.
    pub fn path(&self, image_ref: &str) -> Result<PathBuf> {
        let mut components = Path::new(image_ref).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => Ok(self.dir.join(name)),
            _ => Err(CasebookError::Validation(format!(
                "Invalid image reference: {}",
                image_ref
            ))),
        }
    }

    /// Delete an image. A file that is already gone is not an error.
    pub fn remove(&self, image_ref: &str) -> Result<()> {
        match fs::remove_file(self.path(image_ref)?) {
            Ok(()) => {
                tracing::debug!(image = %image_ref, "image removed");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
