//! Applying an export plan to disk

use crate::plan::{CollectionPlan, ExportPlan, FileKind};
use awtree_core::{AwtreeError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Summary of a completed export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub database_id: String,
    pub database_name: String,
    pub base_dir: PathBuf,
    pub collections: usize,
    pub attributes: usize,
    pub indexes: usize,
    /// Paths in the order they were written
    pub written: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

impl ExportReport {
    pub fn files_written(&self) -> usize {
        self.written.len()
    }
}

impl ExportPlan {
    /// Write every planned file in order
    pub fn apply(&self) -> Result<ExportReport> {
        self.apply_with(|_| {})
    }

    /// Like [`ExportPlan::apply`], calling `on_collection` before each collection is written.
    ///
    /// Stops at the first failure; files already written are left in place.
    pub fn apply_with<F>(&self, mut on_collection: F) -> Result<ExportReport>
    where
        F: FnMut(&CollectionPlan),
    {
        let mut written = Vec::with_capacity(self.file_count());
        for collection in &self.collections {
            on_collection(collection);
            log::info!("Writing collection '{}'", collection.name);
            written.extend(write_collection(collection)?);
        }

        Ok(ExportReport {
            database_id: self.database_id.clone(),
            database_name: self.database_name.clone(),
            base_dir: self.base_dir.clone(),
            collections: self.collections.len(),
            attributes: self.count(FileKind::Attribute),
            indexes: self.count(FileKind::Index),
            written,
            warnings: self.warnings.clone(),
        })
    }
}

/// Create the collection directory and write its files
pub fn write_collection(collection: &CollectionPlan) -> Result<Vec<PathBuf>> {
    ensure_dir(&collection.dir)?;

    let mut written = Vec::with_capacity(collection.files.len());
    for file in &collection.files {
        if let Some(parent) = file.path.parent() {
            ensure_dir(parent)?;
        }
        fs::write(&file.path, &file.contents).map_err(|e| AwtreeError::io(&file.path, e))?;
        log::debug!("Wrote {} {}", file.kind, file.path.display());
        written.push(file.path.clone());
    }
    Ok(written)
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| AwtreeError::io(dir, e))
}
