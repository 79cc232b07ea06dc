//! The schema exporter: read, resolve, plan, write

use crate::config::ExportSettings;
use crate::plan::ExportPlan;
use crate::writer::ExportReport;
use awtree_core::{AwtreeError, Result};
use awtree_schema::{Database, SchemaDocument};

/// A resolved schema document
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSchema {
    /// True when the database came from a `databases` array
    pub explicit: bool,
    /// Length of the document's `databases` array
    pub database_count: usize,
    pub database: Database,
}

/// Converts one schema document into a directory tree
#[derive(Debug, Clone, Default)]
pub struct SchemaExporter {
    settings: ExportSettings,
}

impl SchemaExporter {
    pub fn new(settings: ExportSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Read and resolve the configured input file
    pub fn load(&self) -> Result<LoadedSchema> {
        let path = &self.settings.input;
        log::debug!("Reading schema document {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| AwtreeError::io(path, e))?;
        self.load_str(&content)
    }

    /// Resolve a schema document given as text
    pub fn load_str(&self, content: &str) -> Result<LoadedSchema> {
        let document = SchemaDocument::parse(content)?;
        let source = document.source()?;
        Ok(LoadedSchema {
            explicit: source.is_explicit(),
            database_count: document.database_count(),
            database: source.into_database(&self.settings.defaults),
        })
    }

    pub fn plan(&self, schema: &LoadedSchema) -> Result<ExportPlan> {
        ExportPlan::build(&schema.database, &self.settings.output_dir)
    }

    /// Load, plan and write in one go
    pub fn run(&self) -> Result<ExportReport> {
        let schema = self.load()?;
        let plan = self.plan(&schema)?;
        plan.apply()
    }
}
