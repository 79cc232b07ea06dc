//! awtree Export - Schema document to directory tree
//!
//! Turns a resolved [`awtree_schema::Database`] into an [`ExportPlan`] (every
//! file with its final contents) and applies it to disk. Also hosts the
//! layered configuration and the manual field instructions.

pub mod config;
mod exporter;
pub mod instructions;
mod plan;
mod writer;

pub use config::{AwtreeConfig, ExportSettings};
pub use exporter::{LoadedSchema, SchemaExporter};
pub use instructions::{check_marker, InstructionSet, MarkerStatus, PendingField};
pub use plan::{to_pretty_json, CollectionPlan, ExportPlan, FileKind, PlannedFile};
pub use writer::ExportReport;
