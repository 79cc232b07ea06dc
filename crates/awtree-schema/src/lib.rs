//! awtree Schema - Appwrite schema document model
//!
//! This crate parses an `appwrite.json` document, resolves which of its two
//! supported shapes is present, and validates the identifiers that later
//! become directory and file names.

mod document;
mod model;
mod validation;

pub use document::{
    DatabaseDefaults, DatabaseSource, SchemaDocument, DEFAULT_DATABASE_ID, DEFAULT_DATABASE_NAME,
};
pub use model::{Collection, CollectionManifest, Database, SchemaRecord};
pub use validation::{validate_database, validate_identifier, ValidationReport};
