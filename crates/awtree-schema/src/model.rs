//! Database, collection and record definitions

use awtree_core::{AwtreeError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An attribute or index definition, kept exactly as it appeared in the input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaRecord(Map<String, Value>);

impl SchemaRecord {
    /// The `key` field, if it is present and a string
    pub fn key(&self) -> Option<&str> {
        self.0.get("key").and_then(Value::as_str)
    }

    /// Like [`SchemaRecord::key`], but a missing key is an error
    pub fn require_key(&self, kind: &str, collection: &str) -> Result<&str> {
        self.key().ok_or_else(|| {
            AwtreeError::ValidationError(format!(
                "{} in collection '{}' has no string \"key\" field",
                kind, collection
            ))
        })
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// A collection: a named group of documents with attributes and indexes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    #[serde(rename = "$id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "documentSecurity", default)]
    pub document_security: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// `None` when the input omits the field or sets it to null
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
    #[serde(default)]
    pub attributes: Option<Vec<SchemaRecord>>,
    #[serde(default)]
    pub indexes: Option<Vec<SchemaRecord>>,
}

fn default_true() -> bool {
    true
}

impl Collection {
    /// The `collection.json` record for this collection
    pub fn manifest(&self) -> CollectionManifest {
        CollectionManifest {
            id: self.id.clone(),
            name: self.name.clone(),
            document_security: self.document_security,
            enabled: self.enabled,
            permissions: self.permissions.clone().unwrap_or_default(),
        }
    }

    pub fn attributes(&self) -> &[SchemaRecord] {
        self.attributes.as_deref().unwrap_or(&[])
    }

    pub fn indexes(&self) -> &[SchemaRecord] {
        self.indexes.as_deref().unwrap_or(&[])
    }
}

/// Contents of `collection.json`. Field order here is the output order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionManifest {
    #[serde(rename = "$id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "documentSecurity")]
    pub document_security: bool,
    pub enabled: bool,
    pub permissions: Vec<String>,
}

/// The database whose collections get exported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    #[serde(rename = "$id", default)]
    pub id: String,
    pub name: String,
    pub collections: Vec<Collection>,
}

impl Database {
    pub fn attribute_count(&self) -> usize {
        self.collections.iter().map(|c| c.attributes().len()).sum()
    }

    pub fn index_count(&self) -> usize {
        self.collections.iter().map(|c| c.indexes().len()).sum()
    }
}
