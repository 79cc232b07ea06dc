//! Top-level schema document and shape resolution
//!
//! An `appwrite.json` document comes in one of two shapes:
//! - `{"databases": [{"$id", "name", "collections": [...]}, ...]}`
//! - `{"collections": [...]}` with no database wrapper
//!
//! Both normalize to a single [`Database`].

use crate::model::{Collection, Database};
use awtree_core::{AwtreeError, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Identifier and name used when the document has no `databases` wrapper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseDefaults {
    pub id: String,
    pub name: String,
}

pub const DEFAULT_DATABASE_ID: &str = "68d593d10031b4d7cb048";
pub const DEFAULT_DATABASE_NAME: &str = "cricket_db";

impl Default for DatabaseDefaults {
    fn default() -> Self {
        Self {
            id: DEFAULT_DATABASE_ID.to_string(),
            name: DEFAULT_DATABASE_NAME.to_string(),
        }
    }
}

/// Where the exported database came from
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseSource {
    /// First entry of a non-empty `databases` array
    Explicit(Database),
    /// Top-level `collections` array, to be wrapped in a default database
    Implicit(Vec<Collection>),
}

impl DatabaseSource {
    pub fn is_explicit(&self) -> bool {
        matches!(self, DatabaseSource::Explicit(_))
    }

    pub fn into_database(self, defaults: &DatabaseDefaults) -> Database {
        match self {
            DatabaseSource::Explicit(database) => database,
            DatabaseSource::Implicit(collections) => Database {
                id: defaults.id.clone(),
                name: defaults.name.clone(),
                collections,
            },
        }
    }
}

/// On-disk format of one `databases` entry
#[derive(Debug, Deserialize)]
struct DatabaseDefinition {
    #[serde(rename = "$id", default)]
    id: String,
    name: String,
    #[serde(default)]
    collections: Option<Vec<Collection>>,
}

/// A parsed schema document whose shape has not been resolved yet
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    databases: Vec<Value>,
    collections: Option<Value>,
}

impl SchemaDocument {
    /// Parse a document from JSON text
    pub fn parse(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let mut root = match value {
            Value::Object(map) => map,
            other => {
                return Err(AwtreeError::SchemaShapeError(format!(
                    "expected a JSON object at the top level, found {}",
                    json_type_name(&other)
                )))
            }
        };

        let databases = match take_non_null(&mut root, "databases") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                log::debug!(
                    "Ignoring \"databases\": expected an array, found {}",
                    json_type_name(&other)
                );
                Vec::new()
            }
            None => Vec::new(),
        };
        let collections = take_non_null(&mut root, "collections");

        Ok(Self {
            databases,
            collections,
        })
    }

    /// Number of entries in the `databases` array
    pub fn database_count(&self) -> usize {
        self.databases.len()
    }

    /// Decide which shape this document uses
    pub fn source(&self) -> Result<DatabaseSource> {
        if let Some(first) = self.databases.first() {
            if self.databases.len() > 1 {
                log::debug!(
                    "Document lists {} databases; only the first is exported",
                    self.databases.len()
                );
            }
            let def: DatabaseDefinition = serde_json::from_value(first.clone())
                .map_err(|e| AwtreeError::ParseError(format!("invalid database entry: {}", e)))?;
            let collections = def.collections.ok_or_else(|| {
                AwtreeError::SchemaShapeError(format!(
                    "database '{}' has no \"collections\" key",
                    def.name
                ))
            })?;
            return Ok(DatabaseSource::Explicit(Database {
                id: def.id,
                name: def.name,
                collections,
            }));
        }

        match &self.collections {
            Some(Value::Array(items)) => {
                let collections: Vec<Collection> =
                    serde_json::from_value(Value::Array(items.clone())).map_err(|e| {
                        AwtreeError::ParseError(format!("invalid collections: {}", e))
                    })?;
                return Ok(DatabaseSource::Implicit(collections));
            }
            Some(other) => {
                return Err(AwtreeError::SchemaShapeError(format!(
                    "\"collections\" must be an array, found {}",
                    json_type_name(other)
                )))
            }
            None => {}
        }

        Err(AwtreeError::SchemaShapeError(
            "neither databases nor collections key found".to_string(),
        ))
    }
}

fn take_non_null(map: &mut Map<String, Value>, key: &str) -> Option<Value> {
    match map.remove(key) {
        Some(Value::Null) | None => None,
        Some(value) => Some(value),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
