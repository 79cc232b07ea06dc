//! Export planning
//!
//! A plan lists every file the export will produce, in write order, with its
//! final contents. Building one touches no files, so validation failures
//! leave the output directory untouched.

use awtree_core::{AwtreeError, Result};
use awtree_schema::{validate_database, Collection, Database, SchemaRecord};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// What a planned file describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Collection,
    Attribute,
    Index,
}

impl FileKind {
    /// Subdirectory under the collection directory, if any
    fn subdir(self) -> Option<&'static str> {
        match self {
            FileKind::Collection => None,
            FileKind::Attribute => Some("attributes"),
            FileKind::Index => Some("indexes"),
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Collection => write!(f, "collection"),
            FileKind::Attribute => write!(f, "attribute"),
            FileKind::Index => write!(f, "index"),
        }
    }
}

/// A single file to write
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedFile {
    pub kind: FileKind,
    pub path: PathBuf,
    pub contents: String,
}

/// All files for one collection, `collection.json` first
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionPlan {
    pub name: String,
    pub dir: PathBuf,
    pub files: Vec<PlannedFile>,
}

impl CollectionPlan {
    fn build(collection: &Collection, collections_dir: &Path) -> Result<Self> {
        let dir = collections_dir.join(&collection.name);
        let mut files = vec![PlannedFile {
            kind: FileKind::Collection,
            path: dir.join("collection.json"),
            contents: to_pretty_json(&collection.manifest())?,
        }];

        for attribute in collection.attributes() {
            files.push(record_file(FileKind::Attribute, attribute, &collection.name, &dir)?);
        }
        for index in collection.indexes() {
            files.push(record_file(FileKind::Index, index, &collection.name, &dir)?);
        }

        Ok(Self {
            name: collection.name.clone(),
            dir,
            files,
        })
    }

    pub fn count(&self, kind: FileKind) -> usize {
        self.files.iter().filter(|f| f.kind == kind).count()
    }
}

fn record_file(
    kind: FileKind,
    record: &SchemaRecord,
    collection: &str,
    dir: &Path,
) -> Result<PlannedFile> {
    let key = record.require_key(&kind.to_string(), collection)?;
    let dir = match kind.subdir() {
        Some(subdir) => dir.join(subdir),
        None => dir.to_path_buf(),
    };
    Ok(PlannedFile {
        kind,
        path: dir.join(format!("{}.json", key)),
        contents: to_pretty_json(record)?,
    })
}

/// Every file an export will write, grouped by collection
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPlan {
    pub database_id: String,
    pub database_name: String,
    /// `{output_root}/databases/{database_name}`
    pub base_dir: PathBuf,
    pub collections: Vec<CollectionPlan>,
    pub warnings: Vec<String>,
}

impl ExportPlan {
    /// Validate `database` and lay out its files under `output_root`
    pub fn build(database: &Database, output_root: &Path) -> Result<Self> {
        let report = validate_database(database)?;
        for warning in &report.warnings {
            log::warn!("{}", warning);
        }

        let base_dir = output_root.join("databases").join(&database.name);
        let collections_dir = base_dir.join("collections");
        let collections = database
            .collections
            .iter()
            .map(|c| CollectionPlan::build(c, &collections_dir))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            database_id: database.id.clone(),
            database_name: database.name.clone(),
            base_dir,
            collections,
            warnings: report.warnings,
        })
    }

    /// All planned files in write order
    pub fn files(&self) -> impl Iterator<Item = &PlannedFile> {
        self.collections.iter().flat_map(|c| c.files.iter())
    }

    pub fn file_count(&self) -> usize {
        self.collections.iter().map(|c| c.files.len()).sum()
    }

    pub fn count(&self, kind: FileKind) -> usize {
        self.collections.iter().map(|c| c.count(kind)).sum()
    }
}

/// Serialize as pretty JSON with 4-space indentation and no trailing newline
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(|e| AwtreeError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn players_db() -> Database {
        serde_json::from_value(json!({
            "$id": "68d593d10031b4d7cb048",
            "name": "cricket_db",
            "collections": [{
                "$id": "c1",
                "name": "players",
                "documentSecurity": true,
                "enabled": true,
                "attributes": [{"key": "name", "type": "string"}],
                "indexes": []
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_pretty_json_uses_four_spaces() {
        let text = to_pretty_json(&json!({"key": "name", "list": [1]})).unwrap();
        assert_eq!(
            text,
            "{\n    \"key\": \"name\",\n    \"list\": [\n        1\n    ]\n}"
        );
    }

    #[test]
    fn test_pretty_json_empty_containers() {
        assert_eq!(to_pretty_json(&json!([])).unwrap(), "[]");
        assert_eq!(to_pretty_json(&json!({})).unwrap(), "{}");
    }

    #[test]
    fn test_plan_layout() {
        let plan = ExportPlan::build(&players_db(), Path::new("appwrite")).unwrap();
        let paths: Vec<PathBuf> = plan.files().map(|f| f.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("appwrite/databases/cricket_db/collections/players/collection.json"),
                PathBuf::from("appwrite/databases/cricket_db/collections/players/attributes/name.json"),
            ]
        );
        assert_eq!(plan.count(FileKind::Index), 0);
        assert_eq!(plan.file_count(), 2);
    }

    #[test]
    fn test_collection_manifest_contents() {
        let plan = ExportPlan::build(&players_db(), Path::new("appwrite")).unwrap();
        let manifest = &plan.collections[0].files[0];
        assert_eq!(manifest.kind, FileKind::Collection);
        assert_eq!(
            manifest.contents,
            "{\n    \"$id\": \"c1\",\n    \"name\": \"players\",\n    \"documentSecurity\": true,\n    \"enabled\": true,\n    \"permissions\": []\n}"
        );
    }

    #[test]
    fn test_attribute_written_verbatim() {
        let plan = ExportPlan::build(&players_db(), Path::new("appwrite")).unwrap();
        let attribute = &plan.collections[0].files[1];
        let value: serde_json::Value = serde_json::from_str(&attribute.contents).unwrap();
        assert_eq!(value, json!({"key": "name", "type": "string"}));
    }

    #[test]
    fn test_collections_keep_input_order() {
        let db: Database = serde_json::from_value(json!({
            "$id": "d",
            "name": "main",
            "collections": [
                {"$id": "z", "name": "zeta"},
                {"$id": "a", "name": "alpha"}
            ]
        }))
        .unwrap();
        let plan = ExportPlan::build(&db, Path::new("out")).unwrap();
        let names: Vec<&str> = plan.collections.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_invalid_key_fails_planning() {
        let db: Database = serde_json::from_value(json!({
            "$id": "d",
            "name": "main",
            "collections": [{"$id": "c", "name": "players", "indexes": [{"key": "../x"}]}]
        }))
        .unwrap();
        assert!(matches!(
            ExportPlan::build(&db, Path::new("out")),
            Err(AwtreeError::ValidationError(_))
        ));
    }
}
