//! Validation of identifiers that become directory and file names

use crate::model::{Database, SchemaRecord};
use awtree_core::{AwtreeError, Result};
use std::collections::HashSet;

/// Non-fatal findings from [`validate_database`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub warnings: Vec<String>,
}

/// Check that `value` can be used as a single path component
pub fn validate_identifier(kind: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(AwtreeError::ValidationError(format!("{} name is empty", kind)));
    }
    if value == "." || value == ".." {
        return Err(AwtreeError::ValidationError(format!(
            "{} name '{}' is not a valid path component",
            kind, value
        )));
    }
    if let Some(c) = value
        .chars()
        .find(|c| *c == '/' || *c == '\\' || c.is_control())
    {
        return Err(AwtreeError::ValidationError(format!(
            "{} name '{}' contains forbidden character {:?}",
            kind,
            value.escape_debug(),
            c
        )));
    }
    Ok(())
}

/// Validate every name and key in a database before anything is written
pub fn validate_database(database: &Database) -> Result<ValidationReport> {
    let mut report = ValidationReport::default();
    validate_identifier("database", &database.name)?;

    let mut seen_collections = HashSet::new();
    for collection in &database.collections {
        validate_identifier("collection", &collection.name)?;
        if !seen_collections.insert(collection.name.as_str()) {
            report.warnings.push(format!(
                "collection '{}' appears more than once; later definitions overwrite earlier files",
                collection.name
            ));
        }

        check_records(
            "attribute",
            &collection.name,
            collection.attributes(),
            &mut report,
        )?;
        check_records("index", &collection.name, collection.indexes(), &mut report)?;
    }

    Ok(report)
}

fn check_records(
    kind: &str,
    collection: &str,
    records: &[SchemaRecord],
    report: &mut ValidationReport,
) -> Result<()> {
    let mut seen = HashSet::new();
    for record in records {
        let key = record.require_key(kind, collection)?;
        validate_identifier(kind, key)?;
        if !seen.insert(key) {
            report.warnings.push(format!(
                "{} '{}' in collection '{}' appears more than once; the last definition wins",
                kind, key, collection
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn database(value: serde_json::Value) -> Database {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_valid_identifiers() {
        assert!(validate_identifier("collection", "players").is_ok());
        assert!(validate_identifier("attribute", "total_runs-2024").is_ok());
        assert!(validate_identifier("index", "idx.name").is_ok());
    }

    #[test]
    fn test_rejects_unsafe_identifiers() {
        for bad in ["", ".", "..", "a/b", "a\\b", "nul\0byte", "line\nbreak"] {
            let err = validate_identifier("collection", bad).unwrap_err();
            assert!(
                matches!(err, AwtreeError::ValidationError(_)),
                "expected rejection of {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_database_with_traversal_collection() {
        let db = database(json!({
            "$id": "d",
            "name": "main",
            "collections": [{"$id": "c", "name": "../escape"}]
        }));
        assert!(validate_database(&db).is_err());
    }

    #[test]
    fn test_attribute_without_key() {
        let db = database(json!({
            "$id": "d",
            "name": "main",
            "collections": [{"$id": "c", "name": "players", "attributes": [{"type": "string"}]}]
        }));
        let err = validate_database(&db).unwrap_err();
        assert!(err.to_string().contains("attribute in collection 'players'"));
    }

    #[test]
    fn test_duplicate_keys_warn() {
        let db = database(json!({
            "$id": "d",
            "name": "main",
            "collections": [{
                "$id": "c",
                "name": "players",
                "attributes": [{"key": "name"}, {"key": "name"}],
                "indexes": [{"key": "by_name"}]
            }]
        }));
        let report = validate_database(&db).unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("attribute 'name'"));
    }

    #[test]
    fn test_clean_database() {
        let db = database(json!({
            "$id": "d",
            "name": "main",
            "collections": [{"$id": "c", "name": "players", "indexes": [{"key": "by_name"}]}]
        }));
        assert!(validate_database(&db).unwrap().warnings.is_empty());
    }
}
