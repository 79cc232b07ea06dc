//! Manual field instructions and the "was the schema edited" check
//!
//! Some attribute changes are applied by hand in the Appwrite console. This
//! module renders the steps for that and checks whether the schema document
//! already mentions the new fields.

use awtree_core::{AwtreeError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// An attribute that still has to be added through the console
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default: Option<String>,
}

impl PendingField {
    pub fn new(name: &str, field_type: &str, default: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            field_type: field_type.to_string(),
            required: false,
            default: default.map(str::to_string),
        }
    }
}

/// Everything needed to render the console instructions
#[derive(Debug, Clone, PartialEq)]
pub struct InstructionSet {
    pub console_url: String,
    pub database: String,
    pub collection: String,
    pub fields: Vec<PendingField>,
    /// Substring searched for in the schema document; defaults to the first field name
    pub marker: Option<String>,
    /// Directory the Appwrite CLI alternative is run from
    pub output_dir: PathBuf,
    /// What to do once the fields exist, completing "After adding all N attributes, ..."
    pub retry_hint: String,
}

impl Default for InstructionSet {
    fn default() -> Self {
        Self {
            console_url: "https://fra.cloud.appwrite.io".to_string(),
            database: "cricket_db".to_string(),
            collection: "team_points".to_string(),
            fields: vec![
                PendingField::new("totalRunsScored", "Integer", Some("0")),
                PendingField::new("totalOversFaced", "Double", Some("0.0")),
                PendingField::new("totalRunsConceded", "Integer", Some("0")),
                PendingField::new("totalOversBowled", "Double", Some("0.0")),
            ],
            marker: None,
            output_dir: PathBuf::from("appwrite"),
            retry_hint: "try creating a group again".to_string(),
        }
    }
}

impl InstructionSet {
    pub fn marker(&self) -> Option<&str> {
        self.marker
            .as_deref()
            .or_else(|| self.fields.first().map(|f| f.name.as_str()))
    }

    /// Render the operator instructions for `schema_file` as plain text
    pub fn render(&self, schema_file: &Path) -> String {
        let mut out = format!("✅ Schema updated in {}\n\n", schema_file.display());
        out.push_str("To complete the update:\n\n");
        out.push_str(&format!("1. Go to Appwrite Console: {}\n", self.console_url));
        out.push_str(&format!(
            "2. Navigate to: Databases → {} → {}\n",
            self.database, self.collection
        ));

        if self.fields.is_empty() {
            out.push_str("3. No pending fields are configured for this collection.\n");
        } else {
            out.push_str("3. Click \"Add Attribute\" and add the following fields:\n\n");
            for (i, field) in self.fields.iter().enumerate() {
                out.push_str(&format!("   Field {}: {}\n", i + 1, field.name));
                out.push_str(&format!("   - Type: {}\n", field.field_type));
                out.push_str(&format!(
                    "   - Required: {}\n",
                    if field.required { "Yes" } else { "No" }
                ));
                if let Some(default) = &field.default {
                    out.push_str(&format!("   - Default: {}\n", default));
                }
                out.push('\n');
            }
            let noun = if self.fields.len() == 1 { "attribute" } else { "attributes" };
            out.push_str(&format!(
                "4. After adding all {} {}, {}.\n",
                self.fields.len(),
                noun,
                self.retry_hint
            ));
        }

        out.push_str("\nAlternative: If you have Appwrite CLI installed, run:\n");
        out.push_str(&format!("  cd {}\n", self.output_dir.display()));
        out.push_str(&format!("  appwrite deploy collection {}\n", self.collection));
        out
    }
}

/// Whether the marker text was found in the schema document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStatus {
    Present,
    Missing,
}

impl MarkerStatus {
    pub fn is_present(self) -> bool {
        self == MarkerStatus::Present
    }
}

/// Read `path` as text and look for `marker` anywhere in it
pub fn check_marker(path: &Path, marker: &str) -> Result<MarkerStatus> {
    let content = std::fs::read_to_string(path).map_err(|e| AwtreeError::io(path, e))?;
    if content.contains(marker) {
        Ok(MarkerStatus::Present)
    } else {
        Ok(MarkerStatus::Missing)
    }
}
