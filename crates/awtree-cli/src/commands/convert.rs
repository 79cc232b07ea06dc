//! Schema conversion command

use anyhow::{Context, Result};
use awtree_export::{AwtreeConfig, ExportPlan, ExportSettings, SchemaExporter};
use std::path::PathBuf;

pub struct ConvertArgs {
    pub input: Option<String>,
    pub output: Option<String>,
    pub database_id: Option<String>,
    pub database_name: Option<String>,
    pub dry_run: bool,
}

pub fn run(args: ConvertArgs) -> Result<()> {
    let config = AwtreeConfig::load().context("Failed to load configuration")?;
    let settings = apply_flags(config.export, &args);
    export(settings, args.dry_run)
}

/// Convert with fully resolved settings; writes nothing when `dry_run` is set
pub fn export(settings: ExportSettings, dry_run: bool) -> Result<()> {
    let exporter = SchemaExporter::new(settings);

    println!("Reading {}...", exporter.settings().input.display());
    let schema = exporter.load()?;

    if schema.explicit {
        println!("Found \"databases\" array structure.");
        if schema.database_count > 1 {
            println!(
                "Note: {} databases listed; exporting only the first.",
                schema.database_count
            );
        }
    } else {
        println!("Found top-level \"collections\" array. Using default database info.");
    }

    let plan = exporter.plan(&schema)?;
    println!("Preparing directory for database: {}", plan.database_name);

    if dry_run {
        print_plan(&plan);
        return Ok(());
    }

    let report = plan.apply_with(|collection| {
        println!("  -> Processing collection: {}", collection.name);
    })?;

    println!("\n✅ Conversion successful!");
    println!(
        "Wrote {} file(s): {} collection(s), {} attribute(s), {} index(es).",
        report.files_written(),
        report.collections,
        report.attributes,
        report.indexes
    );
    println!(
        "The \"{}\" folder is now ready.",
        exporter.settings().output_dir.display()
    );
    println!("You can now run \"appwrite push\" to deploy your schema.");

    Ok(())
}

fn apply_flags(mut settings: ExportSettings, args: &ConvertArgs) -> ExportSettings {
    if let Some(input) = &args.input {
        settings.input = PathBuf::from(input);
    }
    if let Some(output) = &args.output {
        settings.output_dir = PathBuf::from(output);
    }
    if let Some(id) = &args.database_id {
        settings.defaults.id = id.clone();
    }
    if let Some(name) = &args.database_name {
        settings.defaults.name = name.clone();
    }
    settings
}

fn print_plan(plan: &ExportPlan) {
    println!("Dry run: {} file(s) would be written.", plan.file_count());
    for collection in &plan.collections {
        println!("  -> Collection: {}", collection.name);
        for file in &collection.files {
            println!("     [{}] {}", file.kind, file.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ConvertArgs {
        ConvertArgs {
            input: None,
            output: None,
            database_id: None,
            database_name: None,
            dry_run: false,
        }
    }

    #[test]
    fn test_flags_override_settings() {
        let settings = apply_flags(
            ExportSettings::default(),
            &ConvertArgs {
                input: Some("schema.json".to_string()),
                database_name: Some("league_db".to_string()),
                ..args()
            },
        );
        assert_eq!(settings.input, PathBuf::from("schema.json"));
        assert_eq!(settings.output_dir, PathBuf::from("appwrite"));
        assert_eq!(settings.defaults.name, "league_db");
        assert_eq!(settings.defaults.id, "68d593d10031b4d7cb048");
    }

    fn temp_settings() -> (PathBuf, ExportSettings) {
        let root = std::env::temp_dir().join(format!("awtree_convert_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&root).unwrap();
        let input = root.join("appwrite.json");
        std::fs::write(
            &input,
            r#"{"collections":[{"$id":"c1","name":"players","attributes":[{"key":"name","type":"string"}]}]}"#,
        )
        .unwrap();
        let settings = ExportSettings {
            input,
            output_dir: root.join("appwrite"),
            ..ExportSettings::default()
        };
        (root, settings)
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let (root, settings) = temp_settings();
        export(settings, true).unwrap();
        assert!(!root.join("appwrite").exists());
        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_export_writes_tree() {
        let (root, settings) = temp_settings();
        export(settings, false).unwrap();
        let players = root.join("appwrite/databases/cricket_db/collections/players");
        assert!(players.join("collection.json").is_file());
        assert!(players.join("attributes/name.json").is_file());
        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_no_flags_keep_settings() {
        let settings = apply_flags(ExportSettings::default(), &args());
        assert_eq!(settings, ExportSettings::default());
    }
}
