//! Layered configuration system
//!
//! Config is loaded with four layers of precedence (highest wins):
//! 1. Command-line flags (applied by the CLI on top of the loaded config)
//! 2. Environment variables: `AWTREE_INPUT`, `AWTREE_OUTPUT_DIR`,
//!    `AWTREE_DEFAULT_DATABASE_ID`, `AWTREE_DEFAULT_DATABASE_NAME`
//! 3. Project-local: `.awtree/config.toml`
//! 4. Global: `~/.awtree/config.toml`

use crate::instructions::{InstructionSet, PendingField};
use awtree_core::{AwtreeError, Result};
use awtree_schema::DatabaseDefaults;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT: &str = "appwrite.json";
pub const DEFAULT_OUTPUT_DIR: &str = "appwrite";

/// `[export]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportSection {
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub output_dir: Option<String>,
}

/// `[defaults]` section: database used for the top-level `collections` shape
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsSection {
    #[serde(default)]
    pub database_id: Option<String>,
    #[serde(default)]
    pub database_name: Option<String>,
}

/// `[instructions]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstructionsSection {
    #[serde(default)]
    pub console_url: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub collection: Option<String>,
    #[serde(default)]
    pub marker: Option<String>,
    #[serde(default)]
    pub retry_hint: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<PendingField>>,
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwtreeConfigFile {
    #[serde(default)]
    pub export: ExportSection,
    #[serde(default)]
    pub defaults: DefaultsSection,
    #[serde(default)]
    pub instructions: InstructionsSection,
}

/// Where the exporter reads from and writes to
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub defaults: DatabaseDefaults,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            defaults: DatabaseDefaults::default(),
        }
    }
}

/// Resolved configuration with environment variable overrides applied
#[derive(Debug, Clone, Default)]
pub struct AwtreeConfig {
    pub export: ExportSettings,
    pub instructions: InstructionSet,
}

impl AwtreeConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let mut config = AwtreeConfigFile::default();

        // Layer 1: Global config (~/.awtree/config.toml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                Self::merge_into(&mut config, global);
            }
        }

        // Layer 2: Project-local config (.awtree/config.toml)
        let local_path = PathBuf::from(".awtree/config.toml");
        if local_path.exists() {
            let local = Self::load_file(&local_path)?;
            Self::merge_into(&mut config, local);
        }

        // Layer 3: Environment variable overrides
        Self::apply_env_overrides(&mut config, |name| std::env::var(name).ok());

        Ok(Self::resolve(config))
    }

    /// Load config from a specific file path only, with the given env lookup
    pub fn load_from_file<F>(path: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::load_file(path)?;
        Self::apply_env_overrides(&mut config, env);
        Ok(Self::resolve(config))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".awtree").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<AwtreeConfigFile> {
        let content = std::fs::read_to_string(path).map_err(|e| AwtreeError::io(path, e))?;
        let config: AwtreeConfigFile = toml::from_str(&content).map_err(|e| {
            AwtreeError::ConfigError(format!("Failed to parse config {}: {}", path.display(), e))
        })?;
        Ok(config)
    }

    fn merge_into(base: &mut AwtreeConfigFile, overlay: AwtreeConfigFile) {
        fn take<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        take(&mut base.export.input, overlay.export.input);
        take(&mut base.export.output_dir, overlay.export.output_dir);
        take(&mut base.defaults.database_id, overlay.defaults.database_id);
        take(&mut base.defaults.database_name, overlay.defaults.database_name);

        let instructions = &mut base.instructions;
        take(&mut instructions.console_url, overlay.instructions.console_url);
        take(&mut instructions.database, overlay.instructions.database);
        take(&mut instructions.collection, overlay.instructions.collection);
        take(&mut instructions.marker, overlay.instructions.marker);
        take(&mut instructions.retry_hint, overlay.instructions.retry_hint);
        take(&mut instructions.fields, overlay.instructions.fields);
    }

    fn apply_env_overrides<F>(config: &mut AwtreeConfigFile, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(input) = env("AWTREE_INPUT") {
            config.export.input = Some(input);
        }
        if let Some(output_dir) = env("AWTREE_OUTPUT_DIR") {
            config.export.output_dir = Some(output_dir);
        }
        if let Some(id) = env("AWTREE_DEFAULT_DATABASE_ID") {
            config.defaults.database_id = Some(id);
        }
        if let Some(name) = env("AWTREE_DEFAULT_DATABASE_NAME") {
            config.defaults.database_name = Some(name);
        }
    }

    fn resolve(file: AwtreeConfigFile) -> Self {
        let base = ExportSettings::default();
        let export = ExportSettings {
            input: file.export.input.map(PathBuf::from).unwrap_or(base.input),
            output_dir: file
                .export
                .output_dir
                .map(PathBuf::from)
                .unwrap_or(base.output_dir),
            defaults: DatabaseDefaults {
                id: file.defaults.database_id.unwrap_or(base.defaults.id),
                name: file.defaults.database_name.unwrap_or(base.defaults.name),
            },
        };

        let mut instructions = InstructionSet::default();
        let section = file.instructions;
        if let Some(url) = section.console_url {
            instructions.console_url = url;
        }
        // The console navigation path follows the exported database unless overridden
        instructions.database = section
            .database
            .unwrap_or_else(|| export.defaults.name.clone());
        if let Some(collection) = section.collection {
            instructions.collection = collection;
        }
        if let Some(hint) = section.retry_hint {
            instructions.retry_hint = hint;
        }
        if let Some(fields) = section.fields {
            instructions.fields = fields;
        }
        instructions.marker = section.marker;
        instructions.output_dir = export.output_dir.clone();

        AwtreeConfig {
            export,
            instructions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn temp_config(content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("awtree_config_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    fn cleanup(path: &Path) {
        std::fs::remove_file(path).ok();
        std::fs::remove_dir(path.parent().unwrap()).ok();
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_load_config_from_file() {
        let config_str = r#"
[export]
input = "schema/appwrite.json"
output_dir = "build/appwrite"

[defaults]
database_name = "league_db"

[instructions]
collection = "matches"
retry_hint = "reload the fixtures"

[[instructions.fields]]
name = "venue"
type = "String"
required = true
"#;
        let path = temp_config(config_str);
        let config = AwtreeConfig::load_from_file(&path, no_env).unwrap();

        assert_eq!(config.export.input, PathBuf::from("schema/appwrite.json"));
        assert_eq!(config.export.output_dir, PathBuf::from("build/appwrite"));
        assert_eq!(config.export.defaults.name, "league_db");
        assert_eq!(config.export.defaults.id, "68d593d10031b4d7cb048");
        assert_eq!(config.instructions.collection, "matches");
        assert_eq!(config.instructions.retry_hint, "reload the fixtures");
        assert_eq!(config.instructions.database, "league_db");
        assert_eq!(config.instructions.fields.len(), 1);
        assert!(config.instructions.fields[0].required);
        assert_eq!(config.instructions.marker(), Some("venue"));

        cleanup(&path);
    }

    #[test]
    fn test_env_var_override() {
        let path = temp_config("[defaults]\ndatabase_id = \"from-file\"\n");
        let env: HashMap<&str, &str> = [
            ("AWTREE_DEFAULT_DATABASE_ID", "from-env"),
            ("AWTREE_OUTPUT_DIR", "env-out"),
        ]
        .into_iter()
        .collect();

        let config =
            AwtreeConfig::load_from_file(&path, |k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.export.defaults.id, "from-env");
        assert_eq!(config.export.output_dir, PathBuf::from("env-out"));
        assert_eq!(config.instructions.output_dir, PathBuf::from("env-out"));

        cleanup(&path);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let path = temp_config("");
        let config = AwtreeConfig::load_from_file(&path, no_env).unwrap();
        assert_eq!(config.export, ExportSettings::default());
        assert_eq!(config.instructions.collection, "team_points");
        assert_eq!(config.instructions.fields.len(), 4);
        cleanup(&path);
    }

    #[test]
    fn test_merge_overlay_wins() {
        let mut base = AwtreeConfigFile::default();
        base.export.input = Some("global.json".to_string());
        base.defaults.database_name = Some("global_db".to_string());

        let mut overlay = AwtreeConfigFile::default();
        overlay.export.input = Some("project.json".to_string());

        AwtreeConfig::merge_into(&mut base, overlay);
        assert_eq!(base.export.input.as_deref(), Some("project.json"));
        assert_eq!(base.defaults.database_name.as_deref(), Some("global_db"));
    }

    #[test]
    fn test_malformed_config() {
        let path = temp_config("[export\ninput = ");
        let err = AwtreeConfig::load_from_file(&path, no_env).unwrap_err();
        assert_eq!(err.kind(), "ConfigError");
        cleanup(&path);
    }
}
