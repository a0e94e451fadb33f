//! Configuration for subtype classification

use crate::error::{Result, SubtypeError};
use crate::subtype::{SubtypeRegistry, SubtypeSpec};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default file name of the subtype configuration.
pub const CONFIG_FILE_NAME: &str = "subtypes.toml";

/// Subtype definitions, in precedence order.
///
/// ```toml
/// [[subtypes]]
/// name = "bank_statements"
/// file_format = "csv"
/// rules = { name = '^statement_.*\.csv$', directories = "!DIRS!/bank" }
/// csv = { first_row = 1, columns = ["date", "amount"] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    #[serde(default)]
    pub subtypes: Vec<SubtypeSpec>,
}

impl IngestConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| SubtypeError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| SubtypeError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Compile every subtype.
    pub fn registry(&self) -> Result<SubtypeRegistry> {
        SubtypeRegistry::from_specs(self.subtypes.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleSpec;
    use crate::subtype::CsvLayout;

    const SAMPLE: &str = r#"
[[subtypes]]
name = "bank_statements"
rules = { name = '^statement_.*\.csv$', directories = "!DIRS!/bank" }
csv = { first_row = 1, columns = ["date", "amount"] }

[[subtypes]]
name = "any_csv"
file_format = "csv"

[subtypes.rules]
name = '.*\.csv$'
directories = "!DIRS!"
"#;

    #[test]
    fn test_parse_sample() {
        let config = IngestConfig::from_toml(SAMPLE).unwrap();
        assert_eq!(config.subtypes.len(), 2);

        let first = &config.subtypes[0];
        assert_eq!(first.file_format, "csv");
        assert_eq!(
            first.rules,
            RuleSpec::new(Some(r"^statement_.*\.csv$"), Some("!DIRS!/bank"))
        );
        assert_eq!(
            first.csv,
            Some(CsvLayout {
                first_row: 1,
                columns: vec!["date".to_string(), "amount".to_string()],
            })
        );

        let registry = config.registry().unwrap();
        assert_eq!(registry.names(), vec!["bank_statements", "any_csv"]);
    }

    #[test]
    fn test_empty_config() {
        let config = IngestConfig::from_toml("").unwrap();
        assert!(config.subtypes.is_empty());
        assert!(config.registry().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_toml() {
        let err = IngestConfig::from_toml("[[subtypes]]\nname = 3").unwrap_err();
        assert!(matches!(err, SubtypeError::Config(_)));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let config = IngestConfig::from_toml(SAMPLE).unwrap();
        config.save(&path).unwrap();
        let loaded = IngestConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = IngestConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, SubtypeError::Io(_)));
    }
}
