use crate::domain::funcdef::TypeField;
use crate::infrastructure::preprocessor::PreprocessorSettings;
use crate::ports::report_exporter::OutputFormat;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Settings loaded from a `--config` TOML file. Every section and key is
/// optional; command-line flags are applied on top.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub preprocessor: PreprocessorSettings,
    pub report: ReportSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub format: OutputFormat,
    pub type_field: TypeField,
    /// Skip definitions that come from included files.
    pub main_file_only: bool,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
