//! Configuration management for vgen generation runs.
//!
//! This module defines the `Config` struct naming the inputs and outputs of a
//! run. The configuration can be loaded from a YAML file, created
//! programmatically, or assembled from command-line arguments.
//!
//! # Examples
//!
//! ```no_run
//! use vgen_core::config::Config;
//!
//! // Create a new config programmatically
//! let mut config = Config::new("library.model.json", "out");
//! config.api_config_path = Some("library_gapic.yaml".to_string());
//! config.languages = vec!["java".to_string(), "php".to_string()];
//! ```

// Internal imports (std, crate)
use std::path::Path;

use crate::languages::TargetLanguage;
use crate::Error;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Configuration for a vgen generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the serialized model (JSON or YAML)
    pub model_path: String,

    /// Optional path to the API config (YAML, JSON or TOML)
    #[serde(default)]
    pub api_config_path: Option<String>,

    /// Output directory for generated view models
    pub output_dir: String,

    /// Target languages to generate for
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
}

impl Config {
    /// Create a new Config with default values
    pub fn new(model_path: impl Into<String>, output_dir: impl Into<String>) -> Self {
        Self {
            model_path: model_path.into(),
            api_config_path: None,
            output_dir: output_dir.into(),
            languages: default_languages(),
        }
    }

    /// Load configuration from a file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Parse the configured language names
    pub fn target_languages(&self) -> crate::Result<Vec<TargetLanguage>> {
        self.languages
            .iter()
            .map(|name| name.parse::<TargetLanguage>().map_err(Error::config))
            .collect()
    }
}

fn default_languages() -> Vec<String> {
    vec![TargetLanguage::default().to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_config_roundtrip() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("vgen.yaml");

        let config = Config::new("library.model.json", "out");
        config.save(&file_path).await?;

        let loaded = Config::from_file(&file_path).await?;
        assert_eq!(loaded.model_path, "library.model.json");
        assert_eq!(loaded.output_dir, "out");
        assert_eq!(loaded.api_config_path, None);
        assert_eq!(loaded.languages, default_languages());

        Ok(())
    }

    #[tokio::test]
    async fn test_languages_default_when_missing() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("vgen.yaml");
        tokio::fs::write(&file_path, "model_path: m.yaml\noutput_dir: out\n").await?;

        let loaded = Config::from_file(&file_path).await?;
        assert_eq!(loaded.target_languages()?, vec![TargetLanguage::Java]);
        Ok(())
    }

    #[test]
    fn test_unknown_language_is_config_error() {
        let mut config = Config::new("m.json", "out");
        config.languages = vec!["cobol".to_string()];
        assert!(matches!(config.target_languages(), Err(Error::Config(_))));
    }
}
