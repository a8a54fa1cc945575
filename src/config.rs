//! YAML configuration file support.
//!
//! One file selects the policy, configures it, and sets the batch behavior of
//! the [`Pipeline`](crate::Pipeline):
//!
//! ```yaml
//! version: "1.0"
//! name: "glove preprocessing"
//!
//! policy: corpus_style          # standard | corpus_style | model_input
//!
//! tokenizer:                    # every field optional, see PolicyConfig
//!   language: "en"
//!   token_boundary_pattern: '\b\w+\b'
//!   lowercase: true
//!   remove_hashtags: false
//!   expand_contractions: true
//!   remove_lone_digits: false
//!   include_nested_content: false
//!   username_replacement: " "
//!   url_replacement: " "
//!   stopwords: ["rt", "via"]
//!
//! pipeline:
//!   include_nested_content: true  # overrides tokenizer.include_nested_content
//!   drop_empty: true
//!   parallel: true
//!   sample_size: 1000           # random subset per batch, omit for all
//! ```

use std::fs;
use std::path::Path;

use normalize::{PolicyConfig, PolicyKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PostnormConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub policy: PolicyKind,

    #[serde(default)]
    pub tokenizer: PolicyConfig,

    #[serde(default)]
    pub pipeline: PipelineYamlConfig,
}

impl PostnormConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: PostnormConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.tokenizer
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("tokenizer: {err}")))?;
        Ok(())
    }

    /// Whether nested quoted/reposted content is merged into the body.
    pub fn include_nested(&self) -> bool {
        self.pipeline
            .include_nested_content
            .unwrap_or(self.tokenizer.include_nested_content)
    }

    /// The tokenizer section with the pipeline override applied.
    pub fn policy_config(&self) -> PolicyConfig {
        self.tokenizer
            .clone()
            .with_include_nested_content(self.include_nested())
    }
}

impl Default for PostnormConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            policy: PolicyKind::default(),
            tokenizer: PolicyConfig::default(),
            pipeline: PipelineYamlConfig::default(),
        }
    }
}

/// Batch behavior of the pipeline driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineYamlConfig {
    #[serde(default)]
    pub include_nested_content: Option<bool>,

    /// Leave records with no tokens out of batch output.
    #[serde(default = "true_value")]
    pub drop_empty: bool,

    /// Spread batches over the rayon pool (needs the `parallel` feature).
    #[serde(default = "true_value")]
    pub parallel: bool,

    /// Tokenize a random subset of at most this many records per batch.
    #[serde(default)]
    pub sample_size: Option<usize>,
}

impl Default for PipelineYamlConfig {
    fn default() -> Self {
        Self {
            include_nested_content: None,
            drop_empty: true,
            parallel: true,
            sample_size: None,
        }
    }
}

fn true_value() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_yaml() {
        let yaml = r#"
version: "1.0"
name: "test config"
policy: model_input
tokenizer:
  remove_hashtags: true
"#;

        let config = PostnormConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.name, Some("test config".to_string()));
        assert_eq!(config.policy, PolicyKind::ModelInput);
        assert!(config.tokenizer.remove_hashtags);
        assert!(config.tokenizer.lowercase);
        assert!(config.pipeline.drop_empty);
    }

    #[test]
    fn test_load_from_file() {
        let yaml = r#"
version: "1"
policy: corpus_style
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let config = PostnormConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.policy, PolicyKind::CorpusStyle);
    }

    #[test]
    fn test_missing_file() {
        let result = PostnormConfig::from_file("/definitely/not/here/postnorm.yaml");
        assert!(matches!(result, Err(ConfigLoadError::FileRead(_))));
    }

    #[test]
    fn test_default_config() {
        let config = PostnormConfig::default();
        assert_eq!(config.version, "1.0");
        assert!(config.name.is_none());
        assert_eq!(config.policy, PolicyKind::Standard);
        assert!(!config.include_nested());
    }

    #[test]
    fn test_unsupported_version() {
        let result = PostnormConfig::from_yaml("version: \"2\"\n");
        assert!(matches!(result, Err(ConfigLoadError::UnsupportedVersion(v)) if v == "2"));
    }

    #[test]
    fn test_language_validation() {
        let yaml = r#"
version: "1.0"
tokenizer:
  language: "es"
"#;
        let err = PostnormConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Validation(_)));
        assert!(err.to_string().contains("unsupported language"));
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let result = PostnormConfig::from_yaml("version: \"1\"\npolicy: fancy\n");
        assert!(matches!(result, Err(ConfigLoadError::YamlParse(_))));
    }

    #[test]
    fn test_pipeline_overrides_nested_flag() {
        let yaml = r#"
version: "1.0"
tokenizer:
  include_nested_content: false
pipeline:
  include_nested_content: true
  drop_empty: false
"#;
        let config = PostnormConfig::from_yaml(yaml).unwrap();
        assert!(config.include_nested());
        assert!(config.policy_config().include_nested_content);
        assert!(!config.pipeline.drop_empty);
        assert!(config.pipeline.parallel);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = PostnormConfig {
            name: Some("roundtrip".into()),
            policy: PolicyKind::CorpusStyle,
            tokenizer: PolicyConfig::default().with_stopwords(["rt"]),
            ..PostnormConfig::default()
        };
        let yaml = config.to_yaml().unwrap();
        assert_eq!(PostnormConfig::from_yaml(&yaml).unwrap(), config);
    }
}
