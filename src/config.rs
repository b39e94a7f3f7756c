//! YAML configuration for the matching service.
//!
//! Everything the engine reads at runtime (store endpoint, cache TTL,
//! default matching options, the default category set) can be defined in a
//! single YAML file and loaded at startup.
//!
//! ## Example
//!
//! ```yaml
//! version: "1.0"
//! name: "production"
//!
//! store:
//!   base_url: "https://tags.internal.example.com"
//!   auth_header: "Bearer SERVICE_TOKEN"
//!   timeout_secs: 30
//!
//! cache:
//!   ttl_secs: 300
//!
//! matching:
//!   min_confidence: 0.7
//!   enable_fuzzy_matching: true
//!   enable_synonym_matching: true
//!   max_results: 5
//!
//! categories:
//!   - colors
//!   - material_types
//!   - finishes
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::service::DEFAULT_CATEGORIES;
use crate::types::MatchingOptions;

/// Errors that can occur when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration for the matching service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MatcherConfig {
    /// Configuration format version.
    pub version: String,

    /// Optional configuration name/description.
    #[serde(default)]
    pub name: Option<String>,

    /// Backing store connection settings.
    #[serde(default)]
    pub store: StoreSettings,

    /// Category cache settings.
    #[serde(default)]
    pub cache: CacheSettings,

    /// Default per-request matching options.
    #[serde(default)]
    pub matching: MatchingSettings,

    /// Categories used by the default multi-category fan-out.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

impl MatcherConfig {
    /// Load a YAML configuration file from the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: MatcherConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigError::UnsupportedVersion(v.to_string())),
        }?;

        self.store.validate()?;
        self.cache.validate()?;
        self.matching.validate()?;

        if self.categories.is_empty() {
            return Err(ConfigError::Validation(
                "categories must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            store: StoreSettings::default(),
            cache: CacheSettings::default(),
            matching: MatchingSettings::default(),
            categories: default_categories(),
        }
    }
}

/// Backing store connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub auth_header: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl StoreSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store.base_url must not be empty".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "store.timeout_secs must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(feature = "http-store")]
impl StoreSettings {
    /// The [`HttpStoreConfig`](crate::store::HttpStoreConfig) these
    /// settings describe.
    pub fn to_http_config(&self) -> crate::store::HttpStoreConfig {
        crate::store::HttpStoreConfig {
            base_url: self.base_url.clone(),
            auth_header: self.auth_header.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_header: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Category cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Seconds a cached category listing stays valid.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl CacheSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.ttl_secs == 0 {
            return Err(ConfigError::Validation(
                "cache.ttl_secs must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

/// Default per-request matching options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,

    #[serde(default = "true_value")]
    pub enable_fuzzy_matching: bool,

    #[serde(default = "true_value")]
    pub enable_synonym_matching: bool,

    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl MatchingSettings {
    /// The [`MatchingOptions`] these settings describe.
    pub fn to_options(&self) -> MatchingOptions {
        MatchingOptions {
            min_confidence: self.min_confidence,
            enable_fuzzy_matching: self.enable_fuzzy_matching,
            enable_synonym_matching: self.enable_synonym_matching,
            max_results: self.max_results,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.to_options()
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))
    }
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            enable_fuzzy_matching: true,
            enable_synonym_matching: true,
            max_results: default_max_results(),
        }
    }
}

// Helper functions for serde defaults
fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_ttl_secs() -> u64 {
    300
}
fn default_min_confidence() -> f32 {
    0.7
}
fn default_max_results() -> usize {
    5
}
fn true_value() -> bool {
    true
}
fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn load_valid_yaml() {
        let yaml = r#"
version: "1.0"
name: "test config"
store:
  base_url: "https://tags.test"
cache:
  ttl_secs: 60
matching:
  min_confidence: 0.8
  max_results: 3
"#;

        let config = MatcherConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.name, Some("test config".to_string()));
        assert_eq!(config.store.base_url, "https://tags.test");
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.matching.min_confidence, 0.8);
        assert_eq!(config.matching.max_results, 3);
        // Unspecified sections keep their defaults.
        assert!(config.matching.enable_fuzzy_matching);
        assert_eq!(config.categories, default_categories());
    }

    #[test]
    fn load_from_file() {
        let yaml = r#"
version: "1.0"
cache:
  ttl_secs: 120
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let config = MatcherConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.cache.ttl_secs, 120);
    }

    #[test]
    fn default_config_is_valid() {
        let config = MatcherConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache.ttl_secs, 300);
        assert_eq!(config.categories.len(), 5);
    }

    #[test]
    fn unsupported_version_rejected() {
        let result = MatcherConfig::from_yaml("version: \"2.0\"");
        assert!(matches!(result, Err(ConfigError::UnsupportedVersion(_))));
    }

    #[test]
    fn zero_ttl_rejected() {
        let yaml = r#"
version: "1.0"
cache:
  ttl_secs: 0
"#;
        let result = MatcherConfig::from_yaml(yaml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("ttl_secs"));
    }

    #[test]
    fn invalid_matching_defaults_rejected() {
        let yaml = r#"
version: "1.0"
matching:
  min_confidence: 1.5
"#;
        let result = MatcherConfig::from_yaml(yaml);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("min_confidence")
        );
    }

    #[test]
    fn empty_categories_rejected() {
        let yaml = r#"
version: "1.0"
categories: []
"#;
        let result = MatcherConfig::from_yaml(yaml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("categories"));
    }

    #[cfg(feature = "http-store")]
    #[test]
    fn store_settings_convert_to_http_config() {
        let settings = StoreSettings {
            base_url: "https://tags.test".into(),
            auth_header: Some("Bearer token".into()),
            timeout_secs: 5,
        };
        let http = settings.to_http_config();
        assert_eq!(http.base_url, "https://tags.test");
        assert_eq!(http.auth_header.as_deref(), Some("Bearer token"));
        assert_eq!(http.timeout_secs, 5);
    }

    #[test]
    fn matching_settings_convert_to_options() {
        let settings = MatchingSettings {
            min_confidence: 0.6,
            enable_fuzzy_matching: false,
            enable_synonym_matching: true,
            max_results: 7,
        };
        let options = settings.to_options();
        assert_eq!(options.min_confidence, 0.6);
        assert!(!options.enable_fuzzy_matching);
        assert_eq!(options.max_results, 7);
    }
}
