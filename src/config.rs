//! Store configuration: collection names, key escaping and query defaults.
//!
//! Configuration is read from a JSON file; every field is optional and falls
//! back to the defaults below.
//!
//! ```json
//! {
//!   "variants_collection": "variants_2_0",
//!   "map_key_dot_replacement": "£",
//!   "empty_study_list": "match_nothing"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub const DEFAULT_VARIANTS_COLLECTION: &str = "variants_2_0";
pub const DEFAULT_ANNOTATIONS_COLLECTION: &str = "annotations_2_0";
pub const DEFAULT_ANNOTATION_METADATA_COLLECTION: &str = "annotationMetadata_2_0";
pub const DEFAULT_FILES_COLLECTION: &str = "files_2_0";

/// Character stored in place of `.` inside map keys, which the document store forbids
pub const DEFAULT_MAP_KEY_DOT_REPLACEMENT: char = '£';

pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// How a boundary query treats an empty study list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyStudyList {
    /// No study requested, so no variant qualifies
    #[default]
    MatchNothing,
    /// No study requested, so the study constraint is dropped
    NoConstraint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub variants_collection: String,
    pub annotations_collection: String,
    pub annotation_metadata_collection: String,
    pub files_collection: String,
    pub map_key_dot_replacement: char,
    pub empty_study_list: EmptyStudyList,
    pub default_page_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            variants_collection: DEFAULT_VARIANTS_COLLECTION.to_string(),
            annotations_collection: DEFAULT_ANNOTATIONS_COLLECTION.to_string(),
            annotation_metadata_collection: DEFAULT_ANNOTATION_METADATA_COLLECTION.to_string(),
            files_collection: DEFAULT_FILES_COLLECTION.to_string(),
            map_key_dot_replacement: DEFAULT_MAP_KEY_DOT_REPLACEMENT,
            empty_study_list: EmptyStudyList::default(),
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl StoreConfig {
    /// Load configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed, or holds invalid values.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// # Errors
    ///
    /// Returns `ConfigError` if the JSON is malformed or holds invalid values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.map_key_dot_replacement == '.' {
            return Err(ConfigError::Invalid(
                "map_key_dot_replacement cannot be '.'".to_string(),
            ));
        }
        if self.default_page_size == 0 {
            return Err(ConfigError::Invalid(
                "default_page_size must be positive".to_string(),
            ));
        }
        let collections = [
            &self.variants_collection,
            &self.annotations_collection,
            &self.annotation_metadata_collection,
            &self.files_collection,
        ];
        if collections.iter().any(|c| c.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "collection names must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Restore dots in a stored map key
    #[must_use]
    pub fn unescape_key(&self, key: &str) -> String {
        key.replace(self.map_key_dot_replacement, ".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = StoreConfig::from_json(r#"{"variants_collection": "variants_test"}"#).unwrap();
        assert_eq!(config.variants_collection, "variants_test");
        assert_eq!(config.files_collection, DEFAULT_FILES_COLLECTION);
        assert_eq!(config.map_key_dot_replacement, '£');
        assert_eq!(config.empty_study_list, EmptyStudyList::MatchNothing);
    }

    #[test]
    fn test_empty_study_list_policy_parses() {
        let config = StoreConfig::from_json(r#"{"empty_study_list": "no_constraint"}"#).unwrap();
        assert_eq!(config.empty_study_list, EmptyStudyList::NoConstraint);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            StoreConfig::from_json(r#"{"map_key_dot_replacement": "."}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            StoreConfig::from_json(r#"{"default_page_size": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            StoreConfig::from_json("{not json"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_key_escaping() {
        let config = StoreConfig::default();
        assert_eq!(config.unescape_key("AF£EUR"), "AF.EUR");
        assert_eq!(config.unescape_key("GT"), "GT");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, br#"{"default_page_size": 50}"#).unwrap();
        let config = StoreConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.default_page_size, 50);
    }
}
