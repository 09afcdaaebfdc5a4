//! Extraction configuration.
//!
//! Stored as JSON; every field is optional on disk and falls back to its
//! default:
//!
//! ```json
//! {
//!   "batches": ["Model Outputs"],
//!   "processor": { "kind": "interpolate", "point_num": 100, "threshold_num": 50 },
//!   "non_numeric": "abort_batch"
//! }
//! ```

use crate::error::{ProbeError, Result, ResultExt as _};
use crate::extract::FOOT_STRIKE;
use crate::grid::DEFAULT_MAX_COLUMNS;
use crate::process::ProcessorConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What a non-numeric cell inside a data range does to its batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonNumericPolicy {
    /// The whole batch is reported and left out of the dataset.
    #[default]
    AbortBatch,
    /// Only the offending cell is reported and left out of its series.
    SkipCell,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Batch names to extract, in output order.
    pub batches: Vec<String>,
    /// Marker text bounding each gait cycle.
    pub event_marker: String,
    /// Columns read from each row.
    pub max_columns: usize,
    pub processor: ProcessorConfig,
    pub non_numeric: NonNumericPolicy,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            batches: vec!["Joints".to_owned(), "Model Outputs".to_owned()],
            event_marker: FOOT_STRIKE.to_owned(),
            max_columns: DEFAULT_MAX_COLUMNS,
            processor: ProcessorConfig::default(),
            non_numeric: NonNumericPolicy::default(),
        }
    }
}

impl ProbeConfig {
    /// Load a configuration from a JSON file
    ///
    /// # Errors
    ///
    /// [`ProbeError::Other`] if the file cannot be read, [`ProbeError::Config`]
    /// if it is not valid JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json(&content)
    }

    /// Parse a configuration from a JSON string
    ///
    /// # Errors
    ///
    /// [`ProbeError::Config`] on malformed JSON or mistyped fields.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON
    ///
    /// # Errors
    ///
    /// [`ProbeError::Config`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save to a JSON file, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns error if a directory or the file cannot be written.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Reject settings extraction cannot work with.
    ///
    /// # Errors
    ///
    /// [`ProbeError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.batches.is_empty() {
            return Err(ProbeError::Config("no batches requested".to_owned()));
        }
        if self.batches.iter().any(|b| b.trim().is_empty()) {
            return Err(ProbeError::Config("batch names must not be empty".to_owned()));
        }
        if self.event_marker.trim().is_empty() {
            return Err(ProbeError::Config("event_marker must not be empty".to_owned()));
        }
        if self.max_columns == 0 {
            return Err(ProbeError::Config("max_columns must be at least 1".to_owned()));
        }
        if let ProcessorConfig::Interpolate { point_num, .. } = self.processor
            && point_num < 2
        {
            return Err(ProbeError::Config(format!(
                "point_num must be at least 2, got {point_num}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ProbeConfig::default();
        assert_eq!(config.batches, vec!["Joints", "Model Outputs"]);
        assert_eq!(config.event_marker, "Foot Strike");
        assert_eq!(config.max_columns, 500);
        assert_eq!(config.processor, ProcessorConfig::Identity);
        assert_eq!(config.non_numeric, NonNumericPolicy::AbortBatch);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ProbeConfig::from_json(
            r#"{"batches":["Model Outputs"],"processor":{"kind":"interpolate","point_num":101,"threshold_num":20},"non_numeric":"skip_cell"}"#,
        )
        .unwrap();
        assert_eq!(config.batches, vec!["Model Outputs"]);
        assert_eq!(config.processor, ProcessorConfig::interpolate(101, 20));
        assert_eq!(config.non_numeric, NonNumericPolicy::SkipCell);
        assert_eq!(config.event_marker, FOOT_STRIKE);
    }

    #[test]
    fn test_invalid_json() {
        let err = ProbeConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ProbeError::Config(_)));
    }

    #[test]
    fn test_validate_rejects() {
        let mut config = ProbeConfig::default();
        config.batches.clear();
        assert!(config.validate().is_err());

        let mut config = ProbeConfig::default();
        config.processor = ProcessorConfig::interpolate(1, 0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("point_num"));

        let mut config = ProbeConfig::default();
        config.max_columns = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("probe.json");

        let mut config = ProbeConfig::default();
        config.processor = ProcessorConfig::interpolate(100, 50);
        config.to_file(&path).unwrap();

        let loaded = ProbeConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
