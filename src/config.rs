//! Scorer configuration: artifact location, confidence thresholds and logging

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Directory holding the scaler, projector, centers and reference points
    pub artifacts_dir: PathBuf,
    /// Distance cut-offs for the confidence tiers
    pub confidence: ConfidenceThresholds,
    pub log: LogConfig,
}

/// Distance to the assigned center below `close` is a close match,
/// below `weak` a weak match, anything further is unreliable
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceThresholds {
    pub close: f64,
    pub weak: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: PathBuf::from("model config"),
            confidence: ConfidenceThresholds::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            close: 1.5,
            weak: 3.0,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl ConfidenceThresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = self.close > 0.0 && self.close < self.weak;
        if !ordered || !self.weak.is_finite() {
            return Err(ConfigError::Thresholds {
                close: self.close,
                weak: self.weak,
            });
        }
        Ok(())
    }
}

impl ScorerConfig {
    /// Load from a JSON file. A missing file yields the defaults; an unreadable,
    /// malformed or inconsistent one is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ScorerConfig =
            serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.confidence.validate()?;
        Ok(config)
    }
}
