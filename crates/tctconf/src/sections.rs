//! Config sections. Values stay as plain strings and numbers here; the
//! trainer validates them against the chord vocabulary and estimator.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where annotation files come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Dataset root directories, walked recursively.
    /// Default: none (must come from a config file, env or CLI)
    #[serde(default)]
    pub roots: Vec<PathBuf>,

    /// Annotation file extensions, without the dot.
    /// Default: ["lab", "txt"]
    #[serde(default = "DatasetConfig::default_extensions")]
    pub extensions: Vec<String>,
}

impl DatasetConfig {
    fn default_extensions() -> Vec<String> {
        vec!["lab".to_string(), "txt".to_string()]
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            extensions: Self::default_extensions(),
        }
    }
}

/// Estimation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Maximum chord quality, Harte shorthand (maj, min, 7, hdim7, ...).
    /// Default: min
    #[serde(default = "TrainingConfig::default_cqmax")]
    pub cqmax: String,

    /// Transition window length in seconds.
    /// Default: 0.1
    #[serde(default = "TrainingConfig::default_window_size")]
    pub window_size: f64,

    /// Unknown-chord policy: "skip" or "state".
    /// Default: skip
    #[serde(default = "TrainingConfig::default_unknown")]
    pub unknown: String,

    /// Transition normalization: "global" or "row".
    /// Default: global
    #[serde(default = "TrainingConfig::default_normalization")]
    pub normalization: String,
}

impl TrainingConfig {
    fn default_cqmax() -> String {
        "min".to_string()
    }

    fn default_window_size() -> f64 {
        0.1
    }

    fn default_unknown() -> String {
        "skip".to_string()
    }

    fn default_normalization() -> String {
        "global".to_string()
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            cqmax: Self::default_cqmax(),
            window_size: Self::default_window_size(),
            unknown: Self::default_unknown(),
            normalization: Self::default_normalization(),
        }
    }
}

/// Logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log filter (trace, debug, info, warn, error, or an EnvFilter directive).
    /// Default: info
    #[serde(default = "TelemetryConfig::default_log_level")]
    pub log_level: String,
}

impl TelemetryConfig {
    fn default_log_level() -> String {
        "info".to_string()
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
        }
    }
}
