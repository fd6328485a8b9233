//! Configuration loading for the chord HMM trainer.
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins):
//! 1. `/etc/tct-hmm/config.toml` (system)
//! 2. `~/.config/tct-hmm/config.toml` (user)
//! 3. `./tct-hmm.toml` or an explicit `--config` path (local override)
//! 4. Environment variables (`TCT_*`, `RUST_LOG`)
//!
//! # Example Config
//!
//! ```toml
//! [dataset]
//! roots = ["~/datasets/isophonics", "$DATA/billboard"]
//! extensions = ["lab"]
//!
//! [training]
//! cqmax = "min"
//! window_size = 0.1
//! unknown = "skip"
//! normalization = "global"
//!
//! [telemetry]
//! log_level = "info"
//! ```

pub mod loader;
pub mod sections;

pub use loader::{discover_config_files_with_override, ConfigSources};
pub use sections::{DatasetConfig, TelemetryConfig, TrainingConfig};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value for {var}: {message}")]
    Env { var: String, message: String },
}

/// Complete trainer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TrainerConfig {
    #[serde(default)]
    pub dataset: DatasetConfig,

    #[serde(default)]
    pub training: TrainingConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl TrainerConfig {
    /// Load configuration and return information about sources.
    ///
    /// If `config_path` is provided, it replaces the local `./tct-hmm.toml`
    /// override. System and user configs still load first.
    pub fn load_with_sources_from(
        config_path: Option<&Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut merged = toml::Table::new();

        for path in loader::discover_config_files_with_override(config_path) {
            let table = loader::read_table(&path)?;
            loader::merge_tables(&mut merged, table);
            sources.files.push(path);
        }

        let mut config = loader::from_table(merged, Path::new("<merged>"))?;
        loader::apply_env_overrides(&mut config, &mut sources)?;

        Ok((config, sources))
    }

    /// Serialize config to TOML string.
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}
