//! Config file discovery, loading, and environment variable overlay.

use crate::{ConfigError, TrainerConfig};
use std::env;
use std::path::{Path, PathBuf};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files, optionally with a CLI override path.
///
/// If `cli_path` is provided and exists, it replaces the local override.
/// Returns paths in load order (system, user, local/cli). Only returns
/// files that exist.
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let system = PathBuf::from("/etc/tct-hmm/config.toml");
    if system.exists() {
        files.push(system);
    }

    // User config (XDG_CONFIG_HOME or ~/.config)
    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("tct-hmm/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    if let Some(path) = cli_path {
        if path.exists() {
            files.push(path.to_path_buf());
            return files;
        }
    }

    let local = PathBuf::from("tct-hmm.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Read a TOML file as a raw table.
pub fn read_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    contents.parse().map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a single config file (no merging, no env).
pub fn load_from_file(path: &Path) -> Result<TrainerConfig, ConfigError> {
    from_table(read_table(path)?, path)
}

/// Deep-merge `overlay` into `base`; overlay wins on scalar conflicts.
pub fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Deserialize a merged table, expanding `~` and `$VAR` in dataset roots.
pub fn from_table(table: toml::Table, origin: &Path) -> Result<TrainerConfig, ConfigError> {
    let mut config: TrainerConfig =
        toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::Parse {
                path: origin.to_path_buf(),
                message: e.to_string(),
            })?;

    config.dataset.roots = config
        .dataset
        .roots
        .iter()
        .map(|p| expand_path(&p.to_string_lossy()))
        .collect();

    Ok(config)
}

/// Apply process environment overrides to config.
pub fn apply_env_overrides(
    config: &mut TrainerConfig,
    sources: &mut ConfigSources,
) -> Result<(), ConfigError> {
    apply_overrides_from(config, sources, |name| env::var(name).ok())
}

/// Apply overrides read through `lookup` (the environment, in production).
pub fn apply_overrides_from(
    config: &mut TrainerConfig,
    sources: &mut ConfigSources,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if let Some(v) = lookup("TCT_DATASET") {
        config.dataset.roots = env::split_paths(&v)
            .map(|p| expand_path(&p.to_string_lossy()))
            .collect();
        sources.env_overrides.push("TCT_DATASET".to_string());
    }

    if let Some(v) = lookup("TCT_CQMAX") {
        config.training.cqmax = v;
        sources.env_overrides.push("TCT_CQMAX".to_string());
    }
    if let Some(v) = lookup("TCT_WINDOW_SIZE") {
        config.training.window_size = v.parse().map_err(|_| ConfigError::Env {
            var: "TCT_WINDOW_SIZE".to_string(),
            message: format!("'{v}' is not a number"),
        })?;
        sources.env_overrides.push("TCT_WINDOW_SIZE".to_string());
    }
    if let Some(v) = lookup("TCT_UNKNOWN") {
        config.training.unknown = v;
        sources.env_overrides.push("TCT_UNKNOWN".to_string());
    }
    if let Some(v) = lookup("TCT_NORMALIZATION") {
        config.training.normalization = v;
        sources.env_overrides.push("TCT_NORMALIZATION".to_string());
    }

    if let Some(v) = lookup("TCT_LOG_LEVEL") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("TCT_LOG_LEVEL".to_string());
    }
    // Also support RUST_LOG
    if let Some(v) = lookup("RUST_LOG") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("RUST_LOG".to_string());
    }

    Ok(())
}

/// Expand ~ and environment variables in a path.
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            home.join(stripped)
        } else {
            PathBuf::from(path)
        }
    } else if let Some(stripped) = path.strip_prefix('$') {
        // Handle $VAR/rest/of/path
        if let Some(slash_pos) = stripped.find('/') {
            let var_name = &stripped[..slash_pos];
            if let Ok(var_value) = env::var(var_name) {
                PathBuf::from(var_value).join(&stripped[slash_pos + 1..])
            } else {
                PathBuf::from(path)
            }
        } else {
            env::var(stripped)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(path))
        }
    } else {
        PathBuf::from(path)
    }
}
