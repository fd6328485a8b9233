//! tct-hmm binary

use std::fs;
use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tctconf::TrainerConfig;
use tracing::{debug, info};

use tct_hmm::{telemetry, train, Args, TrainSettings};

fn main() -> Result<()> {
    let args = Args::parse();

    let (config, sources) = TrainerConfig::load_with_sources_from(args.config.as_deref())
        .context("failed to load configuration")?;

    telemetry::init(&config.telemetry.log_level)?;
    for file in &sources.files {
        debug!(path = %file.display(), "config file loaded");
    }
    if !sources.env_overrides.is_empty() {
        debug!(vars = ?sources.env_overrides, "environment overrides applied");
    }

    let settings = TrainSettings::resolve(&args, &config);
    let output = train::run(&settings)?;
    let json = serde_json::to_string_pretty(&output).context("failed to serialize result")?;

    match &args.output {
        Some(path) => {
            fs::write(path, json + "\n")
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "matrix written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("failed to write to stdout")?;
        }
    }

    Ok(())
}
