//! One training run: settings in, serialized matrix out.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chord_hmm::{
    discover, ChordQuality, ChordVocabulary, CorpusLoader, EstimateReport, EstimationError,
    HmmEstimator, LabFormat, LoadStats, MatrixKind, Normalization, UnknownPolicy,
};
use serde::{Deserialize, Serialize};
use tctconf::TrainerConfig;
use tracing::{debug, info};

use crate::cli::Args;

/// Effective settings after layering CLI flags over config.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainSettings {
    pub roots: Vec<PathBuf>,
    pub extensions: Vec<String>,
    pub cqmax: String,
    pub window_size: f64,
    pub unknown: String,
    pub normalization: String,
    pub matrix: MatrixKind,
}

impl TrainSettings {
    /// CLI flags override config values; empty lists fall back to config.
    pub fn resolve(args: &Args, config: &TrainerConfig) -> Self {
        let roots = if args.dataset.is_empty() {
            config.dataset.roots.clone()
        } else {
            args.dataset.clone()
        };
        let extensions = if args.extensions.is_empty() {
            config.dataset.extensions.clone()
        } else {
            args.extensions.clone()
        };

        Self {
            roots,
            extensions,
            cqmax: args.cqmax.clone().unwrap_or_else(|| config.training.cqmax.clone()),
            window_size: args.window_size.unwrap_or(config.training.window_size),
            unknown: args.unknown.clone().unwrap_or_else(|| config.training.unknown.clone()),
            normalization: args
                .normalization
                .clone()
                .unwrap_or_else(|| config.training.normalization.clone()),
            matrix: args.matrix,
        }
    }
}

/// JSON document written by the trainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainOutput {
    pub matrix: MatrixKind,
    pub cqmax: String,
    pub window_size: f64,
    pub states: Vec<String>,
    pub values: Vec<Vec<f64>>,
    pub report: EstimateReport,
    pub load: LoadStats,
}

/// Validate settings, load the corpus, and estimate the requested matrix.
///
/// Settings are checked before any file is touched.
pub fn run(settings: &TrainSettings) -> Result<TrainOutput> {
    let max_quality: ChordQuality = settings.cqmax.parse()?;
    let unknown: UnknownPolicy = settings.unknown.parse()?;
    let normalization: Normalization = settings.normalization.parse()?;

    let vocab = ChordVocabulary::up_to(max_quality, unknown);
    let estimator = HmmEstimator::new(&vocab, settings.window_size)?.with_normalization(normalization);

    if settings.matrix == MatrixKind::Emission {
        return Err(EstimationError::Unsupported("emission").into());
    }
    if settings.roots.is_empty() {
        bail!("no dataset roots given; pass -d ROOT or set [dataset].roots");
    }

    info!(
        matrix = %settings.matrix,
        cqmax = %max_quality,
        states = vocab.state_count(),
        window_size = settings.window_size,
        "training"
    );

    let extensions: Vec<&str> = settings.extensions.iter().map(String::as_str).collect();
    let files = discover(settings.roots.as_slice(), &extensions).context("dataset discovery failed")?;
    debug!(files = files.len(), "annotation files discovered");

    let loader = CorpusLoader::new(LabFormat);
    let corpus = loader.load(&files);

    let trained = estimator
        .estimate(settings.matrix, &corpus)
        .with_context(|| format!("failed to estimate {} matrix", settings.matrix))?;

    Ok(TrainOutput {
        matrix: trained.kind,
        cqmax: max_quality.shorthand().to_string(),
        window_size: settings.window_size,
        states: trained.states,
        values: trained.values,
        report: trained.report,
        load: corpus.stats(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn settings(matrix: MatrixKind) -> TrainSettings {
        TrainSettings {
            roots: vec![PathBuf::from("/nonexistent/dataset")],
            extensions: vec!["lab".to_string()],
            cqmax: "min".to_string(),
            window_size: 0.1,
            unknown: "skip".to_string(),
            normalization: "global".to_string(),
            matrix,
        }
    }

    #[test]
    fn cli_flags_override_config() {
        let mut config = TrainerConfig::default();
        config.dataset.roots = vec![PathBuf::from("/from/config")];
        config.training.cqmax = "7".to_string();
        config.training.window_size = 0.5;

        let args = Args::try_parse_from(["tct-hmm", "-m", "T", "-q", "maj"]).unwrap();
        let resolved = TrainSettings::resolve(&args, &config);

        assert_eq!(resolved.roots, vec![PathBuf::from("/from/config")]);
        assert_eq!(resolved.cqmax, "maj");
        assert_eq!(resolved.window_size, 0.5);
        assert_eq!(resolved.extensions, vec!["lab", "txt"]);
    }

    #[test]
    fn bad_cqmax_fails_before_discovery() {
        let mut s = settings(MatrixKind::Transition);
        s.cqmax = "hdim9".to_string();
        let err = run(&s).unwrap_err();
        assert!(err.to_string().contains("hdim9"));
    }

    #[test]
    fn bad_window_fails_before_discovery() {
        let mut s = settings(MatrixKind::Transition);
        s.window_size = 0.0;
        let err = run(&s).unwrap_err();
        assert!(err.to_string().contains("window size"));
    }

    #[test]
    fn emission_is_rejected_before_discovery() {
        let err = run(&settings(MatrixKind::Emission)).unwrap_err();
        assert!(err.to_string().contains("emission"));
    }

    #[test]
    fn missing_root_is_reported() {
        let err = run(&settings(MatrixKind::Initial)).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/dataset"));
    }
}
