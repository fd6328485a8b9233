//! Command-line arguments.

use std::path::PathBuf;

use chord_hmm::MatrixKind;
use clap::Parser;

/// tct-hmm - estimate HMM matrices for chord recognition
#[derive(Parser, Debug, Clone)]
#[command(name = "tct-hmm")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Dataset root directory, walked recursively (repeatable)
    #[arg(short = 'd', long = "dataset", value_name = "ROOT", num_args = 1..)]
    pub dataset: Vec<PathBuf>,

    /// Maximum chord quality, Harte shorthand (maj, min, 5, 7, maj7, ...)
    #[arg(short = 'q', long)]
    pub cqmax: Option<String>,

    /// Matrix to train: I (initial), T (transition), E (emission)
    #[arg(short = 'm', long = "matrix", value_name = "KIND")]
    pub matrix: MatrixKind,

    /// Transition window length in seconds
    #[arg(long)]
    pub window_size: Option<f64>,

    /// Unknown-chord policy: skip, state
    #[arg(long)]
    pub unknown: Option<String>,

    /// Transition normalization: global, row
    #[arg(long)]
    pub normalization: Option<String>,

    /// Annotation file extension, without the dot (repeatable)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Config file used instead of ./tct-hmm.toml
    #[arg(long, env = "TCT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write the JSON result here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
