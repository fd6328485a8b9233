//! tct-hmm - trains chord-recognition HMM matrices from annotated datasets.
//!
//! The binary layers CLI flags over [`tctconf`] settings, then runs
//! [`train::run`]. The pieces are exposed here so tests can drive a run
//! without spawning a process.

pub mod cli;
pub mod telemetry;
pub mod train;

pub use cli::Args;
pub use train::{run, TrainOutput, TrainSettings};
