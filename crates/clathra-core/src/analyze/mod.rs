//! Post-processing of finished runs.
//!
//! Run directories to analyze come from a manifest file ([`manifest`]); the
//! scalar averages themselves come from the engine's own energy-analysis
//! subcommand, invoked per directory and scraped for its statistics summary
//! ([`energy`]). Collection is sequential and fail-fast: the first engine
//! failure aborts the whole pass with no partial results.

pub mod energy;
pub mod manifest;

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("Failed to read manifest '{path}': {source}")]
    Manifest { path: String, source: io::Error },

    #[error("Failed to invoke '{engine}': {source}")]
    EngineSpawn { engine: String, source: io::Error },

    #[error("Engine failed in '{directory}' ({status}): {stderr}")]
    EngineFailure {
        directory: String,
        status: String,
        stderr: String,
    },

    #[error("Could not find an average in the engine output for '{directory}'")]
    UnexpectedOutput { directory: String },
}

/// One collected (run directory, scalar average) pair.
///
/// The average is carried as the engine printed it and written to reports
/// verbatim; no numeric interpretation happens on this side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AverageRecord {
    pub directory: String,
    pub average: String,
}
