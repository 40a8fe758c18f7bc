use clathra::analyze::AnalyzeError;
use clathra::batch::BatchError;
use clathra::materialize::MaterializeError;
use clathra::mdp::TemplateError;
use clathra::plot::PlotError;
use clathra::report::ReportError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Materialize(#[from] MaterializeError),

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error(transparent)]
    Analyze(#[from] AnalyzeError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Plot(#[from] PlotError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
