use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "clathra - batch preparation and post-processing for clathrate-hydrate MD sweeps driven by GROMACS.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the sweep's parameter files and materialize one run directory per condition.
    Generate(GenerateArgs),
    /// Assemble the queue submission script chaining all runs of the sweep.
    Batch(BatchArgs),
    /// Collect a scalar average from every finished production run and write a report.
    Collect(CollectArgs),
    /// Plot one report's values against another's.
    Plot(PlotArgs),
}

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Path to the run configuration file in TOML format.
    #[arg(short, long, value_name = "PATH", default_value = "run.toml")]
    pub config: PathBuf,

    /// Generate production parameter files instead of equilibration ones.
    #[arg(short, long)]
    pub production: bool,

    /// Directory holding the static inputs and receiving the run directories.
    /// Defaults to the current directory.
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}

/// Arguments for the `batch` subcommand.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Path to the run configuration file in TOML format.
    #[arg(short, long, value_name = "PATH", default_value = "run.toml")]
    pub config: PathBuf,

    /// Compute node to pin the job to. Overrides the configuration file.
    #[arg(short, long, value_name = "NODE")]
    pub node: Option<String>,

    /// Root path of the sweep on the compute side. Overrides the configuration file.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Path for the assembled submission script.
    #[arg(short, long, value_name = "PATH", default_value = "jobchain.sh")]
    pub output: PathBuf,
}

/// Arguments for the `collect` subcommand.
#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Path to the run configuration file in TOML format.
    #[arg(short, long, value_name = "PATH", default_value = "run.toml")]
    pub config: PathBuf,

    /// Energy term to average: a name (e.g. 'pressure', 'density') or a raw
    /// engine menu code.
    #[arg(short, long, value_name = "TERM", default_value = "pressure")]
    pub term: String,

    /// Path for the fixed-width report file.
    #[arg(short, long, value_name = "PATH", default_value = "averages.dat")]
    pub output: PathBuf,

    /// Header line for the report. Defaults to one naming the term.
    #[arg(long, value_name = "TEXT")]
    pub header: Option<String>,

    /// Name of the tabular output file the engine writes inside each run
    /// directory. Overrides the configuration file.
    #[arg(long, value_name = "NAME")]
    pub xvg: Option<String>,
}

/// Arguments for the `plot` subcommand.
#[derive(Args, Debug)]
pub struct PlotArgs {
    /// Report file supplying the X series.
    #[arg(short = 'x', long = "x-report", value_name = "PATH")]
    pub x_report: PathBuf,

    /// Report file supplying the Y series.
    #[arg(short = 'y', long = "y-report", value_name = "PATH")]
    pub y_report: PathBuf,

    /// Path for the rendered image.
    #[arg(short, long, value_name = "PATH", default_value = "p-rho.png")]
    pub output: PathBuf,

    /// X axis label.
    #[arg(long, value_name = "TEXT", default_value = "Pressure, bar")]
    pub xlabel: String,

    /// Y axis label.
    #[arg(long, value_name = "TEXT", default_value = "Density, kg/m^3")]
    pub ylabel: String,

    /// Legend label for the series.
    #[arg(long, value_name = "TEXT", default_value = "Density")]
    pub label: String,
}
