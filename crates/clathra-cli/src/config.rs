use crate::error::{CliError, Result};
use clathra::materialize::StaticInputs;
use clathra::mdp::SweepAxis;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The run configuration file (`run.toml` by default).
///
/// Everything the original batch scripts carried as inline literals lives
/// here: the sweep values, the static input names, the queue-script template
/// and the collection settings. CLI flags override individual fields.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// External engine executable.
    #[serde(default = "default_engine")]
    pub engine: String,

    pub sweep: SweepSection,

    #[serde(default)]
    pub inputs: InputsSection,

    #[serde(default)]
    pub batch: BatchSection,

    #[serde(default)]
    pub collect: CollectSection,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct SweepSection {
    /// Equilibration-phase parameter-file template.
    pub template: PathBuf,

    /// Reference pressures in bar. Mutually exclusive with `temperatures`.
    #[serde(default)]
    pub pressures: Vec<f64>,

    /// Reference temperatures in K. Mutually exclusive with `pressures`.
    #[serde(default)]
    pub temperatures: Vec<f64>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct InputsSection {
    #[serde(default = "default_coordinates")]
    pub coordinates: PathBuf,

    #[serde(default = "default_topology")]
    pub topology: PathBuf,

    #[serde(default = "default_includes")]
    pub includes: Vec<PathBuf>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct BatchSection {
    /// Queue-script template.
    #[serde(default = "default_batch_template")]
    pub template: PathBuf,

    /// Compute node for the queue directive.
    pub node: Option<String>,

    /// Sweep root path on the compute side.
    pub root: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct CollectSection {
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    /// Substring a manifest line must carry to be analyzed.
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Tabular output name the engine writes inside each run directory.
    #[serde(default = "default_xvg")]
    pub xvg: String,
}

fn default_engine() -> String {
    "gmx".to_string()
}

fn default_coordinates() -> PathBuf {
    PathBuf::from("confin.gro")
}

fn default_topology() -> PathBuf {
    PathBuf::from("topol.top")
}

fn default_includes() -> Vec<PathBuf> {
    vec![PathBuf::from("thf.itp"), PathBuf::from("tip4p.itp")]
}

fn default_batch_template() -> PathBuf {
    PathBuf::from("jobchain.sh.in")
}

fn default_manifest() -> PathBuf {
    PathBuf::from("dirs.txt")
}

fn default_marker() -> String {
    "prod".to_string()
}

fn default_xvg() -> String {
    "energy.xvg".to_string()
}

impl Default for InputsSection {
    fn default() -> Self {
        Self {
            coordinates: default_coordinates(),
            topology: default_topology(),
            includes: default_includes(),
        }
    }
}

impl Default for CollectSection {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            marker: default_marker(),
            xvg: default_xvg(),
        }
    }
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading run configuration from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("cannot read '{}': {e}", path.display()))
        })?;
        toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("'{}': {e}", path.display())))
    }

    /// The swept axis, enforcing that exactly one of pressures/temperatures
    /// is given.
    pub fn axis(&self) -> Result<SweepAxis> {
        match (
            self.sweep.pressures.is_empty(),
            self.sweep.temperatures.is_empty(),
        ) {
            (false, true) => Ok(SweepAxis::Pressure(self.sweep.pressures.clone())),
            (true, false) => Ok(SweepAxis::Temperature(self.sweep.temperatures.clone())),
            (true, true) => Err(CliError::Config(
                "sweep needs either pressures or temperatures".to_string(),
            )),
            (false, false) => Err(CliError::Config(
                "sweeping pressures and temperatures simultaneously is unsupported".to_string(),
            )),
        }
    }

    pub fn static_inputs(&self) -> StaticInputs {
        StaticInputs {
            coordinates: self.inputs.coordinates.clone(),
            topology: self.inputs.topology.clone(),
            includes: self.inputs.includes.clone(),
        }
    }
}

impl Default for BatchSection {
    fn default() -> Self {
        Self {
            template: default_batch_template(),
            node: None,
            root: None,
        }
    }
}
