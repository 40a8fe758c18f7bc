//! Per-run working-directory setup.
//!
//! Every generated parameter file gets a directory of its own holding copies
//! of the static simulation inputs. Directories are created exactly once;
//! an already-existing directory is an error, never silently reused, since
//! the simulation engine mutates these directories after creation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("Failed to create run directory '{path}': {source}")]
    CreateDir { path: String, source: io::Error },

    #[error("Failed to copy '{from}' into '{to}': {source}")]
    Copy {
        from: String,
        to: String,
        source: io::Error,
    },
}

/// The static input files copied into every run directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticInputs {
    /// Starting coordinates.
    pub coordinates: PathBuf,
    /// System topology.
    pub topology: PathBuf,
    /// Force-field fragments included by the topology.
    pub includes: Vec<PathBuf>,
}

impl Default for StaticInputs {
    fn default() -> Self {
        Self {
            coordinates: PathBuf::from("confin.gro"),
            topology: PathBuf::from("topol.top"),
            includes: vec![PathBuf::from("thf.itp"), PathBuf::from("tip4p.itp")],
        }
    }
}

/// Creates one directory per run name under `root` and populates it with the
/// static inputs plus the run's own `{name}.mdp` (expected next to `root`'s
/// other inputs, i.e. where [`crate::mdp::sweep::generate`] wrote it).
pub fn materialize(
    root: &Path,
    run_names: &[String],
    inputs: &StaticInputs,
) -> Result<(), MaterializeError> {
    for name in run_names {
        let dir = root.join(name);
        fs::create_dir(&dir).map_err(|source| MaterializeError::CreateDir {
            path: dir.display().to_string(),
            source,
        })?;
        debug!("Created run directory {}", dir.display());

        copy_into(&root.join(&inputs.coordinates), &dir)?;
        copy_into(&root.join(&inputs.topology), &dir)?;
        copy_into(&root.join(format!("{name}.mdp")), &dir)?;
        for include in &inputs.includes {
            copy_into(&root.join(include), &dir)?;
        }
    }
    Ok(())
}

fn copy_into(from: &Path, dir: &Path) -> Result<(), MaterializeError> {
    let file_name = from.file_name().unwrap_or(from.as_os_str());
    let to = dir.join(file_name);
    fs::copy(from, &to).map_err(|source| MaterializeError::Copy {
        from: from.display().to_string(),
        to: to.display().to_string(),
        source,
    })?;
    Ok(())
}
