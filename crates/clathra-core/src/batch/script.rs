use std::path::Path;

use thiserror::Error;
use tracing::debug;

use super::{RunKind, ScheduledRun};

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Batch schedule is empty")]
    EmptySchedule,

    #[error("Malformed script template line {line}: '{content}'")]
    MalformedTemplate { line: usize, content: String },
}

/// Artifacts handed from one run to the next. `gmx mdrun` writes both into
/// the run directory under these default names.
const FINAL_COORDINATES: &str = "confout.gro";
const CHECKPOINT: &str = "state.cpt";
/// Name the next run's parameter file expects its starting coordinates under.
const START_COORDINATES: &str = "confin.gro";

/// Assembles the submission script for a batch schedule.
///
/// The template is rewritten line by line (tokens re-joined with single
/// spaces, preserving the script's own syntax):
///
/// - a token starting with `--nodelist=` gets the requested compute node,
/// - the first `cd` line is pointed at the first run's directory under
///   `root`,
/// - the first line invoking `grompp` gets the first run's `.mdp` as its
///   `-f` argument.
///
/// One transition block per consecutive run pair is then appended: the
/// source run's final coordinates and checkpoint are copied forward, the
/// coordinates renamed into place, and the destination run preprocessed and
/// started. Entering a production run uses the continuation form of the
/// preprocessing call (`-t state.cpt`); entering an equilibration run starts
/// fresh.
pub fn generate(
    template: &str,
    schedule: &[ScheduledRun],
    root: &Path,
    node: &str,
    engine: &str,
) -> Result<String, BatchError> {
    let first = schedule.first().ok_or(BatchError::EmptySchedule)?;

    let mut out = String::new();
    let mut cd_done = false;
    let mut grompp_done = false;

    for (index, line) in template.lines().enumerate() {
        let mut tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();

        if let Some(slot) = tokens.iter_mut().find(|t| t.starts_with("--nodelist=")) {
            *slot = format!("--nodelist={node}");
        }

        if !cd_done && tokens.first().map(String::as_str) == Some("cd") {
            if tokens.len() < 2 {
                return Err(BatchError::MalformedTemplate {
                    line: index + 1,
                    content: line.to_string(),
                });
            }
            tokens[1] = root.join(&first.name).display().to_string();
            cd_done = true;
        }

        if !grompp_done && tokens.iter().any(|t| t == "grompp") {
            let f_value = tokens
                .iter()
                .position(|t| t == "-f")
                .map(|i| i + 1)
                .filter(|&i| i < tokens.len())
                .ok_or_else(|| BatchError::MalformedTemplate {
                    line: index + 1,
                    content: line.to_string(),
                })?;
            tokens[f_value] = format!("{}.mdp", first.name);
            grompp_done = true;
        }

        out.push_str(&tokens.join(" "));
        out.push('\n');
    }

    for pair in schedule.windows(2) {
        let (from, to) = (&pair[0], &pair[1]);
        debug!("Chaining {} -> {}", from.name, to.name);
        out.push('\n');
        out.push_str(&transition_block(to, engine));
    }

    Ok(out)
}

fn transition_block(to: &ScheduledRun, engine: &str) -> String {
    let mut block = String::new();
    block.push_str(&format!("cp {FINAL_COORDINATES} ../{}/\n", to.name));
    block.push_str(&format!("cp {CHECKPOINT} ../{}/\n", to.name));
    block.push_str(&format!("cd ../{}\n", to.name));
    block.push_str(&format!("mv {FINAL_COORDINATES} {START_COORDINATES}\n"));
    match to.kind {
        RunKind::Production => block.push_str(&format!(
            "{engine} grompp -f {0}.mdp -c {START_COORDINATES} -t {CHECKPOINT} -p topol.top -o {0}.tpr\n",
            to.name
        )),
        RunKind::Equilibration => block.push_str(&format!(
            "{engine} grompp -f {0}.mdp -c {START_COORDINATES} -p topol.top -o {0}.tpr\n",
            to.name
        )),
    }
    block.push_str(&format!("{engine} mdrun -s {}.tpr\n", to.name));
    block
}
