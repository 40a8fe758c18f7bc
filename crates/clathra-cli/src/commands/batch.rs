use crate::cli::BatchArgs;
use crate::config::RunConfig;
use crate::error::{CliError, Result};
use clathra::batch;
use clathra::mdp::{sweep, MdpTemplate, RunPhase};
use std::path::PathBuf;
use tracing::info;

pub fn run(args: BatchArgs) -> Result<()> {
    let config = RunConfig::load(&args.config)?;
    let axis = config.axis()?;

    let node = args
        .node
        .or_else(|| config.batch.node.clone())
        .ok_or_else(|| {
            CliError::Argument("no compute node given (use --node or [batch] node)".to_string())
        })?;
    let root = args
        .root
        .or_else(|| config.batch.root.clone())
        .map(Ok)
        .unwrap_or_else(|| std::env::current_dir().map_err(CliError::Io))?;

    // Run names are derived from the same template the sweep uses, so the
    // schedule matches what `generate` produced for either phase.
    let template = MdpTemplate::load(&config.sweep.template)?;
    let eq_names = sweep::run_names(&template, &axis, RunPhase::Equilibration)?;
    let prod_names = sweep::run_names(&template, &axis, RunPhase::Production)?;
    let schedule = batch::chain_runs(&eq_names, &prod_names);

    info!(
        "Chaining {} runs on node {node} under {}",
        schedule.len(),
        root.display()
    );
    let script_template = std::fs::read_to_string(&config.batch.template).map_err(|e| {
        CliError::Config(format!(
            "cannot read batch template '{}': {e}",
            config.batch.template.display()
        ))
    })?;
    let script = batch::generate(&script_template, &schedule, &root, &node, &config.engine)?;

    write_script(&args.output, &script)?;
    println!(
        "✓ Submission script for {} chained runs written to {}",
        schedule.len(),
        args.output.display()
    );
    Ok(())
}

fn write_script(path: &PathBuf, script: &str) -> Result<()> {
    std::fs::write(path, script)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path)?.permissions();
        perms.set_mode(perms.mode() | 0o755);
        std::fs::set_permissions(path, perms)?;
    }
    Ok(())
}
