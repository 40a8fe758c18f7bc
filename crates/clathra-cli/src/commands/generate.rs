use crate::cli::GenerateArgs;
use crate::config::RunConfig;
use crate::error::Result;
use clathra::materialize;
use clathra::mdp::{sweep, MdpTemplate, RunPhase};
use std::path::PathBuf;
use tracing::info;

pub fn run(args: GenerateArgs) -> Result<()> {
    let config = RunConfig::load(&args.config)?;
    let axis = config.axis()?;
    let phase = if args.production {
        RunPhase::Production
    } else {
        RunPhase::Equilibration
    };
    let out_dir = args.out_dir.unwrap_or_else(|| PathBuf::from("."));

    info!(
        "Generating {} {} parameter file(s) from {}",
        axis.len(),
        phase.suffix(),
        config.sweep.template.display()
    );
    let template = MdpTemplate::load(&config.sweep.template)?;
    let names = sweep::generate(&template, &axis, phase, &out_dir)?;

    materialize::materialize(&out_dir, &names, &config.static_inputs())?;

    for name in &names {
        println!("  {name}");
    }
    println!(
        "✓ Generated {} run director{} under {}",
        names.len(),
        if names.len() == 1 { "y" } else { "ies" },
        out_dir.display()
    );
    Ok(())
}
