use crate::cli::CollectArgs;
use crate::config::RunConfig;
use crate::error::{CliError, Result};
use clathra::analyze::energy::{self, EnergyTerm};
use clathra::analyze::manifest;
use clathra::report;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

pub fn run(args: CollectArgs) -> Result<()> {
    let config = RunConfig::load(&args.config)?;
    let term: EnergyTerm = args.term.parse().map_err(CliError::Argument)?;
    let xvg = args.xvg.unwrap_or_else(|| config.collect.xvg.clone());
    let header = args
        .header
        .unwrap_or_else(|| format!("# Source folder; {term} average"));
    let root = std::env::current_dir()?;

    let directories = manifest::select(&config.collect.manifest, &config.collect.marker)?;
    info!(
        "Collecting {term} over {} director(ies) from {}",
        directories.len(),
        config.collect.manifest.display()
    );

    let bar = ProgressBar::new(directories.len() as u64);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap()
        .progress_chars("#>-"),
    );
    bar.set_draw_target(indicatif::ProgressDrawTarget::stderr_with_hz(2));

    let result = energy::collect(&config.engine, &root, &directories, term, &xvg, |dir| {
        bar.set_message(dir.to_string());
        bar.inc(1);
    });

    let records = match result {
        Ok(records) => {
            bar.finish_with_message("done");
            records
        }
        Err(e) => {
            bar.finish_with_message("failed");
            return Err(e.into());
        }
    };

    report::write_to_path(&args.output, &header, &records)?;
    println!(
        "✓ {} average(s) written to {}",
        records.len(),
        args.output.display()
    );
    Ok(())
}
