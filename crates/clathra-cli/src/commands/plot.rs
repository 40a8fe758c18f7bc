use crate::cli::PlotArgs;
use crate::error::Result;
use clathra::plot::{self, PlotLabels};
use tracing::info;

pub fn run(args: PlotArgs) -> Result<()> {
    let labels = PlotLabels {
        x_axis: args.xlabel,
        y_axis: args.ylabel,
        series: args.label,
    };

    info!(
        "Plotting {} against {}",
        args.y_report.display(),
        args.x_report.display()
    );
    plot::scatter(&args.x_report, &args.y_report, &args.output, &labels)?;

    println!("✓ Plot written to {}", args.output.display());
    Ok(())
}
