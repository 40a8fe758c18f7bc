//! XY rendering of two report files.
//!
//! The X series comes from one report's value column and the Y series from
//! another's, pairing rows by position (both reports are written in manifest
//! order, so row N of each refers to the same run).

use std::path::Path;

use plotters::prelude::*;
use thiserror::Error;

use crate::report::{self, ReportError};

/// Output raster size in pixels.
pub const PLOT_SIZE: (u32, u32) = (1600, 1200);

/// Column holding the value in a report row (column 0 is the run directory).
const VALUE_COLUMN: usize = 1;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("X series has {x} points but Y series has {y}")]
    LengthMismatch { x: usize, y: usize },

    #[error("No data points to plot")]
    Empty,

    #[error("Rendering failed: {0}")]
    Backend(String),
}

/// Axis and legend text for a plot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotLabels {
    pub x_axis: String,
    pub y_axis: String,
    pub series: String,
}

impl Default for PlotLabels {
    fn default() -> Self {
        Self {
            x_axis: "Pressure, bar".to_string(),
            y_axis: "Density, kg/m^3".to_string(),
            series: "Density".to_string(),
        }
    }
}

/// Reads the value column of both reports and renders a line-plus-marker
/// plot to `out_path` (format chosen by extension, PNG in practice).
pub fn scatter(
    x_report: &Path,
    y_report: &Path,
    out_path: &Path,
    labels: &PlotLabels,
) -> Result<(), PlotError> {
    let xs = report::read_column(x_report, VALUE_COLUMN)?;
    let ys = report::read_column(y_report, VALUE_COLUMN)?;

    if xs.len() != ys.len() {
        return Err(PlotError::LengthMismatch {
            x: xs.len(),
            y: ys.len(),
        });
    }
    if xs.is_empty() {
        return Err(PlotError::Empty);
    }

    let (x_range, y_range) = (padded_range(&xs), padded_range(&ys));
    let points: Vec<(f64, f64)> = xs.into_iter().zip(ys).collect();

    let root = BitMapBackend::new(out_path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(to_backend)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range, y_range)
        .map_err(to_backend)?;

    chart
        .configure_mesh()
        .x_desc(labels.x_axis.as_str())
        .y_desc(labels.y_axis.as_str())
        .draw()
        .map_err(to_backend)?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &RED))
        .map_err(to_backend)?
        .label(labels.series.as_str())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, RED.filled())),
        )
        .map_err(to_backend)?;

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(to_backend)?;

    root.present().map_err(to_backend)?;
    Ok(())
}

fn to_backend(err: impl std::fmt::Display) -> PlotError {
    PlotError::Backend(err.to_string())
}

fn padded_range(values: &[f64]) -> std::ops::Range<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let pad = if max > min { (max - min) * 0.05 } else { 1.0 };
    (min - pad)..(max + pad)
}
