use std::path::Path;

use tracing::info;

use super::template::{MdpTemplate, TemplateError};

/// Conversion factor from the bar values carried in `.mdp` files to the GPa
/// values embedded in run names.
const BAR_TO_GPA: f64 = 1e-4;

/// Whether a parameter file targets the equilibration or the production leg
/// of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Equilibration,
    Production,
}

impl RunPhase {
    /// Suffix appended to generated run names.
    pub fn suffix(self) -> &'static str {
        match self {
            RunPhase::Equilibration => "eq",
            RunPhase::Production => "prod",
        }
    }
}

/// The swept condition axis.
///
/// A sweep varies exactly one of pressure or temperature; the other axis
/// keeps whatever value the template carries. Sweeping both at once is
/// unsupported, which the enum makes unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub enum SweepAxis {
    /// Reference pressures, in bar.
    Pressure(Vec<f64>),
    /// Reference temperatures, in K.
    Temperature(Vec<f64>),
}

impl SweepAxis {
    pub fn len(&self) -> usize {
        match self {
            SweepAxis::Pressure(v) | SweepAxis::Temperature(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Derives the run name for one sweep point without touching the filesystem.
///
/// The name is `{GPa}GPa_{K}K_{eq|prod}`, with the pressure converted to GPa
/// and rounded to two decimals (trailing zeros not printed, so `0.1GPa`
/// rather than `0.10GPa`) and the temperature truncated to whole kelvin.
pub fn run_name(pressure_bar: f64, temperature_k: f64, phase: RunPhase) -> String {
    let gpa = (pressure_bar * BAR_TO_GPA * 100.0).round() / 100.0;
    format!("{}GPa_{}K_{}", gpa, temperature_k as i64, phase.suffix())
}

/// Computes the ordered run names a sweep would generate, reading the fixed
/// axis's value from the template.
pub fn run_names(
    template: &MdpTemplate,
    axis: &SweepAxis,
    phase: RunPhase,
) -> Result<Vec<String>, TemplateError> {
    match axis {
        SweepAxis::Pressure(pressures) => {
            let temperature = parse_value(template, "ref-t")?;
            Ok(pressures
                .iter()
                .map(|&p| run_name(p, temperature, phase))
                .collect())
        }
        SweepAxis::Temperature(temperatures) => {
            let pressure = parse_value(template, "ref-p")?;
            Ok(temperatures
                .iter()
                .map(|&t| run_name(pressure, t, phase))
                .collect())
        }
    }
}

/// Generates one `.mdp` file per sweep point under `out_dir`.
///
/// The template is first put through the phase policy
/// ([`MdpTemplate::apply_phase`]), then each sweep value is substituted into
/// the reference-condition line(s): `ref-p` for a pressure sweep, `ref-t`
/// and `gen-temp` for a temperature sweep. Returns the generated run names
/// (file stems) in input order.
///
/// Names are derived, not checked for collisions: duplicate sweep values
/// silently overwrite the earlier file.
pub fn generate(
    template: &MdpTemplate,
    axis: &SweepAxis,
    phase: RunPhase,
    out_dir: &Path,
) -> Result<Vec<String>, TemplateError> {
    let mut template = template.clone();
    template.apply_phase(phase)?;

    let names = run_names(&template, axis, phase)?;
    let values: &[f64] = match axis {
        SweepAxis::Pressure(v) | SweepAxis::Temperature(v) => v,
    };

    for (value, name) in values.iter().zip(&names) {
        match axis {
            SweepAxis::Pressure(_) => {
                template.set_value("ref-p", &format_value(*value))?;
            }
            SweepAxis::Temperature(_) => {
                template.set_value("ref-t", &format_value(*value))?;
                template.set_value("gen-temp", &format_value(*value))?;
            }
        }
        let path = out_dir.join(format!("{name}.mdp"));
        template.write_to_path(&path)?;
        info!("Saved {}", path.display());
    }

    Ok(names)
}

fn parse_value(template: &MdpTemplate, keyword: &str) -> Result<f64, TemplateError> {
    let raw = template.value_of(keyword)?;
    raw.parse::<f64>()
        .map_err(|_| TemplateError::MissingKeyword(format!("{keyword} (non-numeric value '{raw}')")))
}

fn format_value(value: f64) -> String {
    // f64 Display already omits a trailing ".0", so 1000.0 bar prints as
    // the token "1000".
    format!("{value}")
}
