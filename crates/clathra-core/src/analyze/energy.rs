use std::fmt;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use std::str::FromStr;

use tracing::{debug, info};

use super::{AnalyzeError, AverageRecord};

/// Property selectors understood by `gmx energy` for the hydrate systems
/// this tool drives.
///
/// The numeric codes are what the engine reads on standard input;
/// [`EnergyTerm::Custom`] passes any other code through for terms not listed
/// here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyTerm {
    Potential,
    KineticEnergy,
    TotalEnergy,
    Temperature,
    Pressure,
    BoxX,
    Volume,
    Density,
    Custom(u32),
}

impl EnergyTerm {
    pub fn code(self) -> u32 {
        match self {
            EnergyTerm::Potential => 7,
            EnergyTerm::KineticEnergy => 8,
            EnergyTerm::TotalEnergy => 9,
            EnergyTerm::Temperature => 11,
            EnergyTerm::Pressure => 13,
            EnergyTerm::BoxX => 15,
            EnergyTerm::Volume => 18,
            EnergyTerm::Density => 19,
            EnergyTerm::Custom(code) => code,
        }
    }
}

impl fmt::Display for EnergyTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnergyTerm::Potential => write!(f, "potential"),
            EnergyTerm::KineticEnergy => write!(f, "kinetic-energy"),
            EnergyTerm::TotalEnergy => write!(f, "total-energy"),
            EnergyTerm::Temperature => write!(f, "temperature"),
            EnergyTerm::Pressure => write!(f, "pressure"),
            EnergyTerm::BoxX => write!(f, "box-x"),
            EnergyTerm::Volume => write!(f, "volume"),
            EnergyTerm::Density => write!(f, "density"),
            EnergyTerm::Custom(code) => write!(f, "term-{code}"),
        }
    }
}

impl FromStr for EnergyTerm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "potential" => Ok(EnergyTerm::Potential),
            "kinetic" | "kinetic-energy" => Ok(EnergyTerm::KineticEnergy),
            "total" | "total-energy" => Ok(EnergyTerm::TotalEnergy),
            "temperature" => Ok(EnergyTerm::Temperature),
            "pressure" => Ok(EnergyTerm::Pressure),
            "box-x" => Ok(EnergyTerm::BoxX),
            "volume" => Ok(EnergyTerm::Volume),
            "density" => Ok(EnergyTerm::Density),
            other => other
                .parse::<u32>()
                .map(EnergyTerm::Custom)
                .map_err(|_| format!("unknown energy term '{s}'")),
        }
    }
}

/// Runs the engine's energy-analysis subcommand inside `dir` and returns the
/// running average of `term` as the engine printed it.
///
/// The property code is piped to the engine's standard input; the tabular
/// series goes to `xvg_name` inside `dir` and the interactive summary is
/// captured and scraped for the statistics row. A non-zero exit aborts with
/// the engine's stderr attached.
pub fn run_energy(
    engine: &str,
    dir: &Path,
    term: EnergyTerm,
    xvg_name: &str,
) -> Result<String, AnalyzeError> {
    let directory = dir.display().to_string();
    info!("Analyzing {directory} (term {term}, code {})", term.code());

    let spawn_err = |source| AnalyzeError::EngineSpawn {
        engine: engine.to_string(),
        source,
    };

    let mut child = Command::new(engine)
        .args(["energy", "-o", xvg_name])
        .current_dir(dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(spawn_err)?;

    if let Some(stdin) = child.stdin.as_mut() {
        writeln!(stdin, "{}", term.code()).map_err(spawn_err)?;
    }

    let output = child.wait_with_output().map_err(spawn_err)?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !output.status.success() {
        return Err(AnalyzeError::EngineFailure {
            directory,
            status: output.status.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }

    // The engine has moved the summary between stdout and stderr across
    // versions; accept it from either stream.
    parse_average(&stdout)
        .or_else(|| parse_average(&stderr))
        .ok_or(AnalyzeError::UnexpectedOutput { directory })
}

/// Extracts the running average from the engine's statistics summary.
///
/// The summary ends in a table of the form
///
/// ```text
/// Energy                      Average   Err.Est.       RMSD  Tot-Drift
/// -------------------------------------------------------------------
/// Pressure                    1063.43        2.1     145.87     -1.34  (bar)
/// ```
///
/// The table is located by its labeled header row rather than by a fixed
/// token offset into the whole output. Property names may themselves contain
/// spaces, so the average is taken from the data row by its position from
/// the end (after stripping the trailing parenthesized unit) and must parse
/// as a number.
fn parse_average(output: &str) -> Option<String> {
    let mut lines = output.lines();
    while let Some(line) = lines.next() {
        let columns: Vec<&str> = line.split_whitespace().collect();
        if columns.first() != Some(&"Energy") || !columns.contains(&"Average") {
            continue;
        }
        for row in lines.by_ref() {
            let row = row.trim();
            if row.is_empty() || row.starts_with('-') {
                continue;
            }
            let mut tokens: Vec<&str> = row.split_whitespace().collect();
            if tokens.last().is_some_and(|t| t.starts_with('(')) {
                tokens.pop();
            }
            // Columns behind the name: Average, Err.Est., RMSD, Tot-Drift.
            if tokens.len() < 5 {
                return None;
            }
            let average = tokens[tokens.len() - 4];
            return average.parse::<f64>().ok().map(|_| average.to_string());
        }
        return None;
    }
    None
}

/// Collects the average of `term` from every directory, in order.
///
/// Each directory is resolved against `root`; `on_directory` is called with
/// the directory name before its engine invocation starts. The first failure
/// aborts the collection.
pub fn collect(
    engine: &str,
    root: &Path,
    directories: &[String],
    term: EnergyTerm,
    xvg_name: &str,
    mut on_directory: impl FnMut(&str),
) -> Result<Vec<AverageRecord>, AnalyzeError> {
    let mut records = Vec::with_capacity(directories.len());
    for directory in directories {
        on_directory(directory);
        let average = run_energy(engine, &root.join(directory), term, xvg_name)?;
        debug!("{directory}: average {average}");
        records.push(AverageRecord {
            directory: directory.clone(),
            average,
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY: &str = "\
Statistics over 5000001 steps [ 0.0000 through 10000.0000 ps ], 1 data sets
All statistics are over 500001 points

Energy                      Average   Err.Est.       RMSD  Tot-Drift
-------------------------------------------------------------------------------
Pressure                    1063.43        2.1     145.87   -1.33957  (bar)
";

    #[test]
    fn parses_average_from_statistics_table() {
        assert_eq!(parse_average(SUMMARY).as_deref(), Some("1063.43"));
    }

    #[test]
    fn handles_multi_word_property_names() {
        let summary = "\
Energy                      Average   Err.Est.       RMSD  Tot-Drift
-------------------------------------------------------------------------------
Kinetic En.                 8472.11        3.4     210.02    0.00213  (kJ/mol)
";
        assert_eq!(parse_average(summary).as_deref(), Some("8472.11"));
    }

    #[test]
    fn missing_table_yields_none() {
        assert_eq!(parse_average("Back Off! I just backed up energy.xvg\n"), None);
        assert_eq!(parse_average(""), None);
    }

    #[test]
    fn truncated_statistics_row_yields_none() {
        let summary = "\
Energy                      Average   Err.Est.       RMSD  Tot-Drift
-------------------------------------------------------------------------------
Pressure 1063.43
";
        assert_eq!(parse_average(summary), None);
    }

    #[test]
    fn non_numeric_average_yields_none() {
        let summary = "\
Energy                      Average   Err.Est.       RMSD  Tot-Drift
-------------------------------------------------------------------------------
Pressure nan-ish 2.1 145.87 -1.33957 (bar)
";
        assert_eq!(parse_average(summary), None);
    }

    #[test]
    fn term_codes_match_the_engine_menu() {
        assert_eq!(EnergyTerm::Potential.code(), 7);
        assert_eq!(EnergyTerm::Pressure.code(), 13);
        assert_eq!(EnergyTerm::Density.code(), 19);
        assert_eq!(EnergyTerm::Custom(42).code(), 42);
    }

    #[test]
    fn terms_parse_from_names_and_codes() {
        assert_eq!("pressure".parse::<EnergyTerm>(), Ok(EnergyTerm::Pressure));
        assert_eq!("Density".parse::<EnergyTerm>(), Ok(EnergyTerm::Density));
        assert_eq!("21".parse::<EnergyTerm>(), Ok(EnergyTerm::Custom(21)));
        assert!("entropy".parse::<EnergyTerm>().is_err());
    }

    #[cfg(unix)]
    mod with_stub_engine {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::tempdir;

        fn write_stub(dir: &Path, body: &str) -> String {
            let path = dir.join("gmx-stub");
            fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            let mut perms = fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&path, perms).unwrap();
            path.display().to_string()
        }

        #[test]
        fn collect_gathers_records_in_manifest_order() {
            let root = tempdir().unwrap();
            let stub = write_stub(
                root.path(),
                "cat > /dev/null\n\
                 echo 'Energy Average Err.Est. RMSD Tot-Drift'\n\
                 echo '-----------------------------------------'\n\
                 echo 'Pressure 1063.43 2.1 145.87 -1.33957 (bar)'",
            );
            let dirs = vec!["a_prod".to_string(), "b_prod".to_string()];
            for d in &dirs {
                fs::create_dir(root.path().join(d)).unwrap();
            }

            let mut seen = Vec::new();
            let records = collect(
                &stub,
                root.path(),
                &dirs,
                EnergyTerm::Pressure,
                "pres.xvg",
                |d| seen.push(d.to_string()),
            )
            .unwrap();

            assert_eq!(seen, dirs);
            assert_eq!(records.len(), 2);
            assert_eq!(records[0].directory, "a_prod");
            assert_eq!(records[0].average, "1063.43");
        }

        #[test]
        fn engine_failure_aborts_the_collection() {
            let root = tempdir().unwrap();
            let stub = write_stub(root.path(), "cat > /dev/null\necho doomed >&2\nexit 1");
            fs::create_dir(root.path().join("a_prod")).unwrap();

            let result = collect(
                &stub,
                root.path(),
                &["a_prod".to_string()],
                EnergyTerm::Density,
                "dens.xvg",
                |_| {},
            );
            match result {
                Err(AnalyzeError::EngineFailure { stderr, .. }) => {
                    assert!(stderr.contains("doomed"))
                }
                other => panic!("expected EngineFailure, got {other:?}"),
            }
        }

        #[test]
        fn unparseable_output_is_unexpected_output() {
            let root = tempdir().unwrap();
            let stub = write_stub(root.path(), "cat > /dev/null\necho 'no table here'");
            fs::create_dir(root.path().join("a_prod")).unwrap();

            let result = run_energy(
                &stub,
                &root.path().join("a_prod"),
                EnergyTerm::Pressure,
                "pres.xvg",
            );
            assert!(matches!(
                result,
                Err(AnalyzeError::UnexpectedOutput { .. })
            ));
        }
    }
}
