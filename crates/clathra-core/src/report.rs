//! Fixed-width columnar report files.
//!
//! Reports are consumed by plotting tools that follow the xmgrace text
//! conventions: `#` and `@` lines are metadata, everything else is a
//! whitespace-delimited table. The column width is an explicit serialization
//! constant, not an artifact of any type's string conversion.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::analyze::AverageRecord;

/// Width every report column is left-justified to.
pub const REPORT_COLUMN_WIDTH: usize = 24;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error for '{path}': {source}")]
    Io { path: String, source: io::Error },

    #[error("Line {line} of '{path}' has no column {column}")]
    MissingColumn {
        path: String,
        line: usize,
        column: usize,
    },

    #[error("Line {line} of '{path}': column {column} is not numeric: '{value}'")]
    BadValue {
        path: String,
        line: usize,
        column: usize,
        value: String,
    },
}

/// Writes one header line followed by one fixed-width row per record.
///
/// Averages are written verbatim; whatever text the collector scraped is
/// what lands in the file.
pub fn write(
    writer: &mut impl Write,
    header: &str,
    records: &[AverageRecord],
) -> io::Result<()> {
    writeln!(writer, "{header}")?;
    for record in records {
        writeln!(
            writer,
            "{:<width$}{:<width$}",
            record.directory,
            record.average,
            width = REPORT_COLUMN_WIDTH
        )?;
    }
    Ok(())
}

pub fn write_to_path(
    path: &Path,
    header: &str,
    records: &[AverageRecord],
) -> Result<(), ReportError> {
    let io_err = |source| ReportError::Io {
        path: path.display().to_string(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    write(&mut writer, header, records).map_err(io_err)?;
    writer.flush().map_err(io_err)
}

/// Reads one numeric column from a report file.
///
/// Lines starting with `@` or `#` are metadata and skipped, as are blank
/// lines. Every remaining line must have a parseable number in `column`;
/// short or non-numeric rows fail loudly rather than being dropped.
pub fn read_column(path: &Path, column: usize) -> Result<Vec<f64>, ReportError> {
    let content = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let mut values = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.starts_with('@') || line.starts_with('#') || line.trim().is_empty() {
            continue;
        }
        let value = line.split_whitespace().nth(column).ok_or_else(|| {
            ReportError::MissingColumn {
                path: path.display().to_string(),
                line: index + 1,
                column,
            }
        })?;
        let parsed = value.parse::<f64>().map_err(|_| ReportError::BadValue {
            path: path.display().to_string(),
            line: index + 1,
            column,
            value: value.to_string(),
        })?;
        values.push(parsed);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn records() -> Vec<AverageRecord> {
        vec![
            AverageRecord {
                directory: "0.1GPa_130K_prod".to_string(),
                average: "1063.43".to_string(),
            },
            AverageRecord {
                directory: "0.2GPa_130K_prod".to_string(),
                average: "2011.87".to_string(),
            },
        ]
    }

    #[test]
    fn reparsing_reproduces_the_exact_pairs_in_order() {
        let mut out = Vec::new();
        write(&mut out, "# Source folder; Pressure (bar)", &records()).unwrap();
        let text = String::from_utf8(out).unwrap();

        let reparsed: Vec<(&str, &str)> = text
            .lines()
            .skip(1)
            .map(|line| {
                let mut tokens = line.split_whitespace();
                (tokens.next().unwrap(), tokens.next().unwrap())
            })
            .collect();
        assert_eq!(
            reparsed,
            vec![
                ("0.1GPa_130K_prod", "1063.43"),
                ("0.2GPa_130K_prod", "2011.87"),
            ]
        );
    }

    #[test]
    fn rows_are_left_justified_to_the_column_width() {
        let mut out = Vec::new();
        write(&mut out, "# header", &records()[..1]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert!(row.starts_with(&format!("{:<24}", "0.1GPa_130K_prod")));
        assert_eq!(row.len(), 48);
    }

    #[test]
    fn read_column_skips_metadata_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pressures.dat");
        std::fs::write(
            &path,
            "# Source folder; Pressure (bar)\n\
             @ xaxis label \"run\"\n\
             0.1GPa_130K_prod        1063.43\n\
             0.2GPa_130K_prod        2011.87\n",
        )
        .unwrap();

        assert_eq!(read_column(&path, 1).unwrap(), vec![1063.43, 2011.87]);
    }

    #[test]
    fn non_numeric_column_fails_loudly() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.dat");
        std::fs::write(&path, "# header\ndir_prod not-a-number\n").unwrap();
        assert!(matches!(
            read_column(&path, 1),
            Err(ReportError::BadValue { line: 2, .. })
        ));
    }

    #[test]
    fn short_row_is_a_missing_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.dat");
        std::fs::write(&path, "lonely\n").unwrap();
        assert!(matches!(
            read_column(&path, 1),
            Err(ReportError::MissingColumn { column: 1, .. })
        ));
    }
}
