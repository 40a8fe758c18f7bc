use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

use super::sweep::RunPhase;

/// Column width for re-emitted parameter lines.
///
/// GROMACS itself is whitespace-insensitive; the fixed width only keeps the
/// generated files aligned the way hand-written ones are.
pub const MDP_COLUMN_WIDTH: usize = 24;

/// Token position of the value in a `keyword = value` line.
const VALUE_POSITION: usize = 2;

/// Barostat algorithm token used during equilibration.
const EQUILIBRATION_BAROSTAT: &str = "berendsen";
/// Barostat algorithm token substituted for production runs.
const PRODUCTION_BAROSTAT: &str = "parrinello-rahman";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed template line {line}: no token at position {position}: '{content}'")]
    MalformedLine {
        line: usize,
        position: usize,
        content: String,
    },

    #[error("Keyword '{0}' not found in template")]
    MissingKeyword(String),
}

/// A run-parameter file held as an ordered list of text lines.
///
/// Lines are matched by substring, mirroring how the files are written in
/// practice: the keyword is the first token, so a keyword search only ever
/// hits its own line. Unknown lines pass through untouched (modulo column
/// re-alignment on output).
#[derive(Debug, Clone, Default)]
pub struct MdpTemplate {
    lines: Vec<String>,
}

impl MdpTemplate {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TemplateError> {
        let file = File::open(path)?;
        Self::parse(&mut BufReader::new(file))
    }

    pub fn parse(reader: &mut impl BufRead) -> Result<Self, TemplateError> {
        let mut lines = Vec::new();
        for line in reader.lines() {
            lines.push(line?);
        }
        Ok(Self { lines })
    }

    /// Returns the value token of the first line containing `keyword`.
    pub fn value_of(&self, keyword: &str) -> Result<&str, TemplateError> {
        for (index, line) in self.lines.iter().enumerate() {
            if line.contains(keyword) {
                return token_at(line, VALUE_POSITION, index + 1);
            }
        }
        Err(TemplateError::MissingKeyword(keyword.to_string()))
    }

    /// Rewrites the value token on every line containing `keyword`.
    ///
    /// Returns the number of lines rewritten; zero means the keyword is
    /// absent, which callers treat as a no-op.
    pub fn set_value(&mut self, keyword: &str, value: &str) -> Result<usize, TemplateError> {
        let mut rewritten = 0;
        for index in 0..self.lines.len() {
            if self.lines[index].contains(keyword) {
                self.lines[index] =
                    replace_token(&self.lines[index], VALUE_POSITION, value, index + 1)?;
                rewritten += 1;
            }
        }
        Ok(rewritten)
    }

    /// Applies the equilibration/production policy to the template.
    ///
    /// Production runs switch the weak-coupling barostat to
    /// `parrinello-rahman`, continue from the equilibration state
    /// (`continuation = yes`) and stop regenerating velocities
    /// (`gen-vel = no`). Equilibration runs drop the barostat line and leave
    /// everything else alone.
    pub fn apply_phase(&mut self, phase: RunPhase) -> Result<(), TemplateError> {
        let production = phase == RunPhase::Production;
        let mut kept = Vec::with_capacity(self.lines.len());

        for (index, line) in self.lines.iter().enumerate() {
            let number = index + 1;
            if line.contains(EQUILIBRATION_BAROSTAT) {
                if production {
                    kept.push(replace_token(
                        line,
                        VALUE_POSITION,
                        PRODUCTION_BAROSTAT,
                        number,
                    )?);
                }
                // Equilibration keeps pressure coupling out of the file.
                continue;
            }
            if line.contains("continuation")
                && production
                && token_at(line, VALUE_POSITION, number)? == "no"
            {
                kept.push(replace_token(line, VALUE_POSITION, "yes", number)?);
                continue;
            }
            if line.contains("gen-vel")
                && production
                && token_at(line, VALUE_POSITION, number)? == "yes"
            {
                kept.push(replace_token(line, VALUE_POSITION, "no", number)?);
                continue;
            }
            kept.push(line.clone());
        }

        self.lines = kept;
        Ok(())
    }

    /// Writes every line with its tokens left-justified to
    /// [`MDP_COLUMN_WIDTH`] columns.
    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        for line in &self.lines {
            writeln!(writer, "{}", justify(line))?;
        }
        Ok(())
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), TemplateError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        Ok(writer.flush()?)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

fn token_at(line: &str, position: usize, number: usize) -> Result<&str, TemplateError> {
    line.split_whitespace()
        .nth(position)
        .ok_or_else(|| TemplateError::MalformedLine {
            line: number,
            position,
            content: line.to_string(),
        })
}

fn replace_token(
    line: &str,
    position: usize,
    value: &str,
    number: usize,
) -> Result<String, TemplateError> {
    let mut tokens: Vec<&str> = line.split_whitespace().collect();
    if position >= tokens.len() {
        return Err(TemplateError::MalformedLine {
            line: number,
            position,
            content: line.to_string(),
        });
    }
    tokens[position] = value;
    Ok(tokens.join(" "))
}

fn justify(line: &str) -> String {
    let mut out = String::new();
    for token in line.split_whitespace() {
        out.push_str(&format!("{:<width$}", token, width = MDP_COLUMN_WIDTH));
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn template(content: &str) -> MdpTemplate {
        MdpTemplate::parse(&mut Cursor::new(content)).unwrap()
    }

    const EQ_TEMPLATE: &str = "\
integrator = md
dt = 0.002
pcoupl = berendsen
ref-p = 1.0
ref-t = 130
gen-temp = 130
continuation = no
gen-vel = yes
";

    #[test]
    fn value_of_reads_the_third_token() {
        let t = template(EQ_TEMPLATE);
        assert_eq!(t.value_of("ref-t").unwrap(), "130");
        assert_eq!(t.value_of("ref-p").unwrap(), "1.0");
    }

    #[test]
    fn value_of_fails_for_unknown_keyword() {
        let t = template(EQ_TEMPLATE);
        assert!(matches!(
            t.value_of("tau-p"),
            Err(TemplateError::MissingKeyword(_))
        ));
    }

    #[test]
    fn set_value_rewrites_all_matching_lines() {
        let mut t = template("ref-t = 130\nother = 1\nref-t = 130\n");
        assert_eq!(t.set_value("ref-t", "200").unwrap(), 2);
        assert_eq!(t.value_of("ref-t").unwrap(), "200");
        assert_eq!(t.lines()[2], "ref-t = 200");
    }

    #[test]
    fn short_line_is_a_malformed_line_error() {
        let mut t = template("continuation\n");
        let err = t.apply_phase(RunPhase::Production).unwrap_err();
        assert!(matches!(
            err,
            TemplateError::MalformedLine { line: 1, .. }
        ));
    }

    #[test]
    fn production_phase_flips_barostat_continuation_and_gen_vel() {
        let mut t = template(EQ_TEMPLATE);
        t.apply_phase(RunPhase::Production).unwrap();
        assert_eq!(t.value_of("pcoupl").unwrap(), "parrinello-rahman");
        assert_eq!(t.value_of("continuation").unwrap(), "yes");
        assert_eq!(t.value_of("gen-vel").unwrap(), "no");
    }

    #[test]
    fn equilibration_phase_drops_the_barostat_line_only() {
        let mut t = template(EQ_TEMPLATE);
        t.apply_phase(RunPhase::Equilibration).unwrap();
        assert!(!t.lines().iter().any(|l| l.contains("berendsen")));
        assert!(!t.lines().iter().any(|l| l.contains(PRODUCTION_BAROSTAT)));
        assert_eq!(t.value_of("continuation").unwrap(), "no");
        assert_eq!(t.value_of("gen-vel").unwrap(), "yes");
    }

    #[test]
    fn write_to_left_justifies_tokens() {
        let t = template("ref-p = 1.0\n");
        let mut out = Vec::new();
        t.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            format!("{:<24}{:<24}{}\n", "ref-p", "=", "1.0")
        );
    }

    #[test]
    fn write_then_reparse_is_stable() {
        let t = template(EQ_TEMPLATE);
        let mut out = Vec::new();
        t.write_to(&mut out).unwrap();
        let reparsed = MdpTemplate::parse(&mut Cursor::new(out)).unwrap();
        assert_eq!(reparsed.value_of("gen-temp").unwrap(), "130");
        assert_eq!(reparsed.lines().len(), t.lines().len());
    }
}
