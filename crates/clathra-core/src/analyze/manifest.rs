use std::fs;
use std::path::Path;

use super::AnalyzeError;

/// Reads the run manifest and returns the directory names selected for
/// analysis, in file order.
///
/// A line is selected iff it contains `marker` and does not contain `#`;
/// a `#` anywhere disables the line, so `# prod_old` stays excluded even
/// though it carries the marker. Names are taken with surrounding
/// whitespace trimmed.
pub fn select(path: &Path, marker: &str) -> Result<Vec<String>, AnalyzeError> {
    let content = fs::read_to_string(path).map_err(|source| AnalyzeError::Manifest {
        path: path.display().to_string(),
        source,
    })?;

    Ok(content
        .lines()
        .filter(|line| line.contains(marker) && !line.contains('#'))
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn manifest(content: &str) -> Vec<String> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dirs.txt");
        std::fs::write(&path, content).unwrap();
        select(&path, "prod").unwrap()
    }

    #[test]
    fn keeps_marker_lines_in_order() {
        let selected = manifest(
            "0.1GPa_130K_eq\n0.1GPa_130K_prod\n0.2GPa_130K_eq\n0.2GPa_130K_prod\n",
        );
        assert_eq!(selected, vec!["0.1GPa_130K_prod", "0.2GPa_130K_prod"]);
    }

    #[test]
    fn commented_lines_are_excluded_even_with_marker() {
        let selected = manifest("# prod_dir_disabled\nprod_dir_ok\n");
        assert_eq!(selected, vec!["prod_dir_ok"]);
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let dir = tempdir().unwrap();
        let result = select(&dir.path().join("nope.txt"), "prod");
        assert!(matches!(result, Err(AnalyzeError::Manifest { .. })));
    }
}
