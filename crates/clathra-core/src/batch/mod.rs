//! Queue-script assembly for chained equilibration/production runs.
//!
//! A batch covers the whole sweep: the runs are ordered, then stitched into
//! a single submission script in which each run hands its final coordinates
//! and checkpoint to the next. Each scheduled run carries an explicit
//! [`RunKind`] tag; the invocation form of a transition is decided by the
//! kind of the run being entered, never by its position in the list.

pub mod script;

pub use script::{generate, BatchError};

/// Which leg of a run a scheduled entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Equilibration,
    Production,
}

/// One entry in the batch schedule: the run directory name and its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledRun {
    pub name: String,
    pub kind: RunKind,
}

impl ScheduledRun {
    pub fn new(name: impl Into<String>, kind: RunKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Builds the combined batch schedule from the equilibration and production
/// run names of a sweep.
///
/// The combined list is sorted by name, which for the `{p}GPa_{T}K_{eq|prod}`
/// naming scheme interleaves each condition's equilibration directly before
/// its production run.
pub fn chain_runs(equilibration: &[String], production: &[String]) -> Vec<ScheduledRun> {
    let mut runs: Vec<ScheduledRun> = equilibration
        .iter()
        .map(|n| ScheduledRun::new(n.clone(), RunKind::Equilibration))
        .chain(
            production
                .iter()
                .map(|n| ScheduledRun::new(n.clone(), RunKind::Production)),
        )
        .collect();
    runs.sort_by(|a, b| a.name.cmp(&b.name));
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_runs_interleaves_eq_and_prod_per_condition() {
        let eq = vec!["0.1GPa_130K_eq".to_string(), "0.2GPa_130K_eq".to_string()];
        let prod = vec![
            "0.1GPa_130K_prod".to_string(),
            "0.2GPa_130K_prod".to_string(),
        ];
        let schedule = chain_runs(&eq, &prod);

        let names: Vec<&str> = schedule.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "0.1GPa_130K_eq",
                "0.1GPa_130K_prod",
                "0.2GPa_130K_eq",
                "0.2GPa_130K_prod",
            ]
        );
        let kinds: Vec<RunKind> = schedule.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RunKind::Equilibration,
                RunKind::Production,
                RunKind::Equilibration,
                RunKind::Production,
            ]
        );
    }
}
