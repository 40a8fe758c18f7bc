//! Generation of GROMACS run-parameter (`.mdp`) files.
//!
//! An `.mdp` file is an ordered sequence of `keyword = value` lines. This
//! module models such a file as a line-oriented template ([`template`]) and
//! drives sweeps of pressure or temperature conditions over it ([`sweep`]),
//! producing one parameter file per condition.

pub mod sweep;
pub mod template;

pub use sweep::{RunPhase, SweepAxis};
pub use template::{MdpTemplate, TemplateError, MDP_COLUMN_WIDTH};
