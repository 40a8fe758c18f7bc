//! # Clathra Core Library
//!
//! Automation toolkit for batches of clathrate-hydrate molecular-dynamics
//! simulations driven by an external GROMACS installation. The library
//! prepares sweep inputs and post-processes finished runs; it never
//! re-implements any of the engine's own physics.
//!
//! ## Pipelines
//!
//! Two independent pipelines, each a sequence of single-pass procedures:
//!
//! - **Input generation.** [`mdp`] templates one run-parameter file per
//!   swept pressure or temperature, [`materialize`] builds a working
//!   directory per run, and [`batch`] chains the runs into one queue
//!   submission script.
//!
//! - **Analysis.** [`analyze`] selects finished production runs from a
//!   manifest and scrapes scalar averages out of the engine's energy
//!   subcommand, [`report`] writes them as fixed-width text, and [`plot`]
//!   turns two such reports into an XY figure.
//!
//! Everything is synchronous and fail-fast: the first engine failure,
//! malformed template line or already-existing run directory aborts the
//! operation.

pub mod analyze;
pub mod batch;
pub mod materialize;
pub mod mdp;
pub mod plot;
pub mod report;
