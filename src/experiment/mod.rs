//! Comparative experiment driver.
//!
//! Runs any set of [`Solver`](crate::solver::Solver)s against one
//! shared model, capturing results and wall-clock runtimes, and
//! aggregates score statistics over repeated independent runs.

mod runner;

pub use runner::{ExperimentRecord, ExperimentRunner, ExperimentSummary};
