//! Common solver interface.
//!
//! The three algorithms share one capability: given a model and their
//! configured budget, produce the best assignment found plus a score
//! trace. Expressing it as a trait lets
//! [`ExperimentRunner`](crate::experiment::ExperimentRunner) drive any
//! mix of solvers over the same instance.

use crate::model::{Assignment, NetworkModel};

/// Scores observed in one iteration (a GA generation, an ACO colony
/// iteration, or a Q-learning episode).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IterationStats {
    /// Best score found so far, as of the end of this iteration.
    pub best: f64,
    /// Mean score of the candidates produced during this iteration.
    pub average: f64,
}

/// Outcome of a solver run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolveResult {
    /// Best candidate found during the entire run.
    pub best: Assignment,
    /// Score of `best` under the shared evaluator. Lower is better.
    pub best_score: f64,
    /// Per-iteration trace for convergence analysis.
    pub history: Vec<IterationStats>,
    /// Number of iterations (generations/episodes) executed.
    pub iterations: usize,
}

/// A routing optimizer over a [`NetworkModel`].
///
/// Implementations validate their hyperparameters at construction and
/// run a fixed, bounded budget per [`solve`](Solver::solve) call.
/// Given the same model, configuration, and seed, a run is bit-for-bit
/// reproducible.
pub trait Solver {
    /// Short algorithm name used in experiment reports.
    fn name(&self) -> &'static str;

    /// Runs the configured optimization against `model`.
    fn solve(&self, model: &NetworkModel) -> SolveResult;

    /// Runs with the configured parameters but an explicit seed.
    ///
    /// Used by the experiment runner to perform independent
    /// repetitions of the same configuration.
    fn solve_seeded(&self, model: &NetworkModel, seed: u64) -> SolveResult;
}
