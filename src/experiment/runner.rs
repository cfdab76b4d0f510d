//! Experiment execution and aggregation.

use std::time::{Duration, Instant};

use crate::model::NetworkModel;
use crate::solver::{SolveResult, Solver};

/// One solver's outcome in a comparison pass.
#[derive(Debug, Clone)]
pub struct ExperimentRecord {
    /// The solver's [`name`](Solver::name).
    pub solver: &'static str,
    /// The full run result, including the score trace.
    pub result: SolveResult,
    /// Wall-clock time the run took.
    pub runtime: Duration,
}

/// Aggregated statistics over repeated independent runs of one solver.
#[derive(Debug, Clone)]
pub struct ExperimentSummary {
    /// The solver's [`name`](Solver::name).
    pub solver: &'static str,
    /// Number of independent runs aggregated.
    pub runs: usize,
    /// Lowest (best) final score across runs.
    pub best_score: f64,
    /// Highest (worst) final score across runs.
    pub worst_score: f64,
    /// Mean final score across runs.
    pub mean_score: f64,
    /// Sample standard deviation of final scores (0.0 for one run).
    pub std_dev_score: f64,
    /// Mean wall-clock runtime per run.
    pub mean_runtime: Duration,
    /// The individual runs behind the statistics.
    pub records: Vec<ExperimentRecord>,
}

/// Drives a set of solvers over one network instance.
///
/// # Examples
///
/// ```
/// use u_netroute::aco::{AcoConfig, AcoSolver};
/// use u_netroute::experiment::ExperimentRunner;
/// use u_netroute::ga::{GaConfig, GaSolver};
/// use u_netroute::model::{Demand, Edge, NetworkModel};
///
/// let model = NetworkModel::build(
///     vec![0, 1, 2],
///     vec![
///         Edge::new(0, 1, 5.0, 1.0),
///         Edge::new(1, 2, 5.0, 1.0),
///         Edge::new(0, 2, 5.0, 5.0),
///     ],
///     vec![Demand::new(0, 2, 2.0)],
/// )
/// .unwrap();
///
/// let runner = ExperimentRunner::new(&model)
///     .with_solver(GaSolver::new(GaConfig::default().with_seed(1)).unwrap())
///     .with_solver(AcoSolver::new(AcoConfig::default().with_seed(1)).unwrap());
///
/// let records = runner.run();
/// assert_eq!(records.len(), 2);
/// ```
pub struct ExperimentRunner<'a> {
    model: &'a NetworkModel,
    solvers: Vec<Box<dyn Solver>>,
}

impl<'a> ExperimentRunner<'a> {
    /// Creates a runner with no solvers registered yet.
    pub fn new(model: &'a NetworkModel) -> Self {
        Self {
            model,
            solvers: Vec::new(),
        }
    }

    /// Registers a solver for the comparison.
    pub fn with_solver(mut self, solver: impl Solver + 'static) -> Self {
        self.solvers.push(Box::new(solver));
        self
    }

    /// Number of registered solvers.
    pub fn num_solvers(&self) -> usize {
        self.solvers.len()
    }

    /// Runs every registered solver once with its configured seed.
    pub fn run(&self) -> Vec<ExperimentRecord> {
        self.solvers
            .iter()
            .map(|solver| {
                let started = Instant::now();
                let result = solver.solve(self.model);
                ExperimentRecord {
                    solver: solver.name(),
                    result,
                    runtime: started.elapsed(),
                }
            })
            .collect()
    }

    /// Runs every solver `runs` times with derived seeds
    /// (`base_seed + run index`) and aggregates score statistics per
    /// solver.
    pub fn run_repeated(&self, runs: usize, base_seed: u64) -> Vec<ExperimentSummary> {
        self.solvers
            .iter()
            .map(|solver| {
                let records: Vec<ExperimentRecord> = (0..runs)
                    .map(|i| {
                        let started = Instant::now();
                        let result =
                            solver.solve_seeded(self.model, base_seed.wrapping_add(i as u64));
                        ExperimentRecord {
                            solver: solver.name(),
                            result,
                            runtime: started.elapsed(),
                        }
                    })
                    .collect();
                summarize(solver.name(), records)
            })
            .collect()
    }
}

fn summarize(solver: &'static str, records: Vec<ExperimentRecord>) -> ExperimentSummary {
    let runs = records.len();
    let scores: Vec<f64> = records.iter().map(|r| r.result.best_score).collect();

    let mean = scores.iter().sum::<f64>() / runs.max(1) as f64;
    let std_dev = if runs > 1 {
        let variance =
            scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (runs - 1) as f64;
        variance.sqrt()
    } else {
        0.0
    };
    let total_runtime: Duration = records.iter().map(|r| r.runtime).sum();

    ExperimentSummary {
        solver,
        runs,
        best_score: scores.iter().copied().fold(f64::INFINITY, f64::min),
        worst_score: scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        mean_score: mean,
        std_dev_score: std_dev,
        mean_runtime: if runs > 0 {
            total_runtime / runs as u32
        } else {
            Duration::ZERO
        },
        records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aco::{AcoConfig, AcoSolver};
    use crate::ga::{GaConfig, GaSolver};
    use crate::model::{Demand, Edge};
    use crate::qlearning::{QlConfig, QlSolver};

    /// The comparison scenario: 3 nodes, a cheap two-hop route and an
    /// expensive direct edge, one demand of flow 2.
    fn abc_model() -> NetworkModel {
        NetworkModel::build(
            vec![0, 1, 2],
            vec![
                Edge::new(0, 1, 5.0, 1.0),
                Edge::new(1, 2, 5.0, 1.0),
                Edge::new(0, 2, 5.0, 5.0),
            ],
            vec![Demand::new(0, 2, 2.0)],
        )
        .unwrap()
    }

    fn all_solvers(model: &NetworkModel) -> ExperimentRunner<'_> {
        ExperimentRunner::new(model)
            .with_solver(
                GaSolver::new(
                    GaConfig::default()
                        .with_population_size(30)
                        .with_generations(40)
                        .with_seed(42),
                )
                .unwrap(),
            )
            .with_solver(AcoSolver::new(AcoConfig::default().with_seed(42)).unwrap())
            .with_solver(
                QlSolver::new(QlConfig::default().with_episodes(400).with_seed(42)).unwrap(),
            )
    }

    #[test]
    fn test_all_solvers_find_the_cheap_route() {
        let model = abc_model();
        let records = all_solvers(&model).run();

        assert_eq!(records.len(), 3);
        for record in &records {
            assert_eq!(
                record.result.best_score, 4.0,
                "{} missed the optimum",
                record.solver
            );
            assert_eq!(
                record.result.best.path(0),
                Some(&vec![0, 1, 2]),
                "{} routed the expensive direct edge",
                record.solver
            );
        }
        let names: Vec<_> = records.iter().map(|r| r.solver).collect();
        assert_eq!(names, vec!["genetic", "ant-colony", "q-learning"]);
    }

    #[test]
    fn test_trivial_direct_edges_hit_the_floor() {
        // Every demand has its own slack direct edge; the optimum is
        // simply the sum of direct-edge costs, and each solver must
        // reach exactly that floor.
        let model = NetworkModel::build(
            vec![0, 1, 2, 3],
            vec![
                Edge::new(0, 1, 10.0, 2.0),
                Edge::new(2, 3, 10.0, 3.0),
                Edge::new(1, 2, 10.0, 4.0),
            ],
            vec![Demand::new(0, 1, 1.0), Demand::new(2, 3, 2.0)],
        )
        .unwrap();
        let floor = crate::model::Evaluator::new(&model).score(&crate::model::Assignment::new(
            vec![Some(vec![0, 1]), Some(vec![2, 3])],
        ));
        assert_eq!(floor, 2.0 + 6.0);

        for record in all_solvers(&model).run() {
            assert_eq!(
                record.result.best_score, floor,
                "{} missed the optimality floor",
                record.solver
            );
        }
    }

    #[test]
    fn test_run_repeated_aggregates() {
        let model = abc_model();
        let runner = ExperimentRunner::new(&model).with_solver(
            AcoSolver::new(AcoConfig::default().with_iterations(15)).unwrap(),
        );

        let summaries = runner.run_repeated(4, 7);
        assert_eq!(summaries.len(), 1);
        let summary = &summaries[0];

        assert_eq!(summary.runs, 4);
        assert_eq!(summary.records.len(), 4);
        assert!(summary.best_score <= summary.mean_score);
        assert!(summary.mean_score <= summary.worst_score);
        assert!(summary.std_dev_score >= 0.0);
        // Every seeded run on this instance converges to the optimum.
        assert_eq!(summary.best_score, 4.0);
    }

    #[test]
    fn test_run_repeated_is_reproducible() {
        let model = abc_model();
        let runner = ExperimentRunner::new(&model).with_solver(
            GaSolver::new(
                GaConfig::default()
                    .with_population_size(20)
                    .with_generations(20),
            )
            .unwrap(),
        );

        let a = runner.run_repeated(3, 99);
        let b = runner.run_repeated(3, 99);
        for (x, y) in a[0].records.iter().zip(b[0].records.iter()) {
            assert_eq!(x.result, y.result);
        }
        assert_eq!(a[0].mean_score, b[0].mean_score);
    }

    #[test]
    fn test_single_run_has_zero_std_dev() {
        let model = abc_model();
        let runner = ExperimentRunner::new(&model)
            .with_solver(AcoSolver::new(AcoConfig::default()).unwrap());

        let summaries = runner.run_repeated(1, 0);
        assert_eq!(summaries[0].std_dev_score, 0.0);
    }

    #[test]
    fn test_empty_runner() {
        let model = abc_model();
        let runner = ExperimentRunner::new(&model);
        assert_eq!(runner.num_solvers(), 0);
        assert!(runner.run().is_empty());
    }
}
