//! ACO colony loop execution.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::AcoConfig;
use crate::model::{Assignment, Demand, EdgeId, Evaluator, NetworkModel, NodeId, Path};
use crate::solver::{IterationStats, SolveResult, Solver};

/// Executes the ant colony over a network instance.
///
/// # Usage
///
/// ```
/// use u_netroute::aco::{AcoConfig, AcoSolver};
/// use u_netroute::model::{Demand, Edge, NetworkModel};
/// use u_netroute::solver::Solver;
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
/// let solver = AcoSolver::new(AcoConfig::default().with_seed(42)).unwrap();
/// let result = solver.solve(&model);
/// assert_eq!(result.best_score, 4.0); // routes 0-1-2
/// ```
#[derive(Debug)]
pub struct AcoSolver {
    config: AcoConfig,
}

impl AcoSolver {
    /// Creates a solver, validating the configuration first.
    pub fn new(config: AcoConfig) -> Result<Self, String> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration.
    pub fn config(&self) -> &AcoConfig {
        &self.config
    }

    fn run(&self, model: &NetworkModel, seed: u64) -> SolveResult {
        let cfg = &self.config;
        let mut rng = StdRng::seed_from_u64(seed);
        let evaluator = Evaluator::new(model);
        let max_hops = cfg.max_hops.unwrap_or_else(|| model.default_max_hops());

        let mut pheromone = vec![cfg.initial_pheromone; model.edges().len()];

        let mut best: Option<(Assignment, f64)> = None;
        let mut history = Vec::with_capacity(cfg.iterations);

        for _ in 0..cfg.iterations {
            // All ants read the same pheromone table; the update only
            // happens after the last ant finishes.
            let mut solutions = Vec::with_capacity(cfg.ants);
            for _ in 0..cfg.ants {
                let assignment = construct(model, &pheromone, cfg, max_hops, &mut rng);
                let score = evaluator.score(&assignment);
                solutions.push((assignment, score));
            }

            let mut iter_best_idx = 0;
            for i in 1..solutions.len() {
                if solutions[i].1 < solutions[iter_best_idx].1 {
                    iter_best_idx = i;
                }
            }
            let iter_best_score = solutions[iter_best_idx].1;

            if best.as_ref().map_or(true, |(_, s)| iter_best_score < *s) {
                best = Some((solutions[iter_best_idx].0.clone(), iter_best_score));
            }

            update_pheromones(
                &mut pheromone,
                model,
                &solutions[iter_best_idx].0,
                iter_best_score,
                cfg,
            );

            let average =
                solutions.iter().map(|s| s.1).sum::<f64>() / solutions.len() as f64;
            history.push(IterationStats {
                best: best.as_ref().map(|(_, s)| *s).expect("set above"),
                average,
            });
        }

        let (assignment, score) = best.expect("iterations >= 1 is validated");
        SolveResult {
            best: assignment,
            best_score: score,
            history,
            iterations: cfg.iterations,
        }
    }
}

impl Solver for AcoSolver {
    fn name(&self) -> &'static str {
        "ant-colony"
    }

    fn solve(&self, model: &NetworkModel) -> SolveResult {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        self.run(model, seed)
    }

    fn solve_seeded(&self, model: &NetworkModel, seed: u64) -> SolveResult {
        self.run(model, seed)
    }
}

/// One ant builds a full candidate: one constructed path per demand.
fn construct<R: Rng>(
    model: &NetworkModel,
    pheromone: &[f64],
    cfg: &AcoConfig,
    max_hops: usize,
    rng: &mut R,
) -> Assignment {
    let paths = model
        .demands()
        .iter()
        .map(|d| construct_path(model, pheromone, cfg, d, max_hops, rng))
        .collect();
    Assignment::new(paths)
}

/// Probabilistic walk from the demand's source: next hop drawn among
/// unvisited neighbors whose link can carry the demand on its own,
/// weighted by τ^α · η^β with η = 1 / (edge cost + 0.1). Dead ends and
/// the hop bound yield a failed (unrouted) path.
fn construct_path<R: Rng>(
    model: &NetworkModel,
    pheromone: &[f64],
    cfg: &AcoConfig,
    demand: &Demand,
    max_hops: usize,
    rng: &mut R,
) -> Option<Path> {
    if demand.src == demand.dst {
        return Some(vec![demand.src]);
    }
    let mut path = vec![demand.src];
    let mut visited: HashSet<NodeId> = HashSet::from([demand.src]);
    let mut current = demand.src;

    for _ in 0..max_hops {
        let candidates: Vec<(NodeId, EdgeId)> = model
            .neighbors(current)
            .iter()
            .copied()
            .filter(|&(n, e)| !visited.contains(&n) && model.edge(e).capacity >= demand.flow)
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let weights: Vec<f64> = candidates
            .iter()
            .map(|&(_, e)| {
                let tau = pheromone[e];
                let eta = 1.0 / (model.edge(e).cost + 0.1);
                tau.powf(cfg.alpha) * eta.powf(cfg.beta)
            })
            .collect();

        let next = candidates[roulette_index(&weights, rng)].0;
        path.push(next);
        if next == demand.dst {
            return Some(path);
        }
        visited.insert(next);
        current = next;
    }
    None
}

/// Roulette draw over non-negative weights; falls back to a uniform
/// draw when every weight vanishes.
fn roulette_index<R: Rng>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return rng.random_range(0..weights.len());
    }
    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }
    weights.len() - 1 // floating-point fallback
}

/// Evaporates every edge, then reinforces the iteration-best
/// candidate's edges proportionally to its inverse score.
fn update_pheromones(
    pheromone: &mut [f64],
    model: &NetworkModel,
    best: &Assignment,
    score: f64,
    cfg: &AcoConfig,
) {
    for tau in pheromone.iter_mut() {
        *tau *= 1.0 - cfg.evaporation;
        if *tau < cfg.min_pheromone {
            *tau = cfg.min_pheromone;
        }
    }

    let deposit = cfg.deposit / score.max(1e-9);
    for path in best.paths().iter().flatten() {
        for pair in path.windows(2) {
            if let Some(eid) = model.edge_between(pair[0], pair[1]) {
                pheromone[eid] += deposit;
            }
        }
    }
}
