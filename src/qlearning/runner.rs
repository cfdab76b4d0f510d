//! Q-Learning episode loop execution.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::QlConfig;
use crate::model::{Assignment, Demand, Evaluator, NetworkModel, NodeId, Path};
use crate::solver::{IterationStats, SolveResult, Solver};

/// Learned action values, indexed by (demand, from node, to node)
/// dense indices.
///
/// The table is owned by the run that produced it;
/// [`QlSolver::solve_with_table`] hands it out for convergence
/// inspection.
#[derive(Debug, Clone)]
pub struct QTable {
    values: Vec<f64>,
    num_nodes: usize,
}

impl QTable {
    fn new(num_demands: usize, num_nodes: usize) -> Self {
        Self {
            values: vec![0.0; num_demands * num_nodes * num_nodes],
            num_nodes,
        }
    }

    fn idx(&self, demand: usize, from: usize, to: usize) -> usize {
        (demand * self.num_nodes + from) * self.num_nodes + to
    }

    /// The learned value of hopping `from → to` while routing `demand`.
    /// Indices are dense node indices (see
    /// [`NetworkModel::node_index`]).
    pub fn get(&self, demand: usize, from: usize, to: usize) -> f64 {
        self.values[self.idx(demand, from, to)]
    }

    fn nudge(&mut self, demand: usize, from: usize, to: usize, alpha: f64, target: f64) {
        let i = self.idx(demand, from, to);
        self.values[i] += alpha * (target - self.values[i]);
    }
}

/// Executes tabular Q-Learning over a network instance.
///
/// # Usage
///
/// ```
/// use u_netroute::qlearning::{QlConfig, QlSolver};
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
/// let solver = QlSolver::new(QlConfig::default().with_episodes(300).with_seed(42)).unwrap();
/// let result = solver.solve(&model);
/// assert_eq!(result.best_score, 4.0); // routes 0-1-2
/// ```
#[derive(Debug)]
pub struct QlSolver {
    config: QlConfig,
}

impl QlSolver {
    /// Creates a solver, validating the configuration first.
    pub fn new(config: QlConfig) -> Result<Self, String> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration.
    pub fn config(&self) -> &QlConfig {
        &self.config
    }

    /// Runs with the configured seed and also returns the learned
    /// Q-table.
    pub fn solve_with_table(&self, model: &NetworkModel) -> (SolveResult, QTable) {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        self.run(model, seed)
    }

    fn run(&self, model: &NetworkModel, seed: u64) -> (SolveResult, QTable) {
        let cfg = &self.config;
        let mut rng = StdRng::seed_from_u64(seed);
        let evaluator = Evaluator::new(model);
        let max_hops = cfg.max_hops.unwrap_or_else(|| model.default_max_hops());

        let mut q = QTable::new(model.demands().len(), model.num_nodes());
        let mut best: Option<(Assignment, f64)> = None;
        let mut history = Vec::with_capacity(cfg.episodes);

        for episode in 0..cfg.episodes {
            let epsilon = cfg.epsilon_at(episode);

            let paths: Vec<Option<Path>> = model
                .demands()
                .iter()
                .enumerate()
                .map(|(i, d)| walk_demand(model, &mut q, cfg, i, d, epsilon, max_hops, &mut rng))
                .collect();
            let assignment = Assignment::new(paths);
            let episode_score = evaluator.score(&assignment);

            if best.as_ref().map_or(true, |(_, s)| episode_score < *s) {
                best = Some((assignment, episode_score));
            }
            history.push(IterationStats {
                best: best.as_ref().map(|(_, s)| *s).expect("set above"),
                average: episode_score,
            });
        }

        let (assignment, score) = best.expect("episodes >= 1 is validated");
        (
            SolveResult {
                best: assignment,
                best_score: score,
                history,
                iterations: cfg.episodes,
            },
            q,
        )
    }
}

impl Solver for QlSolver {
    fn name(&self) -> &'static str {
        "q-learning"
    }

    fn solve(&self, model: &NetworkModel) -> SolveResult {
        self.solve_with_table(model).0
    }

    fn solve_seeded(&self, model: &NetworkModel, seed: u64) -> SolveResult {
        self.run(model, seed).0
    }
}

/// Dense index of a node validated at build time.
fn dense(model: &NetworkModel, node: NodeId) -> usize {
    model.node_index(node).expect("node ids are validated at build")
}

/// Simulates one training walk for a demand, updating the Q-table on
/// every transition. Returns the walked path when the destination is
/// reached, `None` on a dead end or hop cutoff.
#[allow(clippy::too_many_arguments)]
fn walk_demand<R: Rng>(
    model: &NetworkModel,
    q: &mut QTable,
    cfg: &QlConfig,
    demand_idx: usize,
    demand: &Demand,
    epsilon: f64,
    max_hops: usize,
    rng: &mut R,
) -> Option<Path> {
    if demand.src == demand.dst {
        return Some(vec![demand.src]);
    }

    let mut path = vec![demand.src];
    let mut visited: HashSet<NodeId> = HashSet::from([demand.src]);
    let mut current = demand.src;
    let mut path_cost = 0.0;
    let mut last_transition: Option<(usize, usize)> = None;
    let mut reached = false;

    for _ in 0..max_hops {
        // Loop avoidance: only unvisited neighbors are valid actions.
        let actions: Vec<NodeId> = model
            .neighbors(current)
            .iter()
            .map(|&(n, _)| n)
            .filter(|n| !visited.contains(n))
            .collect();
        if actions.is_empty() {
            break;
        }

        let cur_i = dense(model, current);
        let next = if rng.random_range(0.0..1.0) < epsilon {
            actions[rng.random_range(0..actions.len())]
        } else {
            greedy_action(model, q, demand_idx, cur_i, &actions)
        };
        let next_i = dense(model, next);
        let edge = model
            .edge_between(current, next)
            .expect("actions come from the adjacency list");

        path_cost += model.edge(edge).cost;
        let mut reward = -model.edge(edge).cost;
        let done = next == demand.dst;
        if done {
            // Cheaper complete paths earn a larger terminal bonus.
            reward += cfg.goal_reward / path_cost.max(1e-6);
        }

        let future = if done {
            0.0
        } else {
            max_future(model, q, demand_idx, next, next_i)
        };
        q.nudge(demand_idx, cur_i, next_i, cfg.alpha, reward + cfg.gamma * future);

        path.push(next);
        visited.insert(next);
        last_transition = Some((cur_i, next_i));
        current = next;
        if done {
            reached = true;
            break;
        }
    }

    if reached {
        Some(path)
    } else {
        // Walk died or ran out of hops: discourage the transition that
        // led here.
        if let Some((from, to)) = last_transition {
            q.nudge(demand_idx, from, to, cfg.alpha, -cfg.dead_end_penalty);
        }
        None
    }
}

/// Highest-valued action; ties go to the lowest node id (the adjacency
/// list is id-sorted and the scan only replaces on strict improvement).
fn greedy_action(
    model: &NetworkModel,
    q: &QTable,
    demand_idx: usize,
    cur_i: usize,
    actions: &[NodeId],
) -> NodeId {
    let mut best = actions[0];
    let mut best_value = q.get(demand_idx, cur_i, dense(model, best));
    for &action in &actions[1..] {
        let value = q.get(demand_idx, cur_i, dense(model, action));
        if value > best_value {
            best_value = value;
            best = action;
        }
    }
    best
}

/// `max_a' Q(next, a')` over all of the next node's neighbors; zero
/// when the node has none.
fn max_future(
    model: &NetworkModel,
    q: &QTable,
    demand_idx: usize,
    next: NodeId,
    next_i: usize,
) -> f64 {
    let neighbors = model.neighbors(next);
    if neighbors.is_empty() {
        return 0.0;
    }
    neighbors
        .iter()
        .map(|&(n, _)| q.get(demand_idx, next_i, dense(model, n)))
        .fold(f64::NEG_INFINITY, f64::max)
}
