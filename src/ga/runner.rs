//! GA evolutionary loop execution.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::config::GaConfig;
use crate::model::{Assignment, Demand, Evaluator, NetworkModel, NodeId, Path};
use crate::solver::{IterationStats, SolveResult, Solver};

/// A scored member of the population.
#[derive(Debug, Clone)]
struct Individual {
    assignment: Assignment,
    score: f64,
}

/// Executes the GA over a network instance.
///
/// # Usage
///
/// ```
/// use u_netroute::ga::{GaConfig, GaSolver};
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
/// let solver = GaSolver::new(GaConfig::default().with_seed(42)).unwrap();
/// let result = solver.solve(&model);
/// assert_eq!(result.best_score, 4.0); // routes 0-1-2
/// ```
#[derive(Debug)]
pub struct GaSolver {
    config: GaConfig,
}

impl GaSolver {
    /// Creates a solver, validating the configuration first.
    pub fn new(config: GaConfig) -> Result<Self, String> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration.
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    fn run(&self, model: &NetworkModel, seed: u64) -> SolveResult {
        let cfg = &self.config;
        let mut rng = StdRng::seed_from_u64(seed);
        let evaluator = Evaluator::new(model);
        let max_hops = cfg.max_hops.unwrap_or_else(|| model.default_max_hops());

        // 1. Initial population of random walks
        let mut population: Vec<Individual> = (0..cfg.population_size)
            .map(|_| Individual {
                assignment: random_assignment(model, max_hops, cfg.walk_retries, &mut rng),
                score: f64::INFINITY,
            })
            .collect();
        evaluate_individuals(&evaluator, &mut population, cfg.parallel);

        let mut best = best_of(&population).clone();
        let mut history = Vec::with_capacity(cfg.generations + 1);
        history.push(IterationStats {
            best: best.score,
            average: mean_score(&population),
        });

        // 2. Generational loop
        for _ in 0..cfg.generations {
            // Stable sort keeps insertion order between equal scores.
            population.sort_by(|a, b| {
                a.score
                    .partial_cmp(&b.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let elite_count = (cfg.population_size as f64 * cfg.elite_ratio) as usize;
            let mut next_gen: Vec<Individual> = population[..elite_count].to_vec();

            let scores: Vec<f64> = population.iter().map(|ind| ind.score).collect();
            while next_gen.len() < cfg.population_size {
                let p1 = cfg.selection.select(&scores, &mut rng);
                let p2 = cfg.selection.select(&scores, &mut rng);

                let children = if rng.random_range(0.0..1.0) < cfg.crossover_rate {
                    crossover(
                        &population[p1].assignment,
                        &population[p2].assignment,
                        &mut rng,
                    )
                } else {
                    vec![population[p1].assignment.clone()]
                };

                for mut child in children {
                    if next_gen.len() >= cfg.population_size {
                        break;
                    }
                    mutate(
                        model,
                        &mut child,
                        cfg.mutation_rate,
                        max_hops,
                        cfg.walk_retries,
                        &mut rng,
                    );
                    next_gen.push(Individual {
                        assignment: child,
                        score: f64::INFINITY,
                    });
                }
            }

            // Elites keep their scores; only offspring need evaluation.
            evaluate_individuals(&evaluator, &mut next_gen[elite_count..], cfg.parallel);
            population = next_gen;

            let gen_best = best_of(&population);
            if gen_best.score < best.score {
                best = gen_best.clone();
            }
            history.push(IterationStats {
                best: best.score,
                average: mean_score(&population),
            });
        }

        SolveResult {
            best_score: best.score,
            best: best.assignment,
            history,
            iterations: cfg.generations,
        }
    }
}

impl Solver for GaSolver {
    fn name(&self) -> &'static str {
        "genetic"
    }

    fn solve(&self, model: &NetworkModel) -> SolveResult {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        self.run(model, seed)
    }

    fn solve_seeded(&self, model: &NetworkModel, seed: u64) -> SolveResult {
        self.run(model, seed)
    }
}

/// One randomized walk: uniform next hop over unvisited neighbors
/// until the destination is reached or the hop bound runs out.
fn random_walk<R: Rng>(
    model: &NetworkModel,
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
        let candidates: Vec<NodeId> = model
            .neighbors(current)
            .iter()
            .map(|&(n, _)| n)
            .filter(|n| !visited.contains(n))
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let next = candidates[rng.random_range(0..candidates.len())];
        path.push(next);
        if next == demand.dst {
            return Some(path);
        }
        visited.insert(next);
        current = next;
    }
    None
}

fn random_path<R: Rng>(
    model: &NetworkModel,
    demand: &Demand,
    max_hops: usize,
    retries: usize,
    rng: &mut R,
) -> Option<Path> {
    (0..retries).find_map(|_| random_walk(model, demand, max_hops, rng))
}

fn random_assignment<R: Rng>(
    model: &NetworkModel,
    max_hops: usize,
    retries: usize,
    rng: &mut R,
) -> Assignment {
    let paths = model
        .demands()
        .iter()
        .map(|d| random_path(model, d, max_hops, retries, rng))
        .collect();
    Assignment::new(paths)
}

/// Per-demand uniform crossover: each child takes each demand's path
/// from one parent by coin flip; the children are complementary.
fn crossover<R: Rng>(a: &Assignment, b: &Assignment, rng: &mut R) -> Vec<Assignment> {
    let num_demands = a.num_demands();
    let mut c1 = Vec::with_capacity(num_demands);
    let mut c2 = Vec::with_capacity(num_demands);
    for d in 0..num_demands {
        let pa = a.paths()[d].clone();
        let pb = b.paths()[d].clone();
        if rng.random_bool(0.5) {
            c1.push(pa);
            c2.push(pb);
        } else {
            c1.push(pb);
            c2.push(pa);
        }
    }
    vec![Assignment::new(c1), Assignment::new(c2)]
}

/// With probability `rate` per demand, replace its path with a fresh
/// randomized walk.
fn mutate<R: Rng>(
    model: &NetworkModel,
    child: &mut Assignment,
    rate: f64,
    max_hops: usize,
    retries: usize,
    rng: &mut R,
) {
    for (d, demand) in model.demands().iter().enumerate() {
        if rng.random_range(0.0..1.0) < rate {
            child.set_path(d, random_path(model, demand, max_hops, retries, rng));
        }
    }
}

fn evaluate_individuals(evaluator: &Evaluator, individuals: &mut [Individual], parallel: bool) {
    #[cfg(feature = "parallel")]
    if parallel {
        individuals
            .par_iter_mut()
            .for_each(|ind| ind.score = evaluator.score(&ind.assignment));
        return;
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;
    for ind in individuals.iter_mut() {
        ind.score = evaluator.score(&ind.assignment);
    }
}

/// First individual with the lowest score (insertion-order tie-break).
fn best_of(population: &[Individual]) -> &Individual {
    population
        .iter()
        .min_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .expect("population is never empty")
}

fn mean_score(population: &[Individual]) -> f64 {
    population.iter().map(|i| i.score).sum::<f64>() / population.len() as f64
}
