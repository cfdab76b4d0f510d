//! Comparative network routing optimization.
//!
//! Three metaheuristic/learning algorithms route the same demand list
//! over a shared capacitated topology, so their convergence behavior
//! can be compared on equal footing:
//!
//! - **Genetic Algorithm** ([`ga`]): population of per-demand path
//!   chromosomes with elitist generational replacement.
//! - **Ant Colony Optimization** ([`aco`]): pheromone-guided
//!   probabilistic path construction with iteration-best reinforcement.
//! - **Q-Learning** ([`qlearning`]): tabular epsilon-greedy next-hop
//!   learning over a per-demand state space.
//!
//! # Architecture
//!
//! [`model`] owns the immutable [`NetworkModel`](model::NetworkModel)
//! and the pure [`Evaluator`](model::Evaluator) every solver scores
//! against, so results are directly comparable (lower is better,
//! penalties for capacity overload and unrouted demands). Each
//! algorithm lives in its own module behind the common
//! [`Solver`](solver::Solver) trait, and [`experiment`] drives any mix
//! of solvers over one instance, with repeated-run statistics.
//!
//! Loading topologies from files and plotting results are collaborator
//! concerns; this crate only consumes already-parsed node, edge, and
//! demand lists.
//!
//! # Example
//!
//! ```
//! use u_netroute::ga::{GaConfig, GaSolver};
//! use u_netroute::model::{Demand, Edge, NetworkModel};
//! use u_netroute::solver::Solver;
//!
//! let model = NetworkModel::build(
//!     vec![0, 1, 2],
//!     vec![
//!         Edge::new(0, 1, 5.0, 1.0),
//!         Edge::new(1, 2, 5.0, 1.0),
//!         Edge::new(0, 2, 5.0, 5.0),
//!     ],
//!     vec![Demand::new(0, 2, 2.0)],
//! )
//! .unwrap();
//!
//! let solver = GaSolver::new(GaConfig::default().with_seed(42)).unwrap();
//! let result = solver.solve(&model);
//! assert_eq!(result.best_score, 4.0); // 0-1-2 beats the direct edge
//! ```
//!
//! # Reproducibility
//!
//! Every solver draws all randomness from one seeded generator created
//! at the start of a run. Identical (topology, configuration, seed)
//! gives bit-for-bit identical results.

pub mod aco;
pub mod experiment;
pub mod ga;
pub mod model;
pub mod qlearning;
pub mod solver;
