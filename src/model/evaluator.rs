//! Candidate scoring: routing cost plus feasibility penalties.

use super::solution::{Assignment, Violation};
use super::topology::{Demand, EdgeId, NetworkModel, NodeId};

/// Penalty per unit of flow above an edge's capacity.
pub const DEFAULT_OVERLOAD_PENALTY: f64 = 100.0;

/// Fixed penalty per demand left without a usable path.
pub const DEFAULT_UNROUTED_PENALTY: f64 = 10_000.0;

/// Result of scoring one candidate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evaluation {
    /// Total fitness: routing cost plus all penalties. Lower is better.
    pub score: f64,
    /// Cost component alone: Σ edge cost × demand flow over routed paths.
    pub routing_cost: f64,
    /// Every violation found; empty means the candidate is feasible.
    pub violations: Vec<Violation>,
}

impl Evaluation {
    /// Whether the candidate satisfies every constraint.
    pub fn is_feasible(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Scores candidates against a fixed model.
///
/// Evaluation is a pure function of `(model, candidate)`: identical
/// inputs always produce identical output, and nothing is cached or
/// mutated. All three solvers share one scoring convention
/// (minimization), so their results are directly comparable.
///
/// # Examples
///
/// ```
/// use u_netroute::model::{Assignment, Demand, Edge, Evaluator, NetworkModel};
///
/// let model = NetworkModel::build(
///     vec![0, 1, 2],
///     vec![Edge::new(0, 1, 5.0, 1.0), Edge::new(1, 2, 5.0, 1.0)],
///     vec![Demand::new(0, 2, 2.0)],
/// )
/// .unwrap();
///
/// let evaluator = Evaluator::new(&model);
/// let candidate = Assignment::new(vec![Some(vec![0, 1, 2])]);
/// let eval = evaluator.evaluate(&candidate);
/// assert!(eval.is_feasible());
/// assert_eq!(eval.score, 4.0); // two edges of cost 1.0 × flow 2.0
/// ```
pub struct Evaluator<'a> {
    model: &'a NetworkModel,
    overload_penalty: f64,
    unrouted_penalty: f64,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator with the default penalty weights.
    pub fn new(model: &'a NetworkModel) -> Self {
        Self {
            model,
            overload_penalty: DEFAULT_OVERLOAD_PENALTY,
            unrouted_penalty: DEFAULT_UNROUTED_PENALTY,
        }
    }

    /// Sets the per-unit penalty for flow above an edge's capacity.
    pub fn with_overload_penalty(mut self, penalty: f64) -> Self {
        self.overload_penalty = penalty;
        self
    }

    /// Sets the fixed penalty per unrouted demand.
    pub fn with_unrouted_penalty(mut self, penalty: f64) -> Self {
        self.unrouted_penalty = penalty;
        self
    }

    /// The model this evaluator scores against.
    pub fn model(&self) -> &NetworkModel {
        self.model
    }

    /// Scores a candidate: routing cost, plus capacity overage
    /// penalties, plus a fixed penalty per unrouted or broken demand.
    pub fn evaluate(&self, candidate: &Assignment) -> Evaluation {
        let mut violations = Vec::new();
        let mut routing_cost = 0.0;
        let mut penalty = 0.0;
        let mut load = vec![0.0f64; self.model.edges().len()];

        for (idx, demand) in self.model.demands().iter().enumerate() {
            let Some(path) = candidate.path(idx) else {
                violations.push(Violation::DemandUnrouted { demand: idx });
                penalty += self.unrouted_penalty;
                continue;
            };
            match self.trace(idx, demand, path) {
                Ok(edges) => {
                    for eid in edges {
                        routing_cost += self.model.edge(eid).cost * demand.flow;
                        load[eid] += demand.flow;
                    }
                }
                Err(violation) => {
                    // A structurally invalid path leaves its demand
                    // effectively unrouted.
                    violations.push(violation);
                    penalty += self.unrouted_penalty;
                }
            }
        }

        for (eid, &l) in load.iter().enumerate() {
            let capacity = self.model.edge(eid).capacity;
            if l > capacity {
                violations.push(Violation::CapacityExceeded {
                    edge: eid,
                    load: l,
                    capacity,
                });
                penalty += self.overload_penalty * (l - capacity);
            }
        }

        Evaluation {
            score: routing_cost + penalty,
            routing_cost,
            violations,
        }
    }

    /// Scalar shortcut for the common case.
    pub fn score(&self, candidate: &Assignment) -> f64 {
        self.evaluate(candidate).score
    }

    /// Maps a path to its edge ids, checking endpoints and adjacency.
    fn trace(&self, idx: usize, demand: &Demand, path: &[NodeId]) -> Result<Vec<EdgeId>, Violation> {
        if path.first() != Some(&demand.src) || path.last() != Some(&demand.dst) {
            return Err(Violation::WrongEndpoints { demand: idx });
        }
        let mut edges = Vec::with_capacity(path.len().saturating_sub(1));
        for pair in path.windows(2) {
            match self.model.edge_between(pair[0], pair[1]) {
                Some(eid) => edges.push(eid),
                None => {
                    return Err(Violation::BrokenPath {
                        demand: idx,
                        from: pair[0],
                        to: pair[1],
                    })
                }
            }
        }
        Ok(edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Demand, Edge, NetworkModel};
    use proptest::prelude::*;

    fn two_demand_model() -> NetworkModel {
        NetworkModel::build(
            vec![0, 1, 2, 3, 4],
            vec![
                Edge::new(0, 1, 4.0, 1.0),
                Edge::new(1, 2, 4.0, 1.0),
                Edge::new(0, 2, 4.0, 5.0),
                Edge::new(2, 3, 2.0, 1.0),
                Edge::new(3, 4, 2.0, 2.0),
            ],
            vec![Demand::new(0, 2, 2.0), Demand::new(2, 4, 1.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_feasible_candidate_cost() {
        let model = two_demand_model();
        let evaluator = Evaluator::new(&model);
        let candidate = Assignment::new(vec![
            Some(vec![0, 1, 2]), // cost (1+1) × 2
            Some(vec![2, 3, 4]), // cost (1+2) × 1
        ]);
        let eval = evaluator.evaluate(&candidate);
        assert!(eval.is_feasible());
        assert_eq!(eval.routing_cost, 7.0);
        assert_eq!(eval.score, 7.0);
    }

    #[test]
    fn test_unrouted_demand_penalized() {
        let model = two_demand_model();
        let evaluator = Evaluator::new(&model);
        let candidate = Assignment::new(vec![Some(vec![0, 1, 2]), None]);
        let eval = evaluator.evaluate(&candidate);
        assert_eq!(eval.routing_cost, 4.0);
        assert_eq!(eval.score, 4.0 + DEFAULT_UNROUTED_PENALTY);
        assert_eq!(eval.violations, vec![Violation::DemandUnrouted { demand: 1 }]);
    }

    #[test]
    fn test_capacity_overage_penalized() {
        let model = NetworkModel::build(
            vec![0, 1],
            vec![Edge::new(0, 1, 1.0, 1.0)],
            vec![Demand::new(0, 1, 3.0)],
        )
        .unwrap();
        let evaluator = Evaluator::new(&model);
        let eval = evaluator.evaluate(&Assignment::new(vec![Some(vec![0, 1])]));
        // 2.0 units over a capacity of 1.0
        assert_eq!(eval.routing_cost, 3.0);
        assert_eq!(eval.score, 3.0 + 2.0 * DEFAULT_OVERLOAD_PENALTY);
        assert_eq!(
            eval.violations,
            vec![Violation::CapacityExceeded { edge: 0, load: 3.0, capacity: 1.0 }]
        );
    }

    #[test]
    fn test_load_aggregates_across_demands() {
        let model = NetworkModel::build(
            vec![0, 1],
            vec![Edge::new(0, 1, 3.0, 1.0)],
            vec![Demand::new(0, 1, 2.0), Demand::new(0, 1, 2.0)],
        )
        .unwrap();
        let evaluator = Evaluator::new(&model);
        let eval = evaluator.evaluate(&Assignment::new(vec![
            Some(vec![0, 1]),
            Some(vec![0, 1]),
        ]));
        // Combined load 4.0 exceeds capacity 3.0 even though each
        // demand fits on its own.
        assert_eq!(eval.score, 4.0 + 1.0 * DEFAULT_OVERLOAD_PENALTY);
    }

    #[test]
    fn test_broken_path_penalized() {
        let model = two_demand_model();
        let evaluator = Evaluator::new(&model);
        let candidate = Assignment::new(vec![Some(vec![0, 3, 2]), None]);
        let eval = evaluator.evaluate(&candidate);
        assert!(eval
            .violations
            .contains(&Violation::BrokenPath { demand: 0, from: 0, to: 3 }));
        assert_eq!(eval.score, 2.0 * DEFAULT_UNROUTED_PENALTY);
    }

    #[test]
    fn test_wrong_endpoints_penalized() {
        let model = two_demand_model();
        let evaluator = Evaluator::new(&model);
        let candidate = Assignment::new(vec![Some(vec![1, 2]), None]);
        let eval = evaluator.evaluate(&candidate);
        assert!(eval
            .violations
            .contains(&Violation::WrongEndpoints { demand: 0 }));
    }

    #[test]
    fn test_empty_path_is_wrong_endpoints() {
        let model = two_demand_model();
        let evaluator = Evaluator::new(&model);
        let eval = evaluator.evaluate(&Assignment::new(vec![Some(vec![]), None]));
        assert!(eval
            .violations
            .contains(&Violation::WrongEndpoints { demand: 0 }));
    }

    #[test]
    fn test_same_endpoint_demand_trivial_path() {
        let model = NetworkModel::build(
            vec![0, 1],
            vec![Edge::new(0, 1, 1.0, 1.0)],
            vec![Demand::new(0, 0, 1.0)],
        )
        .unwrap();
        let evaluator = Evaluator::new(&model);
        let eval = evaluator.evaluate(&Assignment::new(vec![Some(vec![0])]));
        assert!(eval.is_feasible());
        assert_eq!(eval.score, 0.0);
    }

    #[test]
    fn test_custom_penalties() {
        let model = two_demand_model();
        let evaluator = Evaluator::new(&model)
            .with_unrouted_penalty(1.0)
            .with_overload_penalty(2.0);
        let eval = evaluator.evaluate(&Assignment::unrouted(2));
        assert_eq!(eval.score, 2.0);
    }

    proptest! {
        // Arbitrary node sequences, including broken and misdirected
        // paths. Scoring must be pure and never reward a candidate.
        #[test]
        fn prop_evaluate_is_deterministic(
            paths in prop::collection::vec(
                prop::option::of(prop::collection::vec(0usize..5, 0..7)),
                2,
            )
        ) {
            let model = two_demand_model();
            let evaluator = Evaluator::new(&model);
            let candidate = Assignment::new(paths);
            let first = evaluator.evaluate(&candidate);
            let second = evaluator.evaluate(&candidate);
            prop_assert_eq!(&first, &second);
            prop_assert!(first.score >= 0.0);
            prop_assert!(first.score >= first.routing_cost);
        }

        #[test]
        fn prop_feasible_iff_no_violations(
            paths in prop::collection::vec(
                prop::option::of(prop::collection::vec(0usize..5, 0..7)),
                2,
            )
        ) {
            let model = two_demand_model();
            let evaluator = Evaluator::new(&model);
            let eval = evaluator.evaluate(&Assignment::new(paths));
            prop_assert_eq!(eval.is_feasible(), eval.score == eval.routing_cost);
        }
    }
}
