//! Candidate solutions and the violations evaluation can find in them.

use super::topology::{EdgeId, NodeId};

/// An ordered node sequence from a demand's source to its destination.
pub type Path = Vec<NodeId>;

/// A complete candidate: one path slot per demand, in demand order.
///
/// `None` marks a demand the candidate leaves unrouted; the evaluator
/// penalizes it instead of rejecting the whole candidate, so solvers
/// can keep optimizing around infeasibility.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    paths: Vec<Option<Path>>,
}

impl Assignment {
    /// Wraps per-demand path choices.
    pub fn new(paths: Vec<Option<Path>>) -> Self {
        Self { paths }
    }

    /// A candidate that routes nothing.
    pub fn unrouted(num_demands: usize) -> Self {
        Self { paths: vec![None; num_demands] }
    }

    /// All path slots, indexed by demand.
    pub fn paths(&self) -> &[Option<Path>] {
        &self.paths
    }

    /// The path chosen for `demand`, if any.
    pub fn path(&self, demand: usize) -> Option<&Path> {
        self.paths.get(demand).and_then(|p| p.as_ref())
    }

    /// Replaces the path chosen for `demand`.
    pub fn set_path(&mut self, demand: usize, path: Option<Path>) {
        self.paths[demand] = path;
    }

    /// Number of demand slots.
    pub fn num_demands(&self) -> usize {
        self.paths.len()
    }

    /// Number of demands with a path attached.
    pub fn num_routed(&self) -> usize {
        self.paths.iter().filter(|p| p.is_some()).count()
    }
}

/// A constraint violation detected during evaluation.
///
/// Violations are recorded and penalized, never raised: an infeasible
/// candidate stays comparable to every other candidate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Violation {
    /// Aggregated flow on an edge exceeds its capacity.
    CapacityExceeded {
        edge: EdgeId,
        load: f64,
        capacity: f64,
    },
    /// The candidate has no path for a demand.
    DemandUnrouted { demand: usize },
    /// A path contains a consecutive node pair with no connecting edge.
    BrokenPath {
        demand: usize,
        from: NodeId,
        to: NodeId,
    },
    /// A path does not start at the demand's source or end at its
    /// destination.
    WrongEndpoints { demand: usize },
}
