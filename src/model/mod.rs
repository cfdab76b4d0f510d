//! Shared network model: topology, candidate solutions, and scoring.
//!
//! [`NetworkModel`] is built once per experiment from already-parsed
//! node/edge/demand lists and is read-only afterwards. Candidates are
//! [`Assignment`]s (one path slot per demand) scored by the pure
//! [`Evaluator`], so every solver optimizes against the same objective.

mod evaluator;
mod solution;
mod topology;

pub use evaluator::{Evaluation, Evaluator, DEFAULT_OVERLOAD_PENALTY, DEFAULT_UNROUTED_PENALTY};
pub use solution::{Assignment, Path, Violation};
pub use topology::{Demand, Edge, EdgeId, NetworkModel, NodeId, TopologyError};
