//! Network topology: nodes, capacitated links, and traffic demands.
//!
//! [`NetworkModel::build`] validates the raw lists up front and returns
//! an immutable model with dense adjacency lookups. Construction either
//! succeeds completely or fails with a [`TopologyError`]; no partial
//! model is ever handed out.

use std::collections::HashMap;
use thiserror::Error;

/// Stable node identifier supplied by the caller.
pub type NodeId = usize;

/// Dense index into [`NetworkModel::edges`].
pub type EdgeId = usize;

/// An undirected link with a transport capacity and a per-unit cost.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    /// One endpoint.
    pub a: NodeId,
    /// The other endpoint.
    pub b: NodeId,
    /// Maximum aggregated flow the link can carry.
    pub capacity: f64,
    /// Cost per unit of flow routed over the link.
    pub cost: f64,
}

impl Edge {
    /// Creates an edge between `a` and `b`.
    pub fn new(a: NodeId, b: NodeId, capacity: f64, cost: f64) -> Self {
        Self { a, b, capacity, cost }
    }
}

/// A required flow between a source and a destination node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Demand {
    /// Source node.
    pub src: NodeId,
    /// Destination node.
    pub dst: NodeId,
    /// Flow amount that must be routed. Strictly positive.
    pub flow: f64,
}

impl Demand {
    /// Creates a demand routing `flow` units from `src` to `dst`.
    pub fn new(src: NodeId, dst: NodeId, flow: f64) -> Self {
        Self { src, dst, flow }
    }
}

/// Rejected topology input. Raised by [`NetworkModel::build`] only;
/// once a model exists it is valid for the whole run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TopologyError {
    /// The node list contains the same id twice.
    #[error("duplicate node id {0}")]
    DuplicateNode(NodeId),

    /// An edge endpoint is not in the node list.
    #[error("edge {edge} references unknown node {node}")]
    UnknownEdgeNode { edge: usize, node: NodeId },

    /// An edge connects a node to itself.
    #[error("edge {edge} is a self-loop on node {node}")]
    SelfLoop { edge: usize, node: NodeId },

    /// Two edges connect the same pair of nodes.
    #[error("edges {first} and {second} both connect nodes {a} and {b}")]
    DuplicateEdge {
        first: usize,
        second: usize,
        a: NodeId,
        b: NodeId,
    },

    /// An edge has a negative capacity.
    #[error("edge {edge} has negative capacity {capacity}")]
    NegativeCapacity { edge: usize, capacity: f64 },

    /// An edge has a negative cost.
    #[error("edge {edge} has negative cost {cost}")]
    NegativeCost { edge: usize, cost: f64 },

    /// A demand endpoint is not in the node list.
    #[error("demand {demand} references unknown node {node}")]
    UnknownDemandNode { demand: usize, node: NodeId },

    /// A demand's flow is zero or negative.
    #[error("demand {demand} has non-positive flow {flow}")]
    NonPositiveFlow { demand: usize, flow: f64 },
}

/// Immutable network instance shared by all solvers.
///
/// # Examples
///
/// ```
/// use u_netroute::model::{Demand, Edge, NetworkModel};
///
/// let model = NetworkModel::build(
///     vec![0, 1, 2],
///     vec![Edge::new(0, 1, 10.0, 1.0), Edge::new(1, 2, 10.0, 1.0)],
///     vec![Demand::new(0, 2, 3.0)],
/// )
/// .unwrap();
///
/// assert_eq!(model.num_nodes(), 3);
/// assert_eq!(model.neighbors(1).len(), 2);
/// assert!(model.edge_between(2, 1).is_some());
/// assert!(model.edge_between(0, 2).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct NetworkModel {
    nodes: Vec<NodeId>,
    index: HashMap<NodeId, usize>,
    edges: Vec<Edge>,
    demands: Vec<Demand>,
    /// Per dense node index: `(neighbor id, edge id)`, sorted by
    /// neighbor id so iteration order is deterministic.
    adjacency: Vec<Vec<(NodeId, EdgeId)>>,
}

impl NetworkModel {
    /// Validates and assembles a model from already-parsed input.
    pub fn build(
        nodes: Vec<NodeId>,
        edges: Vec<Edge>,
        demands: Vec<Demand>,
    ) -> Result<Self, TopologyError> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, &id) in nodes.iter().enumerate() {
            if index.insert(id, i).is_some() {
                return Err(TopologyError::DuplicateNode(id));
            }
        }

        let mut adjacency: Vec<Vec<(NodeId, EdgeId)>> = vec![Vec::new(); nodes.len()];
        for (eid, edge) in edges.iter().enumerate() {
            let ai = *index
                .get(&edge.a)
                .ok_or(TopologyError::UnknownEdgeNode { edge: eid, node: edge.a })?;
            let bi = *index
                .get(&edge.b)
                .ok_or(TopologyError::UnknownEdgeNode { edge: eid, node: edge.b })?;
            if ai == bi {
                return Err(TopologyError::SelfLoop { edge: eid, node: edge.a });
            }
            if edge.capacity < 0.0 {
                return Err(TopologyError::NegativeCapacity {
                    edge: eid,
                    capacity: edge.capacity,
                });
            }
            if edge.cost < 0.0 {
                return Err(TopologyError::NegativeCost { edge: eid, cost: edge.cost });
            }
            if let Some(&(_, first)) = adjacency[ai].iter().find(|e| e.0 == edge.b) {
                return Err(TopologyError::DuplicateEdge {
                    first,
                    second: eid,
                    a: edge.a,
                    b: edge.b,
                });
            }
            adjacency[ai].push((edge.b, eid));
            adjacency[bi].push((edge.a, eid));
        }
        for neighbors in &mut adjacency {
            neighbors.sort_unstable_by_key(|&(n, _)| n);
        }

        for (did, demand) in demands.iter().enumerate() {
            for node in [demand.src, demand.dst] {
                if !index.contains_key(&node) {
                    return Err(TopologyError::UnknownDemandNode { demand: did, node });
                }
            }
            if demand.flow <= 0.0 {
                return Err(TopologyError::NonPositiveFlow {
                    demand: did,
                    flow: demand.flow,
                });
            }
        }

        Ok(Self {
            nodes,
            index,
            edges,
            demands,
            adjacency,
        })
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Node ids in the order they were supplied.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// All edges; an [`EdgeId`] indexes into this slice.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The demand list this instance must route.
    pub fn demands(&self) -> &[Demand] {
        &self.demands
    }

    /// Looks up an edge by its dense id.
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id]
    }

    /// Dense index of a node id, if the node exists.
    pub fn node_index(&self, node: NodeId) -> Option<usize> {
        self.index.get(&node).copied()
    }

    /// Neighbors of `node` as `(neighbor id, edge id)` pairs, sorted by
    /// neighbor id. Unknown nodes have no neighbors.
    pub fn neighbors(&self, node: NodeId) -> &[(NodeId, EdgeId)] {
        match self.index.get(&node) {
            Some(&i) => &self.adjacency[i],
            None => &[],
        }
    }

    /// The edge connecting `a` and `b`, in either direction.
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        self.neighbors(a).iter().find(|e| e.0 == b).map(|e| e.1)
    }

    /// Hop bound used by path construction when a config does not set
    /// one explicitly: twice the node count.
    pub fn default_max_hops(&self) -> usize {
        self.nodes.len() * 2
    }
}
