//! Error types for the analysis core

use thiserror::Error;

/// Result alias for graph construction, detection and ranking.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Failures raised by the analysis core.
///
/// Every variant is returned by the call that caused it, and the failing call
/// leaves the graph it was given untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// An edge was requested from a node to itself.
    #[error("invalid edge: self-loop on node '{node}'")]
    InvalidEdge { node: String },

    /// A query referenced a node that is not in the graph.
    #[error("unknown node '{node}'")]
    UnknownNode { node: String },

    /// Community detection was attempted on a graph with no nodes.
    #[error("graph has no nodes")]
    EmptyGraph,

    /// The graph already holds as many nodes as `u32` indices can address.
    #[error("graph cannot hold more than {limit} nodes")]
    CapacityExceeded { limit: usize },
}
