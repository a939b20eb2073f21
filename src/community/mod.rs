//! Community analysis module

pub mod detection;

use serde::{Serialize, Deserialize};

pub use detection::LabelPropagation;

/// A community found by label propagation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Community {
    /// Index of this community within its partition
    pub id: usize,

    /// Member identifiers, ascending
    pub members: Vec<String>,

    /// Size of the community
    pub size: usize,

    /// Density: actual edges / potential edges of the induced subgraph
    pub density: f64,
}

/// Disjoint communities covering every node of a graph.
///
/// Label propagation is randomized, so two partitions of the same graph are
/// only guaranteed to match when they were produced with identically seeded
/// random sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    /// Communities, largest first
    pub communities: Vec<Community>,

    /// Whether a full round passed without any label change
    pub converged: bool,

    /// Number of rounds executed
    pub iterations: usize,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.communities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.communities.is_empty()
    }

    /// Index of the community holding `node`
    pub fn community_of(&self, node: &str) -> Option<usize> {
        self.communities
            .iter()
            .find(|c| c.members.binary_search_by(|m| m.as_str().cmp(node)).is_ok())
            .map(|c| c.id)
    }

    /// Total number of nodes across all communities
    pub fn node_count(&self) -> usize {
        self.communities.iter().map(|c| c.size).sum()
    }
}
