//! Undirected relationship graph keyed by account identifier

use std::collections::HashMap;
use std::ops::Range;
use rustc_hash::FxHashSet;
use crate::error::{GraphError, Result};

/// Largest number of nodes a graph can hold. Indices are `u32` and the node
/// count itself must fit in one.
pub const MAX_NODES: usize = u32::MAX as usize;

/// Simple undirected graph over string identifiers.
///
/// Identifiers are interned to dense `u32` indices in first-insertion order,
/// and each node keeps a hash set of neighbor indices. Adjacency is always
/// symmetric and every edge endpoint is a registered node. At most
/// [`MAX_NODES`] nodes are accepted.
#[derive(Debug, Clone, Default)]
pub struct RelationGraph {
    /// Mapping from string IDs to node indices
    id_to_index: HashMap<String, u32>,

    /// Node string IDs, indexed by node index
    node_ids: Vec<String>,

    /// Neighbor sets for each node
    adjacency: Vec<FxHashSet<u32>>,

    /// Number of undirected edges
    edge_count: usize,
}

impl RelationGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with room for `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id_to_index: HashMap::with_capacity(capacity),
            node_ids: Vec::with_capacity(capacity),
            adjacency: Vec::with_capacity(capacity),
            edge_count: 0,
        }
    }

    /// Register a node, returning its index. Existing nodes are left as they are.
    pub fn insert_node(&mut self, id: &str) -> Result<u32> {
        if let Some(&idx) = self.id_to_index.get(id) {
            return Ok(idx);
        }

        let idx = next_index(self.node_ids.len())?;
        self.id_to_index.insert(id.to_string(), idx);
        self.node_ids.push(id.to_string());
        self.adjacency.push(FxHashSet::default());

        Ok(idx)
    }

    /// Add the undirected edge `{a, b}`, registering missing endpoints.
    ///
    /// Returns `true` when the edge is new and `false` when it was already
    /// present in either orientation. A self-loop is rejected before anything
    /// is inserted.
    pub fn insert_edge(&mut self, a: &str, b: &str) -> Result<bool> {
        if a == b {
            return Err(GraphError::InvalidEdge { node: a.to_string() });
        }

        // Check room for both endpoints so a failure leaves the graph untouched
        let missing = [a, b].iter().filter(|id| !self.contains_node(id)).count();
        if missing > 0 {
            next_index(self.node_ids.len() + missing - 1)?;
        }

        let a_idx = self.insert_node(a)?;
        let b_idx = self.insert_node(b)?;

        Ok(self.link(a_idx, b_idx))
    }

    /// Connect two distinct existing nodes by index. Returns `false` if the
    /// edge was already present.
    pub(crate) fn link(&mut self, a: u32, b: u32) -> bool {
        debug_assert_ne!(a, b, "self-loops are rejected before linking");

        if !self.adjacency[a as usize].insert(b) {
            return false;
        }
        self.adjacency[b as usize].insert(a);
        self.edge_count += 1;

        true
    }

    /// Node identifiers in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &str> + '_ {
        self.node_ids.iter().map(String::as_str)
    }

    /// Neighbor identifiers of `id`
    pub fn neighbors(&self, id: &str) -> Result<impl Iterator<Item = &str> + '_> {
        let idx = self.require(id)?;
        Ok(self.adjacency[idx as usize]
            .iter()
            .map(move |&n| self.node_ids[n as usize].as_str()))
    }

    /// Number of neighbors of `id`
    pub fn degree(&self, id: &str) -> Result<usize> {
        let idx = self.require(id)?;
        Ok(self.adjacency[idx as usize].len())
    }

    /// Check whether `id` is a node of this graph
    pub fn contains_node(&self, id: &str) -> bool {
        self.id_to_index.contains_key(id)
    }

    /// Check whether the undirected edge `{a, b}` exists
    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        match (self.id_to_index.get(a), self.id_to_index.get(b)) {
            (Some(&a_idx), Some(&b_idx)) => self.adjacency[a_idx as usize].contains(&b_idx),
            _ => false,
        }
    }

    /// Every edge exactly once, lower node index first
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.indices().zip(&self.adjacency).flat_map(move |(src, neighbors)| {
            neighbors
                .iter()
                .filter(move |&&dst| src < dst)
                .map(move |&dst| (self.node_id(src), self.node_id(dst)))
        })
    }

    /// All node indices, `0..node_count`
    pub fn indices(&self) -> Range<u32> {
        // The node count never exceeds MAX_NODES, so the conversion cannot fail
        0..u32::try_from(self.node_ids.len()).unwrap_or(u32::MAX)
    }

    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }

    /// Index of `id`, if present
    pub fn index_of(&self, id: &str) -> Option<u32> {
        self.id_to_index.get(id).copied()
    }

    /// Identifier stored at `idx`
    pub fn node_id(&self, idx: u32) -> &str {
        &self.node_ids[idx as usize]
    }

    /// Neighbor indices of the node at `idx`
    pub fn neighbor_indices(&self, idx: u32) -> &FxHashSet<u32> {
        &self.adjacency[idx as usize]
    }

    /// Degree of the node at `idx`
    pub fn degree_at(&self, idx: u32) -> usize {
        self.adjacency[idx as usize].len()
    }

    fn require(&self, id: &str) -> Result<u32> {
        self.index_of(id)
            .ok_or_else(|| GraphError::UnknownNode { node: id.to_string() })
    }
}

/// Index for the node added after `len` existing ones
fn next_index(len: usize) -> Result<u32> {
    u32::try_from(len)
        .ok()
        .filter(|&idx| idx < u32::MAX)
        .ok_or(GraphError::CapacityExceeded { limit: MAX_NODES })
}
