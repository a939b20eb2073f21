//! Graph construction from follow observations

use serde::{Serialize, Deserialize};
use crate::error::{GraphError, Result};
use crate::graph::RelationGraph;

/// One observed "follows" relationship
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FollowRecord {
    /// Account that follows
    pub source_id: String,

    /// Account being followed
    pub target_id: String,
}

impl FollowRecord {
    pub fn new(source_id: impl Into<String>, target_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
        }
    }
}

/// Builder for incrementally constructing a RelationGraph.
///
/// The graph is only handed out by [`GraphBuilder::build`], so a failed
/// record never leaves a partially populated graph visible to the caller.
pub struct GraphBuilder {
    /// Graph under construction
    graph: RelationGraph,

    /// Skip self-loops instead of failing
    skip_self_loops: bool,

    /// Records that repeated an existing edge
    duplicate_records: usize,

    /// Self-loop records dropped in lenient mode
    skipped_self_loops: usize,

    /// First error hit, reported by build()
    error: Option<GraphError>,
}

impl GraphBuilder {
    /// Create a new graph builder
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a new graph builder with the given node capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            graph: RelationGraph::with_capacity(capacity),
            skip_self_loops: false,
            duplicate_records: 0,
            skipped_self_loops: 0,
            error: None,
        }
    }

    /// Drop self-loop records with a warning instead of failing the build
    pub fn skip_self_loops(mut self, skip: bool) -> Self {
        self.skip_self_loops = skip;
        self
    }

    /// Register an account that may have no observed relationships
    pub fn add_node(&mut self, id: &str) -> Result<()> {
        self.graph.insert_node(id)?;
        Ok(())
    }

    /// Add one follow observation as an undirected edge
    pub fn add_record(&mut self, record: &FollowRecord) -> Result<()> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }

        match self.graph.insert_edge(&record.source_id, &record.target_id) {
            Ok(true) => {}
            Ok(false) => self.duplicate_records += 1,
            Err(GraphError::InvalidEdge { node }) if self.skip_self_loops => {
                log::warn!("Skipping self-loop record for '{}'", node);
                self.skipped_self_loops += 1;
            }
            Err(err) => {
                self.error = Some(err.clone());
                return Err(err);
            }
        }

        Ok(())
    }

    /// Add every record from `records`, stopping at the first failure
    pub fn extend<I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: std::borrow::Borrow<FollowRecord>,
    {
        use std::borrow::Borrow;

        for record in records {
            self.add_record(record.borrow())?;
        }
        Ok(())
    }

    /// Finish construction
    pub fn build(self) -> Result<RelationGraph> {
        if let Some(err) = self.error {
            return Err(err);
        }

        if self.duplicate_records > 0 {
            log::debug!("Ignored {} duplicate relationship records", self.duplicate_records);
        }
        if self.skipped_self_loops > 0 {
            log::warn!("Skipped {} self-loop records", self.skipped_self_loops);
        }
        log::debug!(
            "Built graph with {} nodes and {} edges",
            self.graph.node_count(),
            self.graph.edge_count()
        );

        Ok(self.graph)
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(pairs: &[(&str, &str)]) -> Vec<FollowRecord> {
        pairs.iter().map(|&(s, t)| FollowRecord::new(s, t)).collect()
    }

    #[test]
    fn test_reciprocal_follows_collapse_to_one_edge() {
        let mut builder = GraphBuilder::new();
        builder
            .extend(&records(&[("a", "b"), ("b", "a"), ("a", "b"), ("b", "c")]))
            .unwrap();
        let graph = builder.build().unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_strict_builder_rejects_self_loop() {
        let mut builder = GraphBuilder::new();
        let err = builder
            .extend(&records(&[("a", "b"), ("c", "c"), ("d", "e")]))
            .unwrap_err();
        assert_eq!(err, GraphError::InvalidEdge { node: "c".to_string() });

        // Further records are refused and no graph is produced
        assert!(builder.add_record(&FollowRecord::new("x", "y")).is_err());
        assert!(builder.build().is_err());
    }

    #[test]
    fn test_lenient_builder_skips_self_loop() {
        let mut builder = GraphBuilder::new().skip_self_loops(true);
        builder
            .extend(records(&[("a", "b"), ("c", "c"), ("d", "e")]))
            .unwrap();
        let graph = builder.build().unwrap();

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 2);
        assert!(!graph.contains_node("c"));
    }

    #[test]
    fn test_seed_accounts_become_isolated_nodes() {
        let mut builder = GraphBuilder::with_capacity(4);
        builder.add_node("seed").unwrap();
        builder.add_record(&FollowRecord::new("a", "b")).unwrap();
        let graph = builder.build().unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.degree("seed").unwrap(), 0);
    }
}
