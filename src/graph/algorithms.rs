//! Graph algorithms for analysis

use rustc_hash::FxHashMap;
use crate::graph::RelationGraph;

/// Extract the subgraph induced by `members`.
///
/// Only edges with both endpoints in `members` are kept. Identifiers that are
/// not nodes of `graph` are ignored, and members are registered in the order
/// given so the result is laid out deterministically.
pub fn induced_subgraph<S: AsRef<str>>(graph: &RelationGraph, members: &[S]) -> RelationGraph {
    let mut subgraph = RelationGraph::with_capacity(members.len());

    // Parent index -> subgraph index. The subgraph never holds more nodes than
    // its parent, so registering members cannot run out of indices.
    let mut remap: FxHashMap<u32, u32> = FxHashMap::default();
    for id in members {
        let Some(src) = graph.index_of(id.as_ref()) else {
            continue;
        };
        if let Ok(sub_idx) = subgraph.insert_node(graph.node_id(src)) {
            remap.insert(src, sub_idx);
        }
    }

    for id in members {
        let Some(src) = graph.index_of(id.as_ref()) else {
            continue;
        };
        let Some(&sub_src) = remap.get(&src) else {
            continue;
        };

        let mut targets: Vec<(u32, u32)> = graph
            .neighbor_indices(src)
            .iter()
            .filter(|&&dst| src < dst)
            .filter_map(|dst| remap.get(dst).map(|&sub_dst| (*dst, sub_dst)))
            .collect();
        targets.sort_unstable();

        for (_, sub_dst) in targets {
            subgraph.link(sub_src, sub_dst);
        }
    }

    subgraph
}

/// Undirected density of the subgraph induced by `members`: actual edges over
/// `n * (n - 1) / 2` potential edges
pub fn density<S: AsRef<str>>(graph: &RelationGraph, members: &[S]) -> f64 {
    let n = members.len();
    if n <= 1 {
        return 1.0; // By convention, singleton communities have density 1
    }

    let potential_edges = n * (n - 1) / 2;
    let actual_edges = induced_subgraph(graph, members).edge_count();

    actual_edges as f64 / potential_edges as f64
}
