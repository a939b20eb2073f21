//! Degree centrality and influencer ranking

use std::cmp::Ordering;
use serde::{Serialize, Deserialize};
use crate::graph::RelationGraph;
use crate::graph::algorithms::induced_subgraph;

/// A node and its centrality score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedNode {
    pub node: String,
    pub score: f64,
}

/// Nodes ordered by descending score, ties by ascending identifier
pub type Ranking = Vec<RankedNode>;

/// Normalized degree centrality of every node, in insertion order.
///
/// A node of degree `d` in a graph of `m` nodes scores `d / (m - 1)`. Graphs
/// with fewer than two nodes score `0`.
pub fn degree_centrality(graph: &RelationGraph) -> Vec<RankedNode> {
    let m = graph.node_count();

    graph
        .indices()
        .map(|idx| RankedNode {
            node: graph.node_id(idx).to_string(),
            score: if m > 1 {
                graph.degree_at(idx) as f64 / (m - 1) as f64
            } else {
                0.0
            },
        })
        .collect()
}

/// Top `top_k` nodes of `graph` by degree centrality.
///
/// Returns every node when `top_k` exceeds the node count.
pub fn rank(graph: &RelationGraph, top_k: usize) -> Ranking {
    let mut scores = degree_centrality(graph);
    scores.sort_by(compare_ranked);
    scores.truncate(top_k);
    scores
}

/// Top `top_k` nodes of the subgraph induced by `members`.
///
/// Only edges with both endpoints among `members` count toward degree, and the
/// scope size is the number of members present in `graph`.
pub fn rank_community<S: AsRef<str>>(graph: &RelationGraph, members: &[S], top_k: usize) -> Ranking {
    rank(&induced_subgraph(graph, members), top_k)
}

fn compare_ranked(a: &RankedNode, b: &RankedNode) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.node.cmp(&b.node))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star() -> RelationGraph {
        let mut graph = RelationGraph::new();
        for leaf in ["L1", "L2", "L3", "L4", "L5"] {
            graph.insert_edge("X", leaf).unwrap();
        }
        graph
    }

    fn assert_ordered(ranking: &[RankedNode]) {
        for pair in ranking.windows(2) {
            assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                assert!(pair[0].node < pair[1].node);
            }
        }
    }

    #[test]
    fn test_star_center_is_top_influencer() {
        let graph = star();
        let top = rank(&graph, 1);

        assert_eq!(top, vec![RankedNode { node: "X".to_string(), score: 1.0 }]);

        for entry in degree_centrality(&graph) {
            if entry.node != "X" {
                assert_eq!(entry.score, 0.2);
            }
        }
    }

    #[test]
    fn test_ties_break_by_identifier() {
        let graph = star();
        let ranking = rank(&graph, 10);

        let order: Vec<&str> = ranking.iter().map(|r| r.node.as_str()).collect();
        assert_eq!(order, vec!["X", "L1", "L2", "L3", "L4", "L5"]);
        assert_ordered(&ranking);
    }

    #[test]
    fn test_top_k_larger_than_graph_returns_all() {
        let mut graph = RelationGraph::new();
        graph.insert_edge("b", "a").unwrap();
        graph.insert_edge("b", "c").unwrap();

        let ranking = rank(&graph, 50);
        assert_eq!(ranking.len(), 3);
        assert_eq!(ranking[0], RankedNode { node: "b".to_string(), score: 1.0 });
        assert!(rank(&graph, 0).is_empty());
    }

    #[test]
    fn test_small_scopes_score_zero() {
        let mut graph = RelationGraph::new();
        assert!(rank(&graph, 5).is_empty());

        graph.insert_node("solo").unwrap();
        assert_eq!(rank(&graph, 5), vec![RankedNode { node: "solo".to_string(), score: 0.0 }]);
    }

    #[test]
    fn test_scores_stay_in_unit_interval() {
        let mut graph = RelationGraph::new();
        for (a, b) in [("a", "b"), ("a", "c"), ("a", "d"), ("b", "c"), ("c", "d"), ("d", "e")] {
            graph.insert_edge(a, b).unwrap();
        }
        graph.insert_node("f").unwrap();

        let ranking = rank(&graph, usize::MAX);
        assert_eq!(ranking.len(), 6);
        assert!(ranking.iter().all(|r| (0.0..=1.0).contains(&r.score)));
        assert_ordered(&ranking);
    }

    #[test]
    fn test_community_rank_uses_induced_degree() {
        let mut graph = star();
        graph.insert_edge("L1", "L2").unwrap();

        // Inside {L1, L2, L3} only L1-L2 survives, X is outside the scope
        let ranking = rank_community(&graph, &["L1", "L2", "L3"], 5);
        assert_eq!(
            ranking,
            vec![
                RankedNode { node: "L1".to_string(), score: 0.5 },
                RankedNode { node: "L2".to_string(), score: 0.5 },
                RankedNode { node: "L3".to_string(), score: 0.0 },
            ]
        );
    }
}
