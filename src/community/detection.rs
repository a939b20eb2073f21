//! Label propagation community detection
//!
//! Every node starts in its own community and repeatedly adopts the label that
//! is most frequent among its neighbors. Runs in roughly O(E) per round.

use std::cmp::Reverse;
use itertools::Itertools;
use rand::Rng;
use rand::seq::SliceRandom;
use rustc_hash::FxHashMap;
use crate::community::{Community, Partition};
use crate::error::{GraphError, Result};
use crate::graph::RelationGraph;
use crate::graph::algorithms::density;

/// Default bound on propagation rounds
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Asynchronous label propagation detector.
///
/// The outcome depends on the random source passed to [`detect`]: visit order
/// is reshuffled every round and ties between equally frequent labels are
/// drawn uniformly. Seed the source to get reproducible partitions.
///
/// [`detect`]: LabelPropagation::detect
#[derive(Debug, Clone)]
pub struct LabelPropagation {
    /// Maximum number of rounds
    max_iterations: usize,
}

impl LabelPropagation {
    pub fn new() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Set maximum number of rounds
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Partition `graph` into communities.
    ///
    /// Stops after the first round without a label change, or after
    /// `max_iterations` rounds. Hitting the bound is not an error; it is
    /// reported through [`Partition::converged`].
    pub fn detect<R: Rng + ?Sized>(&self, graph: &RelationGraph, rng: &mut R) -> Result<Partition> {
        let n = graph.node_count();
        if n == 0 {
            return Err(GraphError::EmptyGraph);
        }

        // Each node starts labelled with its own index
        let mut labels: Vec<u32> = graph.indices().collect();
        let mut order: Vec<u32> = graph.indices().collect();
        let mut label_counts: FxHashMap<u32, usize> = FxHashMap::default();
        let mut candidates: Vec<u32> = Vec::new();

        let mut converged = false;
        let mut iterations = 0;

        while iterations < self.max_iterations {
            iterations += 1;
            order.shuffle(rng);

            let mut changed = 0usize;
            for &node in &order {
                let neighbors = graph.neighbor_indices(node);
                if neighbors.is_empty() {
                    continue;
                }

                label_counts.clear();
                for &neighbor in neighbors {
                    *label_counts.entry(labels[neighbor as usize]).or_insert(0) += 1;
                }

                let max_count = label_counts.values().copied().max().unwrap_or(0);
                candidates.clear();
                candidates.extend(
                    label_counts
                        .iter()
                        .filter(|&(_, &count)| count == max_count)
                        .map(|(&label, _)| label),
                );
                // Fixed candidate order keeps the draw reproducible for a seeded rng
                candidates.sort_unstable();

                let new_label = if candidates.len() == 1 {
                    candidates[0]
                } else {
                    candidates[rng.gen_range(0..candidates.len())]
                };

                if labels[node as usize] != new_label {
                    labels[node as usize] = new_label;
                    changed += 1;
                }
            }

            log::debug!("Label propagation round {}: {} labels changed", iterations, changed);

            if changed == 0 {
                converged = true;
                break;
            }
        }

        if !converged {
            log::warn!(
                "Label propagation stopped after {} rounds without converging",
                iterations
            );
        }

        let communities = group_by_label(graph, &labels);
        log::info!(
            "Detected {} communities in {} rounds (converged: {})",
            communities.len(),
            iterations,
            converged
        );

        Ok(Partition {
            communities,
            converged,
            iterations,
        })
    }
}

impl Default for LabelPropagation {
    fn default() -> Self {
        Self::new()
    }
}

/// Group nodes sharing a final label, largest community first, then by
/// smallest member identifier
fn group_by_label(graph: &RelationGraph, labels: &[u32]) -> Vec<Community> {
    let mut groups: FxHashMap<u32, Vec<String>> = FxHashMap::default();
    for (idx, &label) in graph.indices().zip(labels) {
        groups
            .entry(label)
            .or_default()
            .push(graph.node_id(idx).to_string());
    }

    groups
        .into_values()
        .map(|mut members| {
            members.sort_unstable();
            members
        })
        .sorted_by(|a, b| {
            (Reverse(a.len()), &a[0]).cmp(&(Reverse(b.len()), &b[0]))
        })
        .enumerate()
        .map(|(id, members)| Community {
            id,
            size: members.len(),
            density: density(graph, &members[..]),
            members,
        })
        .collect()
}
