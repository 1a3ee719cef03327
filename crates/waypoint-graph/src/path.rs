//! Shortest-route computation.
//!
//! This module implements single-source best-first search (Dijkstra) over a
//! RouteGraph. It answers the question: "What is the lightest route between
//! these two waypoints right now?" — and returns enough of the search table
//! for a caller to highlight or re-derive the answer.

use crate::graph::RouteGraph;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, HashSet};
use thiserror::Error;
use tracing::debug;

/// Why a route query failed.
///
/// Both kinds are terminal for the query: there is no partial result, and
/// retrying without changing the graph cannot succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The named endpoint is not a node of the graph.
    #[error("unknown node: {0}")]
    UnknownNode(String),

    /// Both endpoints exist but no sequence of edges connects them.
    #[error("no route from {start} to {goal}")]
    NoPathFound { start: String, goal: String },
}

/// Best-known distance and predecessor for one node of the search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathEntry {
    /// Total weight of the best route found so far; `None` if unreached.
    pub distance: Option<f64>,
    /// Previous node on that route; `None` for the start and unreached nodes.
    pub predecessor: Option<String>,
}

/// A successful route query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortestPath {
    /// Node labels from start to goal inclusive.
    pub nodes: Vec<String>,
    /// Sum of edge weights along `nodes`.
    pub total_weight: f64,
    /// The full per-node search table, for diagnostics or highlighting.
    pub table: BTreeMap<String, PathEntry>,
}

impl ShortestPath {
    /// Number of edges on the route.
    pub fn hop_count(&self) -> usize {
        self.nodes.len() - 1
    }
}

/// Entry in the priority queue for the best-first expansion.
#[derive(Debug, Clone)]
struct FringeEntry {
    node: String,
    distance: f64,
}

impl Eq for FringeEntry {}

impl PartialEq for FringeEntry {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance && self.node == other.node
    }
}

impl Ord for FringeEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior; distance ties go to the
        // lexicographically smaller label so pop order is deterministic.
        other
            .distance
            .partial_cmp(&self.distance)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for FringeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl RouteGraph {
    /// Finds the least-total-weight route between two nodes.
    ///
    /// The computation reads the graph as it is at call time and keeps no
    /// state between calls. Edge weights must be non-negative; behavior with
    /// negative weights is unspecified.
    ///
    /// # Errors
    ///
    /// Returns `PathError::UnknownNode` if `start` or `goal` is absent
    /// (checked in that order, before any search), and
    /// `PathError::NoPathFound` if `goal` is unreachable from `start`.
    pub fn find_path(&self, start: &str, goal: &str) -> Result<ShortestPath, PathError> {
        for id in [start, goal] {
            if !self.has_node(id) {
                return Err(PathError::UnknownNode(id.to_string()));
            }
        }

        // Every node starts unreached; only the start is at distance zero.
        let mut table: BTreeMap<String, PathEntry> = self
            .node_ids()
            .into_iter()
            .map(|id| {
                (
                    id,
                    PathEntry {
                        distance: None,
                        predecessor: None,
                    },
                )
            })
            .collect();
        if let Some(entry) = table.get_mut(start) {
            entry.distance = Some(0.0);
        }

        let mut settled: HashSet<String> = HashSet::new();
        let mut fringe = BinaryHeap::new();
        fringe.push(FringeEntry {
            node: start.to_string(),
            distance: 0.0,
        });

        while let Some(FringeEntry { node, distance }) = fringe.pop() {
            // Stale entries pop after the node was settled at a lower distance.
            if !settled.insert(node.clone()) {
                continue;
            }

            // Once the goal is the minimum, its distance is final.
            if node == goal {
                break;
            }

            // Sorted neighbor order keeps the predecessor table reproducible
            // when equal-weight alternatives exist.
            for (neighbor, weight) in self.neighbors(&node) {
                if settled.contains(&neighbor) {
                    continue;
                }

                let candidate = distance + weight;
                if let Some(entry) = table.get_mut(&neighbor) {
                    let improved = entry.distance.map_or(true, |best| candidate < best);
                    if improved {
                        entry.distance = Some(candidate);
                        entry.predecessor = Some(node.clone());
                        fringe.push(FringeEntry {
                            node: neighbor,
                            distance: candidate,
                        });
                    }
                }
            }
        }

        debug!(
            "route query {} -> {}: {} nodes settled",
            start,
            goal,
            settled.len()
        );

        let Some(total_weight) = table.get(goal).and_then(|entry| entry.distance) else {
            return Err(PathError::NoPathFound {
                start: start.to_string(),
                goal: goal.to_string(),
            });
        };

        // Walk predecessors back from the goal.
        let mut nodes = vec![goal.to_string()];
        let mut current = goal.to_string();
        while let Some(pred) = table.get(&current).and_then(|e| e.predecessor.clone()) {
            nodes.push(pred.clone());
            current = pred;
        }
        nodes.reverse();

        // A walk that doesn't reach the start means the goal is disconnected.
        if nodes.first().map(String::as_str) != Some(start) {
            return Err(PathError::NoPathFound {
                start: start.to_string(),
                goal: goal.to_string(),
            });
        }

        Ok(ShortestPath {
            nodes,
            total_weight,
            table,
        })
    }
}
