//! Core route graph data structure.
//!
//! The RouteGraph wraps petgraph and adds a label index for fast lookups.
//! It's the central data structure that everything else works with.

use crate::edge::GraphEdge;
use petgraph::stable_graph::{NodeIndex, StableUnGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences}; // For edge_references
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Unique identifier for a node in the graph.
pub type NodeId = NodeIndex;

/// The weighted waypoint graph.
///
/// Nodes are addressed by string label; edges are undirected and carry an
/// `f64` weight, so a connection is always visible from both endpoints with
/// the same weight. A stable graph is used so that removing a node never
/// invalidates the indexes of the remaining ones.
#[derive(Debug, Clone, Default)]
pub struct RouteGraph {
    /// The underlying petgraph graph.
    pub(crate) graph: StableUnGraph<String, f64>,

    /// Maps node labels to graph node indexes.
    id_index: HashMap<String, NodeId>,
}

impl RouteGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from an edge list, creating endpoints as needed.
    pub fn from_edges<I, S>(edges: I) -> Self
    where
        I: IntoIterator<Item = (S, S, f64)>,
        S: Into<String>,
    {
        let mut graph = Self::new();
        for (a, b, weight) in edges {
            graph.add_edge(a, b, weight);
        }
        graph
    }

    /// Adds a node with the given label.
    ///
    /// Idempotent: if the label is already present, the existing node is
    /// left untouched. Returns the node's index either way.
    pub fn add_node(&mut self, id: impl Into<String>) -> NodeId {
        let id = id.into();
        if let Some(&index) = self.id_index.get(&id) {
            return index;
        }

        let index = self.graph.add_node(id.clone());
        self.id_index.insert(id, index);
        index
    }

    /// Removes a node and every edge incident to it.
    ///
    /// Returns false if no such node exists; removal of an absent node is
    /// not an error.
    pub fn remove_node(&mut self, id: &str) -> bool {
        match self.id_index.remove(id) {
            Some(index) => {
                self.graph.remove_node(index);
                true
            }
            None => false,
        }
    }

    /// Connects two nodes with the given weight.
    ///
    /// Endpoints that don't exist yet are created first. Re-adding an edge
    /// between the same pair overwrites the previous weight.
    pub fn add_edge(&mut self, a: impl Into<String>, b: impl Into<String>, weight: f64) {
        let a = self.add_node(a);
        let b = self.add_node(b);
        self.graph.update_edge(a, b, weight);
    }

    /// Removes the edge between two nodes, in both directions at once.
    ///
    /// Returns false if either node or the edge is absent; like
    /// `remove_node`, this is not an error.
    pub fn remove_edge(&mut self, a: &str, b: &str) -> bool {
        let (Some(&a), Some(&b)) = (self.id_index.get(a), self.id_index.get(b)) else {
            return false;
        };

        match self.graph.find_edge(a, b) {
            Some(edge) => {
                self.graph.remove_edge(edge);
                true
            }
            None => false,
        }
    }

    /// Returns a node's neighbors and the weight of each connecting edge.
    ///
    /// The map is empty if the node is absent or isolated; callers that need
    /// to distinguish the two cases should check `has_node` separately. Keys
    /// are sorted so output is reproducible.
    pub fn neighbors(&self, id: &str) -> BTreeMap<String, f64> {
        let Some(&index) = self.id_index.get(id) else {
            return BTreeMap::new();
        };

        self.graph
            .edges(index)
            .map(|edge| {
                let other = if edge.source() == index {
                    edge.target()
                } else {
                    edge.source()
                };
                (self.graph[other].clone(), *edge.weight())
            })
            .collect()
    }

    /// Returns true if a node with the given label exists.
    pub fn has_node(&self, id: &str) -> bool {
        self.id_index.contains_key(id)
    }

    /// Returns the weight of the edge between two nodes, if there is one.
    pub fn edge_weight(&self, a: &str, b: &str) -> Option<f64> {
        let (a, b) = (*self.id_index.get(a)?, *self.id_index.get(b)?);
        let edge = self.graph.find_edge(a, b)?;
        self.graph.edge_weight(edge).copied()
    }

    /// Gets the node index for a label.
    pub fn get_index(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    /// Gets the label for a node index.
    pub fn label(&self, index: NodeId) -> Option<&str> {
        self.graph.node_weight(index).map(String::as_str)
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns all node labels, sorted.
    pub fn node_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.id_index.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Returns all edges with endpoint labels for export.
    pub fn export_edges(&self) -> Vec<GraphEdge> {
        let mut edges: Vec<GraphEdge> = self
            .graph
            .edge_references()
            .map(|edge| {
                GraphEdge::new(
                    self.graph[edge.source()].clone(),
                    self.graph[edge.target()].clone(),
                    *edge.weight(),
                )
            })
            .collect();

        edges.sort_by(|x, y| x.a.cmp(&y.a).then_with(|| x.b.cmp(&y.b)));
        edges
    }

    /// Returns graph statistics.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
        }
    }
}

/// Graph statistics for the info endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
}
