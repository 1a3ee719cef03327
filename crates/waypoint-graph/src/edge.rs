//! Edge and document types for export and session files.
//!
//! The graph itself stores edges inside petgraph; these are the plain
//! serializable records the presentation layer exchanges.

use crate::graph::RouteGraph;
use serde::{Deserialize, Serialize};

/// A single undirected edge for graph export/visualization.
///
/// The endpoint pair is canonicalized so that `a <= b`, which keeps exported
/// edge lists stable however the edge was originally entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub a: String,
    pub b: String,
    pub weight: f64,
}

impl GraphEdge {
    /// Creates an edge record, normalizing endpoint order.
    pub fn new(a: impl Into<String>, b: impl Into<String>, weight: f64) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self { a, b, weight }
        } else {
            Self { b: a, a: b, weight }
        }
    }
}

/// A complete serializable snapshot of a graph.
///
/// Lists nodes separately from edges so isolated nodes survive a
/// round-trip. This is the format of the CLI's session file and of
/// `graph.export` responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<String>,
    pub edges: Vec<GraphEdge>,
}

impl GraphDocument {
    /// Snapshots a graph into a document.
    pub fn from_graph(graph: &RouteGraph) -> Self {
        Self {
            nodes: graph.node_ids(),
            edges: graph.export_edges(),
        }
    }

    /// Rebuilds a graph from a document.
    pub fn into_graph(self) -> RouteGraph {
        let mut graph = RouteGraph::new();
        for node in self.nodes {
            graph.add_node(node);
        }
        for edge in self.edges {
            graph.add_edge(edge.a, edge.b, edge.weight);
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_endpoints_are_normalized() {
        let edge = GraphEdge::new("F", "C", 6.0);
        assert_eq!(edge.a, "C");
        assert_eq!(edge.b, "F");
    }

    #[test]
    fn test_document_round_trip_keeps_isolated_nodes() {
        let mut graph = RouteGraph::from_edges([("A", "B", 2.0), ("B", "C", 1.0)]);
        graph.add_node("island");

        let doc = GraphDocument::from_graph(&graph);
        let rebuilt = doc.into_graph();

        assert_eq!(rebuilt.node_count(), 4);
        assert_eq!(rebuilt.edge_count(), 2);
        assert!(rebuilt.has_node("island"));
        assert_eq!(rebuilt.edge_weight("A", "B"), Some(2.0));
    }

    #[test]
    fn test_document_serializes_to_json() {
        let graph = RouteGraph::from_edges([("A", "B", 2.5)]);
        let doc = GraphDocument::from_graph(&graph);

        let json = serde_json::to_string(&doc).unwrap();
        let parsed: GraphDocument = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.nodes, vec!["A", "B"]);
        assert_eq!(parsed.edges[0].weight, 2.5);
    }
}
