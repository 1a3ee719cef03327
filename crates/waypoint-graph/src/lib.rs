//! Waypoint Graph - Route storage and shortest-path queries
//!
//! This crate owns the weighted undirected graph of named waypoints and the
//! engine that answers shortest-route queries over it. It is purely
//! in-memory and synchronous; sessions, serialization to disk, and rendering
//! live in the wrapper crates.
//!
//! # Architecture
//!
//! The graph uses petgraph internally with a label index for
//! string-addressed lookups. Mutation operations are total: removing
//! something absent is a no-op and re-adding an edge overwrites its weight.
//! The path engine reads the graph as a snapshot and returns the route plus
//! the full distance/predecessor table.
//!
//! # Example
//!
//! ```
//! use waypoint_graph::RouteGraph;
//!
//! let mut graph = RouteGraph::new();
//! graph.add_edge("A", "B", 2.0);
//! graph.add_edge("B", "C", 1.0);
//!
//! let path = graph.find_path("A", "C").unwrap();
//! assert_eq!(path.nodes, vec!["A", "B", "C"]);
//! assert_eq!(path.total_weight, 3.0);
//! ```

mod edge;
mod graph;
mod path;

pub use edge::{GraphDocument, GraphEdge};
pub use graph::{GraphStats, NodeId, RouteGraph};
pub use path::{PathEntry, PathError, ShortestPath};
