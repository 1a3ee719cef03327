//! Request handlers for protocol methods.
//!
//! Each handler implements one method from the Waypoint Protocol. Mutations
//! take the write lock; queries take the read lock, so a route query always
//! sees a consistent snapshot of the graph.

use crate::protocol::{
    EdgeAddParams, EdgeRemoveParams, NeighborsParams, NodeAddParams, NodeHasParams,
    NodeRemoveParams, PathFindParams, Response,
};
use crate::SharedGraph;
use serde_json::Value;
use std::time::Instant;
use tracing::debug;
use waypoint_graph::{GraphDocument, PathError};

/// Handles the graph.info method.
pub async fn handle_info(graph: SharedGraph, id: Option<Value>) -> Response {
    let g = graph.read().await;
    let stats = g.stats();

    Response::success(
        id,
        serde_json::json!({
            "nodeCount": stats.node_count,
            "edgeCount": stats.edge_count,
            "version": env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// Handles the graph.export method.
pub async fn handle_export(graph: SharedGraph, id: Option<Value>) -> Response {
    let g = graph.read().await;
    Response::success(id, GraphDocument::from_graph(&g))
}

/// Handles the node.add method.
pub async fn handle_node_add(
    graph: SharedGraph,
    id: Option<Value>,
    params: NodeAddParams,
) -> Response {
    let mut g = graph.write().await;
    g.add_node(params.id.as_str());

    debug!("node.add {}", params.id);

    Response::success(
        id,
        serde_json::json!({
            "id": params.id,
            "nodeCount": g.node_count(),
        }),
    )
}

/// Handles the node.remove method.
///
/// Removing an absent node is a no-op, reported through `removed` rather
/// than as an error.
pub async fn handle_node_remove(
    graph: SharedGraph,
    id: Option<Value>,
    params: NodeRemoveParams,
) -> Response {
    let mut g = graph.write().await;
    let removed = g.remove_node(&params.id);

    debug!("node.remove {} (removed: {})", params.id, removed);

    Response::success(
        id,
        serde_json::json!({
            "id": params.id,
            "removed": removed,
            "nodeCount": g.node_count(),
            "edgeCount": g.edge_count(),
        }),
    )
}

/// Handles the edge.add method.
pub async fn handle_edge_add(
    graph: SharedGraph,
    id: Option<Value>,
    params: EdgeAddParams,
) -> Response {
    if !params.weight.is_finite() || params.weight < 0.0 {
        return Response::invalid_params(id, "weight must be a non-negative number");
    }

    let mut g = graph.write().await;
    g.add_edge(params.a.as_str(), params.b.as_str(), params.weight);

    debug!("edge.add {} - {} ({})", params.a, params.b, params.weight);

    Response::success(
        id,
        serde_json::json!({
            "a": params.a,
            "b": params.b,
            "weight": params.weight,
            "nodeCount": g.node_count(),
            "edgeCount": g.edge_count(),
        }),
    )
}

/// Handles the edge.remove method.
pub async fn handle_edge_remove(
    graph: SharedGraph,
    id: Option<Value>,
    params: EdgeRemoveParams,
) -> Response {
    let mut g = graph.write().await;
    let removed = g.remove_edge(&params.a, &params.b);

    debug!("edge.remove {} - {} (removed: {})", params.a, params.b, removed);

    Response::success(
        id,
        serde_json::json!({
            "a": params.a,
            "b": params.b,
            "removed": removed,
            "edgeCount": g.edge_count(),
        }),
    )
}

/// Handles the node.has method.
pub async fn handle_node_has(
    graph: SharedGraph,
    id: Option<Value>,
    params: NodeHasParams,
) -> Response {
    let g = graph.read().await;

    Response::success(
        id,
        serde_json::json!({
            "id": params.id,
            "exists": g.has_node(&params.id),
        }),
    )
}

/// Handles the node.neighbors method.
///
/// An absent node yields an empty neighbor map; `exists` lets the caller
/// tell the two cases apart.
pub async fn handle_neighbors(
    graph: SharedGraph,
    id: Option<Value>,
    params: NeighborsParams,
) -> Response {
    let g = graph.read().await;

    Response::success(
        id,
        serde_json::json!({
            "id": params.id,
            "exists": g.has_node(&params.id),
            "neighbors": g.neighbors(&params.id),
        }),
    )
}

/// Handles the path.find method.
pub async fn handle_path_find(
    graph: SharedGraph,
    id: Option<Value>,
    params: PathFindParams,
) -> Response {
    let start = Instant::now();
    let g = graph.read().await;

    debug!("path.find {} -> {}", params.start, params.goal);

    match g.find_path(&params.start, &params.goal) {
        Ok(path) => Response::success(
            id,
            serde_json::json!({
                "nodes": path.nodes,
                "totalWeight": path.total_weight,
                "hopCount": path.hop_count(),
                "table": path.table,
                "queryTime": start.elapsed().as_millis() as u64,
            }),
        ),
        Err(err @ PathError::UnknownNode(_)) => Response::error(id, -32001, err.to_string()),
        Err(err @ PathError::NoPathFound { .. }) => Response::error(id, -32002, err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use waypoint_graph::RouteGraph;

    fn shared(graph: RouteGraph) -> SharedGraph {
        Arc::new(RwLock::new(graph))
    }

    fn seed() -> RouteGraph {
        RouteGraph::from_edges([
            ("A", "B", 2.0),
            ("A", "C", 4.0),
            ("B", "C", 1.0),
            ("C", "D", 3.0),
        ])
    }

    fn result(response: Response) -> Value {
        assert!(response.error.is_none(), "unexpected error: {:?}", response.error);
        response.result.unwrap()
    }

    #[tokio::test]
    async fn test_info_reports_counts() {
        let graph = shared(seed());
        let value = result(handle_info(graph, None).await);

        assert_eq!(value["nodeCount"], 4);
        assert_eq!(value["edgeCount"], 4);
    }

    #[tokio::test]
    async fn test_node_add_then_remove() {
        let graph = shared(RouteGraph::new());

        let value = result(
            handle_node_add(
                graph.clone(),
                None,
                NodeAddParams { id: "hub".into() },
            )
            .await,
        );
        assert_eq!(value["nodeCount"], 1);

        let value = result(
            handle_node_remove(
                graph.clone(),
                None,
                NodeRemoveParams { id: "hub".into() },
            )
            .await,
        );
        assert_eq!(value["removed"], true);
        assert_eq!(value["nodeCount"], 0);

        // Second removal is a permissive no-op.
        let value = result(
            handle_node_remove(graph, None, NodeRemoveParams { id: "hub".into() }).await,
        );
        assert_eq!(value["removed"], false);
    }

    #[tokio::test]
    async fn test_edge_add_rejects_negative_weight() {
        let graph = shared(RouteGraph::new());
        let response = handle_edge_add(
            graph,
            None,
            EdgeAddParams {
                a: "A".into(),
                b: "B".into(),
                weight: -1.0,
            },
        )
        .await;

        let error = response.error.expect("negative weight must be rejected");
        assert_eq!(error.code, -32602);
    }

    #[tokio::test]
    async fn test_node_has() {
        let graph = shared(seed());

        let value = result(
            handle_node_has(graph.clone(), None, NodeHasParams { id: "A".into() }).await,
        );
        assert_eq!(value["exists"], true);

        let value =
            result(handle_node_has(graph, None, NodeHasParams { id: "Z".into() }).await);
        assert_eq!(value["exists"], false);
    }

    #[tokio::test]
    async fn test_neighbors_of_absent_node() {
        let graph = shared(seed());
        let value = result(
            handle_neighbors(graph, None, NeighborsParams { id: "Z".into() }).await,
        );

        assert_eq!(value["exists"], false);
        assert!(value["neighbors"].as_object().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_path_find_success() {
        let graph = shared(seed());
        let value = result(
            handle_path_find(
                graph,
                None,
                PathFindParams {
                    start: "A".into(),
                    goal: "D".into(),
                },
            )
            .await,
        );

        assert_eq!(value["nodes"], serde_json::json!(["A", "B", "C", "D"]));
        assert_eq!(value["totalWeight"], 6.0);
        assert_eq!(value["table"]["A"]["distance"], 0.0);
    }

    #[tokio::test]
    async fn test_path_find_unknown_node_code() {
        let graph = shared(seed());
        let response = handle_path_find(
            graph,
            None,
            PathFindParams {
                start: "Z".into(),
                goal: "A".into(),
            },
        )
        .await;

        let error = response.error.unwrap();
        assert_eq!(error.code, -32001);
        assert!(error.message.contains("Z"));
    }

    #[tokio::test]
    async fn test_path_find_no_route_code() {
        let mut graph = seed();
        graph.add_node("island");
        let response = handle_path_find(
            shared(graph),
            None,
            PathFindParams {
                start: "A".into(),
                goal: "island".into(),
            },
        )
        .await;

        let error = response.error.unwrap();
        assert_eq!(error.code, -32002);
    }
}
