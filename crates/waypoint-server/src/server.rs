//! WebSocket server implementation.
//!
//! Handles client connections and routes messages to handlers. The server
//! owns the session's graph: clients mutate and query one shared store for
//! as long as the process runs.

use crate::handlers::{
    handle_edge_add, handle_edge_remove, handle_export, handle_info, handle_neighbors,
    handle_node_add, handle_node_has, handle_node_remove, handle_path_find,
};
use crate::protocol::{
    EdgeAddParams, EdgeRemoveParams, NeighborsParams, NodeAddParams, NodeHasParams,
    NodeRemoveParams, PathFindParams, Request, Response,
};
use crate::SharedGraph;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::RwLock;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};
use waypoint_graph::RouteGraph;

/// Server configuration.
pub struct ServerConfig {
    /// Address to bind to.
    pub addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:9641".parse().unwrap(),
        }
    }
}

/// The Waypoint WebSocket server.
pub struct WaypointServer {
    config: ServerConfig,
    graph: SharedGraph,
}

impl WaypointServer {
    /// Creates a new server owning the given graph.
    pub fn new(graph: RouteGraph, config: ServerConfig) -> Self {
        Self {
            config,
            graph: Arc::new(RwLock::new(graph)),
        }
    }

    /// Creates a server over an already-shared graph.
    pub fn new_with_shared(graph: SharedGraph, config: ServerConfig) -> Self {
        Self { config, graph }
    }

    /// Returns a handle to the shared graph.
    pub fn graph(&self) -> SharedGraph {
        self.graph.clone()
    }

    /// Runs the server, accepting connections forever.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let listener = TcpListener::bind(&self.config.addr).await?;
        info!("Waypoint server listening on {}", self.config.addr);

        loop {
            match listener.accept().await {
                Ok((stream, addr)) => {
                    debug!("New connection from {}", addr);
                    let graph = self.graph.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, addr, graph).await {
                            error!("Connection error from {}: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Accept error: {}", e);
                }
            }
        }
    }
}

/// Handles a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    graph: SharedGraph,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let ws_stream = accept_async(stream).await?;
    info!("WebSocket connection established with {}", addr);

    let (mut write, mut read) = ws_stream.split();

    while let Some(msg) = read.next().await {
        let msg = match msg {
            Ok(m) => m,
            Err(e) => {
                warn!("Message error from {}: {}", addr, e);
                break;
            }
        };

        if msg.is_close() {
            debug!("Client {} disconnected", addr);
            break;
        }

        if msg.is_ping() {
            write.send(Message::Pong(msg.into_data())).await?;
            continue;
        }

        if msg.is_text() {
            let text = msg.to_text().unwrap_or("");
            let response = process_message(text, graph.clone()).await;
            let json = serde_json::to_string(&response)?;
            write.send(Message::Text(json)).await?;
        }
    }

    info!("Connection closed: {}", addr);
    Ok(())
}

/// Processes a JSON-RPC message and returns a response.
async fn process_message(text: &str, graph: SharedGraph) -> Response {
    // Parse the request
    let request: Request = match serde_json::from_str(text) {
        Ok(r) => r,
        Err(_) => return Response::parse_error(),
    };

    let id = request.id.clone();
    let method = request.method.as_str();

    debug!("Processing method: {}", method);

    // Route to handler
    match method {
        "graph.info" => handle_info(graph, id).await,

        "graph.export" => handle_export(graph, id).await,

        "node.add" => match serde_json::from_value::<NodeAddParams>(request.params) {
            Ok(params) => handle_node_add(graph, id, params).await,
            Err(e) => Response::invalid_params(id, e.to_string()),
        },

        "node.remove" => match serde_json::from_value::<NodeRemoveParams>(request.params) {
            Ok(params) => handle_node_remove(graph, id, params).await,
            Err(e) => Response::invalid_params(id, e.to_string()),
        },

        "node.has" => match serde_json::from_value::<NodeHasParams>(request.params) {
            Ok(params) => handle_node_has(graph, id, params).await,
            Err(e) => Response::invalid_params(id, e.to_string()),
        },

        "node.neighbors" => match serde_json::from_value::<NeighborsParams>(request.params) {
            Ok(params) => handle_neighbors(graph, id, params).await,
            Err(e) => Response::invalid_params(id, e.to_string()),
        },

        "edge.add" => match serde_json::from_value::<EdgeAddParams>(request.params) {
            Ok(params) => handle_edge_add(graph, id, params).await,
            Err(e) => Response::invalid_params(id, e.to_string()),
        },

        "edge.remove" => match serde_json::from_value::<EdgeRemoveParams>(request.params) {
            Ok(params) => handle_edge_remove(graph, id, params).await,
            Err(e) => Response::invalid_params(id, e.to_string()),
        },

        "path.find" => match serde_json::from_value::<PathFindParams>(request.params) {
            Ok(params) => handle_path_find(graph, id, params).await,
            Err(e) => Response::invalid_params(id, e.to_string()),
        },

        _ => Response::method_not_found(id, method),
    }
}
