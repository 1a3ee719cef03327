//! Waypoint Server - WebSocket server for the Waypoint Protocol
//!
//! This crate implements the server side of the Waypoint Protocol, holding
//! the mutable route graph for an interactive session and answering
//! mutation and shortest-route requests from clients.
//!
//! The server supports:
//! - Multiple concurrent connections over one shared graph
//! - JSON-RPC 2.0 messages
//! - Read/write locking so queries always see a consistent snapshot

use std::sync::Arc;
use tokio::sync::RwLock;
use waypoint_graph::RouteGraph;

/// Shared graph state across connections.
pub type SharedGraph = Arc<RwLock<RouteGraph>>;

mod handlers;
mod protocol;
mod server;

pub use protocol::{Request, Response, RpcError};
pub use server::{ServerConfig, WaypointServer};
