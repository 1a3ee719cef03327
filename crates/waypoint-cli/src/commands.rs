//! CLI command implementations.
//!
//! Every command loads the session file, applies one graph operation, and
//! saves the result; `serve` hands the loaded graph to the server instead.

use colored::Colorize;
use std::fs;
use std::path::Path;
use tracing::debug;
use waypoint_graph::{GraphDocument, RouteGraph};
use waypoint_server::{ServerConfig, WaypointServer};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// The topology the demo session starts with.
fn demo_topology() -> RouteGraph {
    RouteGraph::from_edges([
        ("A", "B", 2.0),
        ("A", "C", 4.0),
        ("A", "D", 7.0),
        ("B", "C", 1.0),
        ("B", "E", 5.0),
        ("C", "D", 3.0),
        ("C", "F", 6.0),
        ("D", "G", 2.0),
        ("E", "F", 3.0),
        ("F", "G", 1.0),
    ])
}

fn load_graph(session: &Path) -> Result<RouteGraph> {
    if !session.exists() {
        return Err(format!(
            "no session file at {} (run `waypoint init` first)",
            session.display()
        )
        .into());
    }

    let text = fs::read_to_string(session)?;
    let doc: GraphDocument = serde_json::from_str(&text)?;
    let graph = doc.into_graph();
    debug!(
        "loaded {} nodes, {} edges from {}",
        graph.node_count(),
        graph.edge_count(),
        session.display()
    );
    Ok(graph)
}

fn save_graph(session: &Path, graph: &RouteGraph) -> Result<()> {
    let doc = GraphDocument::from_graph(graph);
    fs::write(session, serde_json::to_string_pretty(&doc)?)?;
    Ok(())
}

/// Create a new session file.
pub fn init(session: &Path, demo: bool) -> Result<()> {
    if session.exists() {
        println!("{} Session already exists at {}", "✓".green(), session.display());
        return Ok(());
    }

    let graph = if demo { demo_topology() } else { RouteGraph::new() };
    save_graph(session, &graph)?;

    println!(
        "{} Created session at {} ({} nodes, {} edges)",
        "✓".green(),
        session.display(),
        graph.node_count(),
        graph.edge_count()
    );
    println!(
        "  Run {} to connect waypoints",
        "waypoint add-edge <a> <b> <weight>".cyan()
    );

    Ok(())
}

/// Add a node to the session graph.
pub fn add_node(session: &Path, id: &str) -> Result<()> {
    let mut graph = load_graph(session)?;
    let existed = graph.has_node(id);
    graph.add_node(id);
    save_graph(session, &graph)?;

    if existed {
        println!("{} Node {} already present", "✓".green(), id.cyan());
    } else {
        println!("{} Added node {}", "✓".green(), id.cyan());
    }

    Ok(())
}

/// Remove a node and its edges.
pub fn remove_node(session: &Path, id: &str) -> Result<()> {
    let mut graph = load_graph(session)?;
    let removed = graph.remove_node(id);
    save_graph(session, &graph)?;

    if removed {
        println!("{} Removed node {} and its edges", "✓".green(), id.cyan());
    } else {
        println!("{} No node {} (nothing to do)", "•".blue(), id.cyan());
    }

    Ok(())
}

/// Connect two nodes, creating them if needed.
pub fn add_edge(session: &Path, a: &str, b: &str, weight: f64) -> Result<()> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(format!("weight must be a non-negative number, got {}", weight).into());
    }

    let mut graph = load_graph(session)?;
    let replaced = graph.edge_weight(a, b);
    graph.add_edge(a, b, weight);
    save_graph(session, &graph)?;

    match replaced {
        Some(old) => println!(
            "{} Updated edge {} - {} ({} -> {})",
            "✓".green(),
            a.cyan(),
            b.cyan(),
            old,
            weight
        ),
        None => println!(
            "{} Added edge {} - {} ({})",
            "✓".green(),
            a.cyan(),
            b.cyan(),
            weight
        ),
    }

    Ok(())
}

/// Remove the edge between two nodes.
pub fn remove_edge(session: &Path, a: &str, b: &str) -> Result<()> {
    let mut graph = load_graph(session)?;
    let removed = graph.remove_edge(a, b);
    save_graph(session, &graph)?;

    if removed {
        println!("{} Removed edge {} - {}", "✓".green(), a.cyan(), b.cyan());
    } else {
        println!("{} No edge {} - {} (nothing to do)", "•".blue(), a.cyan(), b.cyan());
    }

    Ok(())
}

/// Check whether a node exists.
pub fn has_node(session: &Path, id: &str) -> Result<()> {
    let graph = load_graph(session)?;

    if graph.has_node(id) {
        println!("{} Node {} exists", "✓".green(), id.cyan());
    } else {
        println!("{} Node {} is not in the graph", "✗".red(), id.cyan());
    }

    Ok(())
}

/// Show a node's neighbors.
pub fn neighbors(session: &Path, id: &str, json_output: bool) -> Result<()> {
    let graph = load_graph(session)?;
    let neighbors = graph.neighbors(id);

    if json_output {
        let output = serde_json::json!({
            "id": id,
            "exists": graph.has_node(id),
            "neighbors": neighbors,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if !graph.has_node(id) {
        println!("{} Node {} is not in the graph", "•".blue(), id.cyan());
        return Ok(());
    }

    if neighbors.is_empty() {
        println!("{} has no neighbors", id.cyan());
        return Ok(());
    }

    println!("Neighbors of {}:\n", id.cyan());
    for (neighbor, weight) in neighbors {
        println!("  {} {}", neighbor.cyan(), format!("(weight {})", weight).dimmed());
    }

    Ok(())
}

/// Find and print the lightest route between two nodes.
pub fn route(session: &Path, start: &str, goal: &str, json_output: bool) -> Result<()> {
    let graph = load_graph(session)?;

    let path = match graph.find_path(start, goal) {
        Ok(path) => path,
        Err(e) => return Err(e.to_string().into()),
    };

    if json_output {
        let output = serde_json::json!({
            "nodes": path.nodes,
            "totalWeight": path.total_weight,
            "hopCount": path.hop_count(),
            "table": path.table,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let rendered: Vec<String> = path.nodes.iter().map(|n| n.cyan().to_string()).collect();
    println!("{}", rendered.join(&" → ".dimmed().to_string()));
    println!(
        "\nTotal weight: {} ({} hops)",
        path.total_weight.to_string().bold(),
        path.hop_count()
    );

    Ok(())
}

/// Show session statistics.
pub fn status(session: &Path) -> Result<()> {
    let graph = load_graph(session)?;
    let stats = graph.stats();

    println!("{}", "Waypoint Status".cyan().bold());
    println!();
    println!("  {} {}", "Session:".dimmed(), session.display());
    println!("  {} {}", "Nodes:".dimmed(), stats.node_count);
    println!("  {} {}", "Edges:".dimmed(), stats.edge_count);

    Ok(())
}

/// Export the graph to JSON.
pub fn export(session: &Path, output: &Path) -> Result<()> {
    let graph = load_graph(session)?;

    let export = serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "stats": {
            "nodeCount": graph.node_count(),
            "edgeCount": graph.edge_count()
        },
        "graph": GraphDocument::from_graph(&graph),
    });

    fs::write(output, serde_json::to_string_pretty(&export)?)?;
    println!("{} Exported to {}", "✓".green(), output.display());

    Ok(())
}

/// Start the Waypoint server over this session's graph.
pub async fn serve(session: &Path, port: u16, headless: bool) -> Result<()> {
    let bind_addr = if headless { "0.0.0.0" } else { "127.0.0.1" };

    if headless {
        println!("{}", "Starting Waypoint server in headless mode...".cyan());
    } else {
        println!("{}", "Starting Waypoint server...".cyan());
    }

    // A missing session file starts an empty in-memory session.
    let graph = if session.exists() {
        load_graph(session)?
    } else {
        RouteGraph::new()
    };

    println!(
        "{} Loaded {} nodes, {} edges",
        "✓".green(),
        graph.node_count(),
        graph.edge_count()
    );

    let addr = format!("{}:{}", bind_addr, port).parse()?;
    let config = ServerConfig { addr };
    let server = WaypointServer::new(graph, config);

    println!("{} Listening on ws://{}:{}", "✓".green(), bind_addr, port);
    if headless {
        println!("  Headless mode: accepting connections from any host");
    }
    println!("  Press {} to stop", "Ctrl+C".cyan());

    server.run().await.map_err(|e| e.to_string())?;

    Ok(())
}
