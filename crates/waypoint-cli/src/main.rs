//! Waypoint CLI - Command-line interface for Waypoint
//!
//! This is the main entry point for users interacting with Waypoint.
//! It provides one subcommand per graph operation, working against a JSON
//! session file, plus a server mode for long-lived interactive sessions.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "waypoint")]
#[command(author = "Waypoint Contributors")]
#[command(version)]
#[command(about = "Weighted route graphs with shortest-path queries", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the graph session file
    #[arg(short, long, global = true, default_value = "waypoint.json")]
    graph: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new graph session file
    Init {
        /// Seed the session with the seven-waypoint demo topology
        #[arg(long)]
        demo: bool,
    },

    /// Add a node to the graph
    AddNode {
        /// Node label
        id: String,
    },

    /// Remove a node and every edge incident to it
    RemoveNode {
        /// Node label
        id: String,
    },

    /// Connect two nodes (creating them if needed)
    AddEdge {
        /// First endpoint
        a: String,

        /// Second endpoint
        b: String,

        /// Edge weight (non-negative)
        weight: f64,
    },

    /// Remove the edge between two nodes
    RemoveEdge {
        /// First endpoint
        a: String,

        /// Second endpoint
        b: String,
    },

    /// Check whether a node exists
    HasNode {
        /// Node label
        id: String,
    },

    /// Show a node's neighbors and edge weights
    Neighbors {
        /// Node label
        id: String,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Find the lightest route between two nodes
    Route {
        /// Start node
        start: String,

        /// Goal node
        goal: String,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Show session statistics
    Status,

    /// Export the graph to JSON
    Export {
        /// Output file
        #[arg(short, long, default_value = "waypoint-graph.json")]
        output: PathBuf,
    },

    /// Start the Waypoint server over this session
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "9641")]
        port: u16,

        /// Headless mode: bind to 0.0.0.0 for remote access
        #[arg(long)]
        headless: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let session = cli.graph;
    let result = match cli.command {
        Commands::Init { demo } => commands::init(&session, demo),
        Commands::AddNode { id } => commands::add_node(&session, &id),
        Commands::RemoveNode { id } => commands::remove_node(&session, &id),
        Commands::AddEdge { a, b, weight } => commands::add_edge(&session, &a, &b, weight),
        Commands::RemoveEdge { a, b } => commands::remove_edge(&session, &a, &b),
        Commands::HasNode { id } => commands::has_node(&session, &id),
        Commands::Neighbors { id, json } => commands::neighbors(&session, &id, json),
        Commands::Route { start, goal, json } => commands::route(&session, &start, &goal, json),
        Commands::Status => commands::status(&session),
        Commands::Export { output } => commands::export(&session, &output),
        Commands::Serve { port, headless } => commands::serve(&session, port, headless).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
