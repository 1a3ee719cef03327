//! Property-based tests for the route graph and path engine.
//!
//! These tests exercise randomized small graphs (at most eight nodes) and
//! compare the path engine against a brute-force enumeration of simple
//! paths, alongside the structural invariants every mutation must preserve.
//! Weights are drawn from small integers so comparisons stay exact.

use proptest::prelude::*;
use std::collections::HashSet;
use waypoint_graph::{PathError, RouteGraph};

const POOL: usize = 8;

fn label(i: usize) -> String {
    char::from(b'A' + i as u8).to_string()
}

fn edge_list_strategy() -> impl Strategy<Value = Vec<(usize, usize, u32)>> {
    prop::collection::vec((0..POOL, 0..POOL, 0u32..10), 0..24)
}

fn build(edges: &[(usize, usize, u32)]) -> RouteGraph {
    RouteGraph::from_edges(
        edges
            .iter()
            .map(|&(a, b, w)| (label(a), label(b), f64::from(w))),
    )
}

/// Minimal total weight over every simple path, found the slow way.
fn brute_force_min(graph: &RouteGraph, start: &str, goal: &str) -> Option<f64> {
    fn visit(
        graph: &RouteGraph,
        current: &str,
        goal: &str,
        visited: &mut HashSet<String>,
        acc: f64,
        best: &mut Option<f64>,
    ) {
        if current == goal {
            if best.map_or(true, |b| acc < b) {
                *best = Some(acc);
            }
            return;
        }
        for (next, weight) in graph.neighbors(current) {
            if visited.insert(next.clone()) {
                visit(graph, &next, goal, visited, acc + weight, best);
                visited.remove(&next);
            }
        }
    }

    let mut best = None;
    let mut visited = HashSet::from([start.to_string()]);
    visit(graph, start, goal, &mut visited, 0.0, &mut best);
    best
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_edges_are_symmetric(edges in edge_list_strategy()) {
        let graph = build(&edges);

        for edge in graph.export_edges() {
            let neighbors_a = graph.neighbors(&edge.a);
            let neighbors_b = graph.neighbors(&edge.b);
            prop_assert_eq!(neighbors_a.get(&edge.b), Some(&edge.weight));
            prop_assert_eq!(neighbors_b.get(&edge.a), Some(&edge.weight));
        }
    }

    #[test]
    fn prop_removed_node_leaves_no_references(
        edges in edge_list_strategy(),
        victim in 0..POOL,
    ) {
        let mut graph = build(&edges);
        let victim = label(victim);
        graph.remove_node(&victim);

        prop_assert!(!graph.has_node(&victim));
        for id in graph.node_ids() {
            prop_assert!(!graph.neighbors(&id).contains_key(&victim));
        }
    }

    #[test]
    fn prop_absent_removals_change_nothing(edges in edge_list_strategy()) {
        let mut graph = build(&edges);
        let nodes_before = graph.node_ids();
        let edges_before = graph.export_edges();

        // The label pool is single uppercase letters, so these never exist.
        graph.remove_node("missing");
        graph.remove_edge("missing", "also-missing");
        graph.remove_edge("A", "missing");

        prop_assert_eq!(graph.node_ids(), nodes_before);
        prop_assert_eq!(graph.export_edges(), edges_before);
    }

    #[test]
    fn prop_route_is_minimal_and_valid(
        edges in edge_list_strategy(),
        s in 0..POOL,
        g in 0..POOL,
    ) {
        let graph = build(&edges);
        let (start, goal) = (label(s), label(g));

        if !graph.has_node(&start) || !graph.has_node(&goal) {
            let err = graph.find_path(&start, &goal).unwrap_err();
            prop_assert!(matches!(err, PathError::UnknownNode(_)));
        } else {
            match graph.find_path(&start, &goal) {
                Ok(path) => {
                    prop_assert_eq!(path.nodes.first().map(String::as_str), Some(start.as_str()));
                    prop_assert_eq!(path.nodes.last().map(String::as_str), Some(goal.as_str()));

                    let mut walked = 0.0;
                    for pair in path.nodes.windows(2) {
                        let weight = graph.edge_weight(&pair[0], &pair[1]);
                        prop_assert!(weight.is_some(), "route uses a nonexistent edge");
                        walked += weight.unwrap_or_default();
                    }
                    prop_assert_eq!(walked, path.total_weight);

                    let best = brute_force_min(&graph, &start, &goal);
                    prop_assert_eq!(Some(path.total_weight), best);
                }
                Err(PathError::NoPathFound { .. }) => {
                    prop_assert!(brute_force_min(&graph, &start, &goal).is_none());
                }
                Err(err) => prop_assert!(false, "unexpected error: {err}"),
            }
        }
    }
}
