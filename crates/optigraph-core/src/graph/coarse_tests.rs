//! Tests for the coarse-grained baseline.

use super::{CoarseGraph, Graph, Traversable};

#[test]
fn test_coarse_operations() {
    let graph = CoarseGraph::new();
    assert_eq!(graph.name(), "coarse");
    assert!(graph.add_vertex(1));
    assert!(!graph.add_vertex(1));
    assert!(!graph.add_edge(1, 2), "missing target");
    assert!(!graph.add_edge(2, 1), "missing source");

    graph.add_vertex(2);
    assert!(graph.add_edge(1, 2));
    assert!(!graph.add_edge(1, 2));
    assert!(graph.contains_edge(1, 2));
    assert!(graph.remove_edge(1, 2));
    assert!(!graph.remove_edge(1, 2));
    assert_eq!(graph.vertex_count(), 2);
}

#[test]
fn test_coarse_remove_vertex_drops_incoming_edges() {
    let graph = CoarseGraph::new();
    for key in 1..=3 {
        graph.add_vertex(key);
    }
    graph.add_edge(1, 3);
    graph.add_edge(2, 3);
    assert!(graph.remove_vertex(3));
    assert!(!graph.remove_vertex(3));

    graph.add_vertex(3);
    assert!(!graph.contains_edge(1, 3));
    assert!(!graph.contains_edge(2, 3));
}

#[test]
fn test_coarse_bfs() {
    let graph = CoarseGraph::new();
    for key in 1..=4 {
        graph.add_vertex(key);
    }
    graph.add_edge(1, 2);
    graph.add_edge(2, 3);
    graph.add_edge(3, 4);
    graph.add_edge(4, 4);

    let distances = graph.bfs(1).expect("source exists");
    assert_eq!(distances.len(), 4);
    assert_eq!(distances[&4], 3);
    assert!(graph.bfs(9).is_none());
    assert!(graph.as_traversable().is_some());
}
