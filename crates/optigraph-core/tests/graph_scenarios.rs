//! Behavioral scenarios every graph variant must agree on.
//!
//! Each scenario runs against every [`GraphVariant`] and, for the versioned
//! graph, against both reclamation policies.

use optigraph_core::{
    Distances, Graph, GraphConfig, GraphVariant, ReclamationPolicy, VersionedGraph, VertexKey,
};

fn all_graphs() -> Vec<Box<dyn Graph>> {
    let mut graphs: Vec<Box<dyn Graph>> = GraphVariant::ALL
        .into_iter()
        .map(|variant| variant.build(&GraphConfig::default()))
        .collect();
    graphs.push(GraphVariant::Versioned.build(&GraphConfig {
        reclamation: ReclamationPolicy::Exclusive,
    }));
    graphs
}

fn sorted(distances: &Distances) -> Vec<(VertexKey, usize)> {
    let mut pairs: Vec<_> = distances.iter().map(|(&k, &d)| (k, d)).collect();
    pairs.sort_unstable();
    pairs
}

fn build_chain(graph: &dyn Graph) {
    for key in 1..=4 {
        assert!(graph.add_vertex(key), "{}: add {key}", graph.name());
    }
    for (u, v) in [(1, 2), (2, 3), (3, 4)] {
        assert!(graph.add_edge(u, v), "{}: edge {u}->{v}", graph.name());
    }
}

#[test]
fn chain_reachability() {
    for graph in all_graphs() {
        build_chain(graph.as_ref());
        let Some(traversable) = graph.as_traversable() else {
            assert_eq!(graph.name(), "lazy");
            continue;
        };

        let distances = traversable.bfs(1).expect("source exists");
        assert_eq!(
            sorted(&distances),
            vec![(1, 0), (2, 1), (3, 2), (4, 3)],
            "{}",
            graph.name()
        );
        let distances = traversable.bfs(3).expect("source exists");
        assert_eq!(sorted(&distances), vec![(3, 0), (4, 1)], "{}", graph.name());
    }
}

#[test]
fn removing_a_vertex_cuts_the_chain() {
    for graph in all_graphs() {
        build_chain(graph.as_ref());
        assert!(graph.remove_vertex(3));
        assert!(!graph.contains_vertex(3));
        assert!(!graph.contains_edge(2, 3));
        assert!(!graph.contains_edge(3, 4));

        if let Some(traversable) = graph.as_traversable() {
            let distances = traversable.bfs(1).expect("source exists");
            assert_eq!(sorted(&distances), vec![(1, 0), (2, 1)], "{}", graph.name());
            assert!(traversable.bfs(3).is_none(), "{}", graph.name());
        }
    }
}

#[test]
fn adds_are_idempotent_and_removes_of_absent_items_are_noops() {
    for graph in all_graphs() {
        assert!(graph.add_vertex(10));
        assert!(!graph.add_vertex(10));
        assert!(!graph.remove_vertex(11));
        assert!(!graph.remove_edge(10, 11));
        assert!(!graph.add_edge(10, 11), "{}: missing endpoint", graph.name());

        graph.add_vertex(11);
        assert!(graph.add_edge(10, 11));
        assert!(!graph.add_edge(10, 11));
        assert_eq!(graph.vertex_count(), 2, "{}", graph.name());
    }
}

#[test]
fn edges_are_directed() {
    for graph in all_graphs() {
        graph.add_vertex(1);
        graph.add_vertex(2);
        graph.add_edge(2, 1);
        assert!(graph.contains_edge(2, 1));
        assert!(!graph.contains_edge(1, 2), "{}", graph.name());

        if let Some(traversable) = graph.as_traversable() {
            assert_eq!(sorted(&traversable.bfs(1).expect("source")), vec![(1, 0)]);
        }
    }
}

#[test]
fn readded_vertex_starts_without_edges() {
    for graph in all_graphs() {
        build_chain(graph.as_ref());
        graph.remove_vertex(2);
        assert!(graph.add_vertex(2));
        assert!(!graph.contains_edge(1, 2), "{}", graph.name());
        assert!(!graph.contains_edge(2, 3), "{}", graph.name());
    }
}

#[test]
fn negative_and_extreme_keys() {
    for graph in all_graphs() {
        for key in [VertexKey::MIN, -1, 0, VertexKey::MAX] {
            assert!(graph.add_vertex(key));
        }
        assert!(graph.add_edge(VertexKey::MIN, VertexKey::MAX));
        assert!(graph.add_edge(VertexKey::MAX, -1));
        assert!(graph.contains_edge(VertexKey::MIN, VertexKey::MAX));

        if let Some(traversable) = graph.as_traversable() {
            let distances = traversable.bfs(VertexKey::MIN).expect("source");
            assert_eq!(distances[&-1], 2, "{}", graph.name());
            assert!(!distances.contains_key(&0));
        }
    }
}

#[test]
fn snapshot_isolation_against_creations() {
    let graph = VersionedGraph::new();
    build_chain(&graph);

    let snapshot = graph.snapshot();
    graph.add_vertex(5);
    graph.add_edge(4, 5);

    let distances = snapshot.bfs(1).expect("source visible");
    assert!(!distances.contains_key(&5));
    drop(snapshot);

    let distances = optigraph_core::Traversable::bfs(&graph, 1).expect("source");
    assert_eq!(distances[&5], 4);
}
