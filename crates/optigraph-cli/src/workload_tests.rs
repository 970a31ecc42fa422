//! Tests for the workload driver.

use optigraph_core::GraphVariant;

use super::config::{BenchConfig, OperationMix};
use super::workload::run_variant;

fn small_config() -> BenchConfig {
    BenchConfig {
        threads: 3,
        ops_per_thread: 500,
        seed: Some(5),
        ..BenchConfig::default()
    }
}

#[test]
fn test_every_variant_completes_all_operations() {
    let config = small_config();
    for variant in GraphVariant::ALL {
        let report = run_variant(variant, &config);
        assert_eq!(report.total_ops, 1_500, "{variant}");
        assert_eq!(report.threads, 3);
    }
}

#[test]
fn test_bfs_skipped_only_without_capability() {
    let config = BenchConfig {
        mix: OperationMix {
            add_vertex: 1.0,
            add_edge: 1.0,
            remove_vertex: 0.0,
            remove_edge: 0.0,
            contains_vertex: 0.0,
            contains_edge: 0.0,
            bfs: 1.0,
        },
        ..small_config()
    };

    let lazy = run_variant(GraphVariant::Lazy, &config);
    assert_eq!(lazy.operations.bfs, 0);
    assert!(lazy.operations.skipped_bfs > 0);

    let versioned = run_variant(GraphVariant::Versioned, &config);
    assert_eq!(versioned.operations.skipped_bfs, 0);
    assert!(versioned.operations.bfs > 0);
}

#[test]
fn test_add_only_mix_grows_graph_by_per_thread_ids() {
    let config = BenchConfig {
        threads: 2,
        ops_per_thread: 100,
        mix: OperationMix {
            add_vertex: 1.0,
            add_edge: 0.0,
            remove_vertex: 0.0,
            remove_edge: 0.0,
            contains_vertex: 0.0,
            contains_edge: 0.0,
            bfs: 0.0,
        },
        ..small_config()
    };
    // Both workers add ids 1..=100, so they collide on every key.
    let report = run_variant(GraphVariant::Coarse, &config);
    assert_eq!(report.vertex_count, 100);
    assert_eq!(report.operations.add_vertex, 200);
}
