//! Worker threads that drive a graph with a random operation mix.
//!
//! Each worker keeps its own growing vertex id. Adding a vertex uses the next
//! id; every other operation draws its keys uniformly below it. Workers share
//! the key space, so threads contend on the same low keys.

use std::fmt;
use std::time::Instant;

use optigraph_core::{Graph, GraphVariant, VertexKey};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{BenchConfig, OperationMix};
use crate::report::{OperationCounts, VariantReport};

/// One graph operation the harness can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    AddVertex,
    AddEdge,
    RemoveVertex,
    RemoveEdge,
    ContainsVertex,
    ContainsEdge,
    Bfs,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddVertex => "add_vertex",
            Self::AddEdge => "add_edge",
            Self::RemoveVertex => "remove_vertex",
            Self::RemoveEdge => "remove_edge",
            Self::ContainsVertex => "contains_vertex",
            Self::ContainsEdge => "contains_edge",
            Self::Bfs => "bfs",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-thread driver state.
struct Worker<'g, R> {
    graph: &'g dyn Graph,
    mix: OperationMix,
    rng: R,
    next_vertex: VertexKey,
    counts: OperationCounts,
}

impl<'g, R: Rng> Worker<'g, R> {
    fn new(graph: &'g dyn Graph, mix: OperationMix, rng: R) -> Self {
        Self {
            graph,
            mix,
            rng,
            next_vertex: 1,
            counts: OperationCounts::default(),
        }
    }

    fn step(&mut self) {
        let op = self.mix.sample(&mut self.rng);
        let u = self.rng.gen_range(0..self.next_vertex);
        let v = self.rng.gen_range(0..self.next_vertex);

        match op {
            Operation::AddVertex => {
                self.graph.add_vertex(self.next_vertex);
                self.next_vertex = self.next_vertex.saturating_add(1);
            }
            Operation::AddEdge => {
                self.graph.add_edge(u, v);
            }
            Operation::RemoveVertex => {
                self.graph.remove_vertex(u);
            }
            Operation::RemoveEdge => {
                self.graph.remove_edge(u, v);
            }
            Operation::ContainsVertex => {
                self.graph.contains_vertex(u);
            }
            Operation::ContainsEdge => {
                self.graph.contains_edge(u, v);
            }
            Operation::Bfs => match self.graph.as_traversable() {
                Some(traversable) => {
                    traversable.bfs(u);
                }
                None => {
                    self.counts.skipped_bfs += 1;
                    return;
                }
            },
        }
        self.counts.record(op);
    }

    fn run(mut self, ops: u64) -> OperationCounts {
        for _ in 0..ops {
            self.step();
        }
        self.counts
    }
}

fn worker_rng(seed: Option<u64>, thread: usize) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(thread as u64)),
        None => StdRng::from_entropy(),
    }
}

/// Builds a fresh graph of `variant`, runs every worker to completion and
/// measures the wall-clock time.
pub fn run_variant(variant: GraphVariant, config: &BenchConfig) -> VariantReport {
    let graph = variant.build(&config.graph);
    let graph = graph.as_ref();
    info!(
        graph = graph.name(),
        threads = config.threads,
        ops_per_thread = config.ops_per_thread,
        "starting workload"
    );

    let started = Instant::now();
    let counts = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..config.threads)
            .map(|thread| {
                let rng = worker_rng(config.seed, thread);
                let mix = config.mix;
                scope.spawn(move || Worker::new(graph, mix, rng).run(config.ops_per_thread))
            })
            .collect();

        let mut total = OperationCounts::default();
        for handle in handles {
            match handle.join() {
                Ok(counts) => total += counts,
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
        total
    });
    let elapsed = started.elapsed();
    debug!(graph = graph.name(), ?counts, "workers joined");

    let report = VariantReport::new(graph, config, elapsed, counts);
    info!(
        graph = report.graph,
        throughput_kops = report.throughput_kops,
        vertices = report.vertex_count,
        "workload finished"
    );
    report
}
