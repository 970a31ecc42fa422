//! Run results: per-variant measurements, human and JSON output, and the
//! plain-text log.

use std::fs::OpenOptions;
use std::io::Write;
use std::ops::AddAssign;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use optigraph_core::{Graph, GraphVariant, ReclamationPolicy};
use serde::Serialize;

use crate::config::BenchConfig;
use crate::workload::Operation;

/// How many times each operation was issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OperationCounts {
    pub add_vertex: u64,
    pub add_edge: u64,
    pub remove_vertex: u64,
    pub remove_edge: u64,
    pub contains_vertex: u64,
    pub contains_edge: u64,
    pub bfs: u64,
    /// BFS draws against a graph without the capability.
    pub skipped_bfs: u64,
}

impl OperationCounts {
    pub fn record(&mut self, op: Operation) {
        let slot = match op {
            Operation::AddVertex => &mut self.add_vertex,
            Operation::AddEdge => &mut self.add_edge,
            Operation::RemoveVertex => &mut self.remove_vertex,
            Operation::RemoveEdge => &mut self.remove_edge,
            Operation::ContainsVertex => &mut self.contains_vertex,
            Operation::ContainsEdge => &mut self.contains_edge,
            Operation::Bfs => &mut self.bfs,
        };
        *slot += 1;
    }

    /// Every draw, skipped BFS calls included.
    pub fn total(&self) -> u64 {
        self.add_vertex
            + self.add_edge
            + self.remove_vertex
            + self.remove_edge
            + self.contains_vertex
            + self.contains_edge
            + self.bfs
            + self.skipped_bfs
    }
}

impl AddAssign for OperationCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.add_vertex += rhs.add_vertex;
        self.add_edge += rhs.add_edge;
        self.remove_vertex += rhs.remove_vertex;
        self.remove_edge += rhs.remove_edge;
        self.contains_vertex += rhs.contains_vertex;
        self.contains_edge += rhs.contains_edge;
        self.bfs += rhs.bfs;
        self.skipped_bfs += rhs.skipped_bfs;
    }
}

/// Measurements for one variant.
#[derive(Debug, Clone, Serialize)]
pub struct VariantReport {
    pub graph: &'static str,
    pub threads: usize,
    pub total_ops: u64,
    pub elapsed_ms: f64,
    pub throughput_kops: f64,
    pub vertex_count: usize,
    pub operations: OperationCounts,
}

impl VariantReport {
    pub fn new(
        graph: &dyn Graph,
        config: &BenchConfig,
        elapsed: Duration,
        operations: OperationCounts,
    ) -> Self {
        let total_ops = operations.total();
        Self {
            graph: graph.name(),
            threads: config.threads,
            total_ops,
            elapsed_ms: elapsed.as_secs_f64() * 1_000.0,
            throughput_kops: throughput_kops(total_ops, elapsed),
            vertex_count: graph.vertex_count(),
            operations,
        }
    }

    /// One tab-separated line for the run log.
    pub fn log_line(&self) -> String {
        format!(
            "{}\tthreads={}\tops={}\telapsed_ms={:.1}\tthroughput_kops={:.1}\tvertices={}",
            self.graph,
            self.threads,
            self.total_ops,
            self.elapsed_ms,
            self.throughput_kops,
            self.vertex_count
        )
    }
}

// Reason: operation totals stay far below 2^52, where f64 is exact.
#[allow(clippy::cast_precision_loss)]
fn throughput_kops(total_ops: u64, elapsed: Duration) -> f64 {
    let seconds = elapsed.as_secs_f64();
    if seconds > 0.0 {
        total_ops as f64 / seconds / 1_000.0
    } else {
        0.0
    }
}

/// Results of a whole `optigraph run`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub threads: usize,
    pub ops_per_thread: u64,
    pub policy: ReclamationPolicy,
    pub variants: Vec<VariantReport>,
}

impl RunReport {
    pub fn new(config: &BenchConfig) -> Self {
        Self {
            threads: config.threads,
            ops_per_thread: config.ops_per_thread,
            policy: config.graph.reclamation,
            variants: Vec::with_capacity(config.variants.len()),
        }
    }

    /// Human-readable summary, one block per variant.
    pub fn render(&self, selected: &[GraphVariant]) -> String {
        let mut out = format!(
            "Running {} variant(s) with {} threads x {} operations.\n",
            selected.len(),
            self.threads,
            self.ops_per_thread
        );
        for variant in &self.variants {
            out.push_str(&format!(
                "\n{}\n  Throughput: {:.1} Kops/s\n  Graph contains {} vertices.\n",
                variant.graph, variant.throughput_kops, variant.vertex_count
            ));
        }
        out
    }
}

/// Appends one line to the plain-text log, creating the file if needed.
pub fn append_log(path: &Path, report: &VariantReport) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    writeln!(file, "{}", report.log_line())
        .with_context(|| format!("Failed to write log file {}", path.display()))
}
