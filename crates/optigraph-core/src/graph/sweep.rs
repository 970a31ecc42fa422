//! Cleanup sweeper: physically unlinks logically deleted nodes.
//!
//! Walks the vertex list, unlinking every marked vertex the filter admits.
//! Each surviving vertex then gets the same treatment for its adjacency list.
//! A vertex that is swept away takes its adjacency list with it.

use serde::Serialize;

use super::clock::SweepFilter;
use super::engine::VertexList;
use super::stats::LockStats;

/// What one sweep unlinked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Vertex nodes unlinked.
    pub vertices: usize,
    /// Edge nodes unlinked from surviving vertices.
    pub edges: usize,
}

impl SweepReport {
    /// True if nothing was unlinked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices == 0 && self.edges == 0
    }
}

pub(crate) fn sweep(vertices: &VertexList, filter: SweepFilter, stats: &LockStats) -> SweepReport {
    let mut edges = 0;
    let unlinked_vertices = vertices.sweep(
        |vertex| filter.admits(vertex),
        stats,
        |vertex| {
            edges += vertex
                .payload()
                .sweep(|edge| filter.admits(edge), stats, |_| {});
        },
    );

    let report = SweepReport {
        vertices: unlinked_vertices,
        edges,
    };
    stats.record_sweep(report);
    tracing::debug!(
        ?filter,
        vertices = report.vertices,
        edges = report.edges,
        "sweep finished"
    );
    report
}
