//! The versioned graph: optimistic lock coupling, versioned logical deletion
//! and deferred physical reclamation.

use tracing::debug;

use crate::config::GraphConfig;

use super::clock::{ReclamationGate, ReclamationPolicy, SweepFilter};
use super::engine::GraphCore;
use super::snapshot::SnapshotGuard;
use super::stats::LockStatsSnapshot;
use super::sweep::{sweep, SweepReport};
use super::{Distances, Graph, Traversable, Version, VertexKey};

/// Concurrent directed graph with consistent-snapshot BFS.
///
/// Mutations lock only the two list nodes around the affected position.
/// Membership queries never lock. A BFS sees the graph as of the moment it
/// registered, while removals made during the traversal stay linked until
/// the reclamation policy allows a sweep.
///
/// # Example
///
/// ```rust
/// use optigraph_core::{Graph, Traversable, VersionedGraph};
///
/// let graph = VersionedGraph::new();
/// for key in 1..=3 {
///     graph.add_vertex(key);
/// }
/// graph.add_edge(1, 2);
/// graph.add_edge(2, 3);
///
/// let distances = graph.bfs(1).expect("source is visible");
/// assert_eq!(distances[&3], 2);
/// ```
pub struct VersionedGraph {
    pub(super) core: GraphCore<ReclamationGate>,
}

impl VersionedGraph {
    /// Creates an empty graph with the default (concurrent) reclamation policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(ReclamationPolicy::default())
    }

    /// Creates an empty graph with the given reclamation policy.
    #[must_use]
    pub fn with_policy(policy: ReclamationPolicy) -> Self {
        Self {
            core: GraphCore::new(ReclamationGate::new(policy)),
        }
    }

    /// Creates an empty graph from configuration.
    #[must_use]
    pub fn from_config(config: &GraphConfig) -> Self {
        Self::with_policy(config.reclamation)
    }

    /// Returns the reclamation policy chosen at construction.
    #[must_use]
    pub fn policy(&self) -> ReclamationPolicy {
        self.core.reclaimer().policy()
    }

    /// Returns the current value of the version clock.
    #[must_use]
    pub fn version(&self) -> Version {
        self.core.reclaimer().clock().current()
    }

    /// Returns the number of snapshots currently registered.
    #[must_use]
    pub fn active_readers(&self) -> usize {
        self.core.reclaimer().readers()
    }

    /// Returns the locking and reclamation counters.
    #[must_use]
    pub fn stats(&self) -> LockStatsSnapshot {
        self.core.stats().snapshot()
    }

    /// Registers a reader and captures a snapshot version.
    ///
    /// Under [`ReclamationPolicy::Exclusive`] this blocks while another
    /// snapshot is alive. Dropping the guard deregisters it and runs the
    /// policy's sweep.
    pub fn snapshot(&self) -> SnapshotGuard<'_> {
        self.core.stats().record_snapshot();
        SnapshotGuard::new(self, self.core.reclaimer().enter())
    }

    /// Physically unlinks every node deleted so far, if no reader is active.
    ///
    /// Returns an empty report when a snapshot is alive: its readers may
    /// still need the nodes.
    pub fn sweep(&self) -> SweepReport {
        let gate = self.core.reclaimer();
        // Read the clock before checking readers: any reader that registers
        // afterwards gets a strictly greater version.
        let horizon = gate.clock().current();
        if !gate.cleanup_permitted() {
            debug!(readers = gate.readers(), "snapshot readers active, sweep skipped");
            return SweepReport::default();
        }
        sweep(self.core.vertices(), SweepFilter::UpTo(horizon), self.core.stats())
    }

    pub(super) fn sweep_with(&self, filter: SweepFilter) -> SweepReport {
        sweep(self.core.vertices(), filter, self.core.stats())
    }
}

impl Default for VersionedGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph for VersionedGraph {
    fn name(&self) -> &'static str {
        match self.policy() {
            ReclamationPolicy::Exclusive => "versioned-exclusive",
            ReclamationPolicy::Concurrent => "versioned-concurrent",
        }
    }

    fn add_vertex(&self, key: VertexKey) -> bool {
        self.core.add_vertex(key)
    }

    fn remove_vertex(&self, key: VertexKey) -> bool {
        self.core.remove_vertex(key)
    }

    fn add_edge(&self, u: VertexKey, v: VertexKey) -> bool {
        self.core.add_edge(u, v)
    }

    fn remove_edge(&self, u: VertexKey, v: VertexKey) -> bool {
        self.core.remove_edge(u, v)
    }

    fn contains_vertex(&self, key: VertexKey) -> bool {
        self.core.contains_vertex(key)
    }

    fn contains_edge(&self, u: VertexKey, v: VertexKey) -> bool {
        self.core.contains_edge(u, v)
    }

    fn vertex_count(&self) -> usize {
        self.core.vertex_count()
    }

    fn as_traversable(&self) -> Option<&dyn Traversable> {
        Some(self)
    }
}

impl Traversable for VersionedGraph {
    fn bfs(&self, source: VertexKey) -> Option<Distances> {
        self.snapshot().bfs(source)
    }
}
