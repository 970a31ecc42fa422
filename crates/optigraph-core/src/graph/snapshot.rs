//! Snapshot BFS over the versioned graph.
//!
//! A node is invisible at snapshot `v` if it was created at or after `v`, or
//! if it was deleted strictly before `v`. The same rule applies to vertices
//! and edges. Creations racing with the traversal are therefore skipped,
//! while deletions racing with it are still followed; the reclamation gate
//! keeps those nodes linked until the reader is gone.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use super::clock::ReaderTicket;
use super::list::bound;
use super::versioned::VersionedGraph;
use super::{Distances, Version, VertexKey};

/// A registered BFS reader with a fixed snapshot version.
///
/// Created by [`VersionedGraph::snapshot`]. While it is alive, removals leave
/// their nodes linked. Dropping it deregisters the reader and runs whatever
/// sweep the reclamation policy calls for.
pub struct SnapshotGuard<'g> {
    graph: &'g VersionedGraph,
    ticket: ReaderTicket<'g>,
}

impl<'g> SnapshotGuard<'g> {
    pub(super) fn new(graph: &'g VersionedGraph, ticket: ReaderTicket<'g>) -> Self {
        Self { graph, ticket }
    }

    /// The version this snapshot observes.
    #[must_use]
    pub fn version(&self) -> Version {
        self.ticket.version()
    }

    /// Whether `key` names a vertex visible in this snapshot.
    #[must_use]
    pub fn contains_vertex(&self, key: VertexKey) -> bool {
        let version = self.version();
        self.graph
            .core
            .vertices()
            .find_where(bound(key), |vertex| vertex.visible_at(version))
            .is_some()
    }

    /// Hop distances from `source` to every vertex reachable in this snapshot.
    ///
    /// Returns `None` if `source` is not visible at this snapshot's version.
    #[must_use]
    pub fn bfs(&self, source: VertexKey) -> Option<Distances> {
        let version = self.version();
        let vertices = self.graph.core.vertices();

        let start = vertices.find_where(bound(source), |vertex| vertex.visible_at(version))?;

        let mut distances: Distances = FxHashMap::default();
        distances.insert(source, 0);
        let mut queue = VecDeque::from([start]);

        while let Some(vertex) = queue.pop_front() {
            if !vertex.visible_at(version) {
                continue;
            }
            let Some(&depth) = distances.get(&vertex.key()) else {
                continue;
            };

            for edge in vertex.payload().nodes() {
                let target = edge.key();
                if !edge.visible_at(version) || distances.contains_key(&target) {
                    continue;
                }
                // The live node for this key may be too new; a stale one
                // deleted after the snapshot began is the visible one then.
                if let Some(next) =
                    vertices.find_where(edge.bound(), |vertex| vertex.visible_at(version))
                {
                    distances.insert(target, depth + 1);
                    queue.push_back(next);
                }
            }
        }

        Some(distances)
    }
}

impl Drop for SnapshotGuard<'_> {
    fn drop(&mut self) {
        let gate = self.graph.core.reclaimer();
        if let Some(filter) = gate.leave(&self.ticket) {
            self.graph.sweep_with(filter);
        }
    }
}
