//! Vertex and edge operations shared by the fine-grained graphs.
//!
//! [`GraphCore`] owns the vertex list; each vertex owns its adjacency list.
//! Every mutation goes through the lock-coupling locator of the list it
//! touches. Whether a removal also unlinks the node right away, and which
//! version it is stamped with, is decided by the [`Reclaimer`].

use std::sync::Arc;

use super::clock::ReclamationGate;
use super::list::{bound, Node, SortedList};
use super::stats::LockStats;
use super::{Version, VertexKey};

/// Adjacency list of one vertex; edge nodes carry the target's key.
pub(crate) type EdgeList = SortedList<()>;
/// A vertex node owns its adjacency list.
pub(crate) type VertexNode = Node<EdgeList>;
/// The graph-wide vertex list.
pub(crate) type VertexList = SortedList<EdgeList>;

/// Stamping and unlinking decisions for one graph flavor.
pub(crate) trait Reclaimer: Send + Sync {
    /// Version stamped on a creation or a deletion.
    fn stamp(&self) -> Version;

    /// Whether a node marked right now may be physically unlinked.
    fn cleanup_permitted(&self) -> bool;
}

/// No snapshots: every removal unlinks immediately.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Eager;

impl Reclaimer for Eager {
    fn stamp(&self) -> Version {
        0
    }

    fn cleanup_permitted(&self) -> bool {
        true
    }
}

impl Reclaimer for ReclamationGate {
    fn stamp(&self) -> Version {
        self.clock().current()
    }

    fn cleanup_permitted(&self) -> bool {
        ReclamationGate::cleanup_permitted(self)
    }
}

pub(crate) struct GraphCore<R> {
    vertices: VertexList,
    reclaimer: R,
    stats: LockStats,
}

impl<R: Reclaimer> GraphCore<R> {
    pub(crate) fn new(reclaimer: R) -> Self {
        Self {
            vertices: VertexList::new(),
            reclaimer,
            stats: LockStats::new(),
        }
    }

    pub(crate) fn vertices(&self) -> &VertexList {
        &self.vertices
    }

    pub(crate) fn reclaimer(&self) -> &R {
        &self.reclaimer
    }

    pub(crate) fn stats(&self) -> &LockStats {
        &self.stats
    }

    // ── Vertices ───────────────────────────────────────────────────────

    /// Inserts `key` unless an unmarked vertex already carries it.
    ///
    /// A marked vertex with the same key may still be linked; the new node
    /// goes in front of it.
    pub(crate) fn add_vertex(&self, key: VertexKey) -> bool {
        let key = bound(key);
        let pair = self.vertices.locate(key, &self.stats);
        if pair.curr().is_live(key) {
            return false;
        }
        pair.insert(Node::new(key, self.reclaimer.stamp(), EdgeList::new()));
        true
    }

    /// Logically deletes the vertex, then every edge that targets it.
    pub(crate) fn remove_vertex(&self, key: VertexKey) -> bool {
        {
            let pair = self.vertices.locate(bound(key), &self.stats);
            if !pair.curr().is_live(bound(key)) {
                return false;
            }
            pair.mark(self.reclaimer.stamp());
            if self.reclaimer.cleanup_permitted() {
                pair.unlink();
                self.stats.record_vertex_unlink();
            }
        }
        self.remove_incoming_edges(key);
        true
    }

    /// Removes `(x, key)` for every vertex `x`, locking each adjacency list
    /// independently.
    ///
    /// Always takes the locks: an unlocked probe could miss an edge whose
    /// insertion passed its target check just before the mark.
    fn remove_incoming_edges(&self, key: VertexKey) {
        for vertex in self.vertices.nodes() {
            self.remove_edge_from(&vertex, key);
        }
    }

    // ── Edges ──────────────────────────────────────────────────────────

    /// Finds both endpoints in a single ascending walk of the vertex list.
    ///
    /// Returns `(u, v)` in the caller's order, or `None` if either endpoint
    /// is absent or marked. A self-loop resolves the one vertex twice.
    pub(crate) fn endpoints(
        &self,
        u: VertexKey,
        v: VertexKey,
    ) -> Option<(Arc<VertexNode>, Arc<VertexNode>)> {
        let (smaller, larger) = if u <= v { (u, v) } else { (v, u) };

        let (_, first) = self.vertices.search(bound(smaller));
        if !first.is_live(bound(smaller)) {
            return None;
        }

        let second = if smaller == larger {
            Arc::clone(&first)
        } else {
            let node = first.seek(bound(larger));
            if !node.is_live(bound(larger)) {
                return None;
            }
            node
        };

        Some(if smaller == u {
            (first, second)
        } else {
            (second, first)
        })
    }

    /// Inserts `u -> v` while both endpoints are live.
    ///
    /// The target is rechecked under the adjacency locks. A removal that
    /// marked it earlier locks this same window in its incoming-edge pass,
    /// so it either sees the mark here or finds the new edge there.
    pub(crate) fn add_edge(&self, u: VertexKey, v: VertexKey) -> bool {
        let Some((source, target_vertex)) = self.endpoints(u, v) else {
            return false;
        };
        let target = bound(v);
        let pair = source.payload().locate(target, &self.stats);
        if pair.curr().is_live(target) || target_vertex.is_marked() {
            return false;
        }
        pair.insert(Node::new(target, self.reclaimer.stamp(), ()));
        true
    }

    pub(crate) fn remove_edge(&self, u: VertexKey, v: VertexKey) -> bool {
        match self.endpoints(u, v) {
            // Unlocked probe first; a miss needs no locks.
            Some((source, _)) if source.payload().contains(bound(v)) => {
                self.remove_edge_from(&source, v)
            }
            _ => false,
        }
    }

    fn remove_edge_from(&self, source: &VertexNode, v: VertexKey) -> bool {
        let target = bound(v);
        let pair = source.payload().locate(target, &self.stats);
        if !pair.curr().is_live(target) {
            return false;
        }
        pair.mark(self.reclaimer.stamp());
        if self.reclaimer.cleanup_permitted() {
            pair.unlink();
            self.stats.record_edge_unlink();
        }
        true
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub(crate) fn contains_vertex(&self, key: VertexKey) -> bool {
        self.vertices.contains(bound(key))
    }

    pub(crate) fn contains_edge(&self, u: VertexKey, v: VertexKey) -> bool {
        match self.endpoints(u, v) {
            Some((source, _)) => source.payload().contains(bound(v)),
            None => false,
        }
    }

    /// Counts every vertex node between the sentinels, including marked
    /// nodes that no sweep has unlinked yet.
    pub(crate) fn vertex_count(&self) -> usize {
        self.vertices.nodes().count()
    }
}
