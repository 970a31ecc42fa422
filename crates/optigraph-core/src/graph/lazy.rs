//! Fine-grained baselines without versioning.
//!
//! [`LazyGraph`] uses the same lock-coupled lists as the versioned graph but
//! unlinks every removed node immediately and offers no BFS. [`NaiveGraph`]
//! adds a BFS that locks every node it visits and releases them all at the end.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use super::engine::{Eager, GraphCore};
use super::list::bound;
use super::stats::LockStatsSnapshot;
use super::{Distances, Graph, Traversable, VertexKey};

/// Lock-coupled lazy-list graph with immediate physical deletion.
pub struct LazyGraph {
    core: GraphCore<Eager>,
}

impl LazyGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            core: GraphCore::new(Eager),
        }
    }

    /// Returns the locking counters.
    #[must_use]
    pub fn stats(&self) -> LockStatsSnapshot {
        self.core.stats().snapshot()
    }
}

impl Default for LazyGraph {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! delegate_graph_ops {
    ($core:ident) => {
        fn add_vertex(&self, key: VertexKey) -> bool {
            self.$core().add_vertex(key)
        }

        fn remove_vertex(&self, key: VertexKey) -> bool {
            self.$core().remove_vertex(key)
        }

        fn add_edge(&self, u: VertexKey, v: VertexKey) -> bool {
            self.$core().add_edge(u, v)
        }

        fn remove_edge(&self, u: VertexKey, v: VertexKey) -> bool {
            self.$core().remove_edge(u, v)
        }

        fn contains_vertex(&self, key: VertexKey) -> bool {
            self.$core().contains_vertex(key)
        }

        fn contains_edge(&self, u: VertexKey, v: VertexKey) -> bool {
            self.$core().contains_edge(u, v)
        }

        fn vertex_count(&self) -> usize {
            self.$core().vertex_count()
        }
    };
}

impl LazyGraph {
    pub(super) fn core(&self) -> &GraphCore<Eager> {
        &self.core
    }
}

impl Graph for LazyGraph {
    fn name(&self) -> &'static str {
        "lazy"
    }

    delegate_graph_ops!(core);
}

/// [`LazyGraph`] plus a BFS that holds a lock on every node it visits.
///
/// Locks are taken with `try_lock`. If one is unavailable the traversal
/// releases everything it holds, yields, and starts over, so it never waits
/// on a lock while holding others out of list order.
#[derive(Default)]
pub struct NaiveGraph {
    inner: LazyGraph,
}

/// A lock was unavailable; the attempt must be restarted.
struct Contended;

impl NaiveGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the locking counters. Restarted traversals count as retries.
    #[must_use]
    pub fn stats(&self) -> LockStatsSnapshot {
        self.inner.stats()
    }

    pub(super) fn core(&self) -> &GraphCore<Eager> {
        &self.inner.core
    }

    fn try_bfs(&self, source: VertexKey) -> Result<Option<Distances>, Contended> {
        let vertices = self.core().vertices();
        let start = vertices.find(bound(source));
        if !start.is_live(bound(source)) {
            return Ok(None);
        }

        let mut held = Vec::new();
        let mut distances: Distances = FxHashMap::default();
        distances.insert(source, 0);
        let mut queue = VecDeque::from([start]);

        while let Some(vertex) = queue.pop_front() {
            held.push(vertex.try_lock().ok_or(Contended)?);
            if vertex.is_marked() {
                if vertex.key() == source {
                    return Ok(None);
                }
                continue;
            }
            let Some(&depth) = distances.get(&vertex.key()) else {
                continue;
            };

            for edge in vertex.payload().nodes() {
                held.push(edge.try_lock().ok_or(Contended)?);
                let target = edge.key();
                if edge.is_marked() || distances.contains_key(&target) {
                    continue;
                }
                let next = vertices.find(edge.bound());
                if next.is_live(edge.bound()) {
                    distances.insert(target, depth + 1);
                    queue.push_back(next);
                }
            }
        }

        drop(held);
        Ok(Some(distances))
    }
}

impl Graph for NaiveGraph {
    fn name(&self) -> &'static str {
        "naive"
    }

    delegate_graph_ops!(core);

    fn as_traversable(&self) -> Option<&dyn Traversable> {
        Some(self)
    }
}

impl Traversable for NaiveGraph {
    fn bfs(&self, source: VertexKey) -> Option<Distances> {
        loop {
            match self.try_bfs(source) {
                Ok(distances) => return distances,
                Err(Contended) => {
                    self.core().stats().record_retry();
                    tracing::trace!(source, "naive bfs hit a held lock, restarting");
                    std::thread::yield_now();
                }
            }
        }
    }
}
