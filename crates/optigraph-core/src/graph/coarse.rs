//! Coarse-grained baseline: one mutex around the whole graph.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use super::{Distances, Graph, Traversable, VertexKey};

/// Directed graph where every operation, BFS included, holds a single
/// graph-wide lock.
#[derive(Debug, Default)]
pub struct CoarseGraph {
    /// Vertex -> sorted outgoing targets.
    adjacency: Mutex<BTreeMap<VertexKey, BTreeSet<VertexKey>>>,
}

impl CoarseGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Graph for CoarseGraph {
    fn name(&self) -> &'static str {
        "coarse"
    }

    fn add_vertex(&self, key: VertexKey) -> bool {
        let mut adjacency = self.adjacency.lock();
        if adjacency.contains_key(&key) {
            return false;
        }
        adjacency.insert(key, BTreeSet::new());
        true
    }

    fn remove_vertex(&self, key: VertexKey) -> bool {
        let mut adjacency = self.adjacency.lock();
        if adjacency.remove(&key).is_none() {
            return false;
        }
        for targets in adjacency.values_mut() {
            targets.remove(&key);
        }
        true
    }

    fn add_edge(&self, u: VertexKey, v: VertexKey) -> bool {
        let mut adjacency = self.adjacency.lock();
        if !adjacency.contains_key(&v) {
            return false;
        }
        adjacency
            .get_mut(&u)
            .is_some_and(|targets| targets.insert(v))
    }

    fn remove_edge(&self, u: VertexKey, v: VertexKey) -> bool {
        self.adjacency
            .lock()
            .get_mut(&u)
            .is_some_and(|targets| targets.remove(&v))
    }

    fn contains_vertex(&self, key: VertexKey) -> bool {
        self.adjacency.lock().contains_key(&key)
    }

    fn contains_edge(&self, u: VertexKey, v: VertexKey) -> bool {
        self.adjacency
            .lock()
            .get(&u)
            .is_some_and(|targets| targets.contains(&v))
    }

    fn vertex_count(&self) -> usize {
        self.adjacency.lock().len()
    }

    fn as_traversable(&self) -> Option<&dyn Traversable> {
        Some(self)
    }
}

impl Traversable for CoarseGraph {
    fn bfs(&self, source: VertexKey) -> Option<Distances> {
        let adjacency = self.adjacency.lock();
        if !adjacency.contains_key(&source) {
            return None;
        }

        let mut distances: Distances = FxHashMap::default();
        distances.insert(source, 0);
        let mut queue = VecDeque::from([(source, 0usize)]);

        while let Some((current, depth)) = queue.pop_front() {
            let Some(targets) = adjacency.get(&current) else {
                continue;
            };
            for &target in targets {
                if distances.contains_key(&target) {
                    continue;
                }
                distances.insert(target, depth + 1);
                queue.push_back((target, depth + 1));
            }
        }

        Some(distances)
    }
}
