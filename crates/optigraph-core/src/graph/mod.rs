//! Concurrent in-memory directed graphs.
//!
//! Every variant implements the basic [`Graph`] capability set. BFS is an
//! additional capability, [`Traversable`], that callers can require
//! statically or probe for at runtime with [`Graph::as_traversable`].
//!
//! # Variants
//!
//! - [`VersionedGraph`]: lock-coupled sorted lists, versioned logical
//!   deletion, snapshot BFS and deferred reclamation
//! - [`LazyGraph`]: the same lists with immediate unlinking, no BFS
//! - [`NaiveGraph`]: [`LazyGraph`] plus a BFS that locks every visited node
//! - [`CoarseGraph`]: a single mutex around an adjacency map
//!
//! # Example
//!
//! ```rust
//! use optigraph_core::graph::{Graph, GraphVariant};
//! use optigraph_core::GraphConfig;
//!
//! let graph = GraphVariant::Versioned.build(&GraphConfig::default());
//! graph.add_vertex(1);
//! graph.add_vertex(2);
//! graph.add_edge(1, 2);
//!
//! let traversable = graph.as_traversable().expect("versioned graphs traverse");
//! let distances = traversable.bfs(1).expect("source exists");
//! assert_eq!(distances.len(), 2);
//! ```

mod clock;
mod coarse;
mod engine;
mod lazy;
mod list;
mod snapshot;
mod stats;
mod sweep;
mod versioned;

#[cfg(test)]
mod coarse_tests;
#[cfg(test)]
mod list_tests;

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::GraphConfig;
use crate::error::Error;

pub use clock::ReclamationPolicy;
pub use coarse::CoarseGraph;
pub use lazy::{LazyGraph, NaiveGraph};
pub use snapshot::SnapshotGuard;
pub use stats::LockStatsSnapshot;
pub use sweep::SweepReport;
pub use versioned::VersionedGraph;

/// Vertex identifier. Edges are identified by their `(source, target)` keys.
pub type VertexKey = i32;

/// Value of a graph's version clock.
pub type Version = u64;

/// BFS result: hop distance from the source for every reachable vertex,
/// the source itself included at distance 0.
pub type Distances = FxHashMap<VertexKey, usize>;

/// Basic capability set shared by every graph variant.
///
/// Adding something already present and removing something absent are
/// silent no-ops; the returned flag says whether the call changed the graph.
pub trait Graph: Send + Sync {
    /// Short name used in logs and benchmark reports.
    fn name(&self) -> &'static str;

    /// Inserts a vertex. Returns `false` if it already exists.
    fn add_vertex(&self, key: VertexKey) -> bool;

    /// Removes a vertex and every edge that points to it.
    fn remove_vertex(&self, key: VertexKey) -> bool;

    /// Inserts the directed edge `u -> v` if both endpoints exist.
    fn add_edge(&self, u: VertexKey, v: VertexKey) -> bool;

    /// Removes the directed edge `u -> v`.
    fn remove_edge(&self, u: VertexKey, v: VertexKey) -> bool;

    /// Lock-free membership test where the variant allows it.
    fn contains_vertex(&self, key: VertexKey) -> bool;

    /// Tests for the directed edge `u -> v` with both endpoints present.
    fn contains_edge(&self, u: VertexKey, v: VertexKey) -> bool;

    /// Number of vertex nodes currently linked.
    ///
    /// Fine-grained variants count logically deleted vertices that no sweep
    /// has unlinked yet; only a count taken after a sweep is exact.
    fn vertex_count(&self) -> usize;

    /// Runtime capability probe for BFS.
    fn as_traversable(&self) -> Option<&dyn Traversable> {
        None
    }
}

/// Graphs that support breadth-first search.
pub trait Traversable: Graph {
    /// Hop distances from `source`, or `None` if `source` is not visible.
    fn bfs(&self, source: VertexKey) -> Option<Distances>;
}

/// Selects a graph implementation at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphVariant {
    /// [`CoarseGraph`].
    Coarse,
    /// [`LazyGraph`].
    Lazy,
    /// [`NaiveGraph`].
    Naive,
    /// [`VersionedGraph`].
    Versioned,
}

impl GraphVariant {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 4] = [Self::Coarse, Self::Lazy, Self::Naive, Self::Versioned];

    /// Lowercase name used in configuration files and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Coarse => "coarse",
            Self::Lazy => "lazy",
            Self::Naive => "naive",
            Self::Versioned => "versioned",
        }
    }

    /// Builds an empty graph of this variant.
    #[must_use]
    pub fn build(self, config: &GraphConfig) -> Box<dyn Graph> {
        match self {
            Self::Coarse => Box::new(CoarseGraph::new()),
            Self::Lazy => Box::new(LazyGraph::new()),
            Self::Naive => Box::new(NaiveGraph::new()),
            Self::Versioned => Box::new(VersionedGraph::from_config(config)),
        }
    }
}

impl fmt::Display for GraphVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GraphVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownName {
                kind: "graph variant",
                value: s.to_string(),
            })
    }
}
