//! # optigraph core
//!
//! Concurrent in-memory directed graphs built from sorted linked lists with
//! one lock per node.
//!
//! The main type, [`VersionedGraph`], combines three techniques:
//!
//! - **Optimistic lock coupling**: mutations walk the lists without locks,
//!   then lock and validate only the two nodes around the change.
//! - **Versioned logical deletion**: removals stamp nodes with the current
//!   value of a version clock instead of unlinking them right away.
//! - **Snapshot BFS**: a traversal advances the clock and ignores every node
//!   created at or after its version, so it sees a consistent graph without
//!   taking any lock.
//!
//! Deleted nodes are physically reclaimed by a sweeper once no traversal
//! can still need them. [`ReclamationPolicy`] selects when that happens.
//!
//! Three baselines share the [`Graph`] trait for comparison: [`LazyGraph`]
//! (same lists, immediate unlinking, no BFS), [`NaiveGraph`] (BFS that locks
//! every node it visits) and [`CoarseGraph`] (a single mutex).
//!
//! ## Quick Start
//!
//! ```rust
//! use optigraph_core::{Graph, ReclamationPolicy, Traversable, VersionedGraph};
//!
//! let graph = VersionedGraph::with_policy(ReclamationPolicy::Concurrent);
//! for key in 1..=4 {
//!     graph.add_vertex(key);
//! }
//! graph.add_edge(1, 2);
//! graph.add_edge(2, 3);
//! graph.add_edge(3, 4);
//!
//! // A snapshot ignores everything added after it started.
//! let snapshot = graph.snapshot();
//! graph.add_vertex(5);
//! graph.add_edge(4, 5);
//! let distances = snapshot.bfs(1).expect("vertex 1 is visible");
//! assert_eq!(distances.len(), 4);
//! drop(snapshot);
//!
//! assert_eq!(graph.bfs(1).map(|d| d.len()), Some(5));
//! ```

#![warn(missing_docs)]
// Clippy lints configured in workspace Cargo.toml [workspace.lints.clippy]
#![cfg_attr(
    test,
    allow(
        clippy::doc_markdown,
        clippy::uninlined_format_args,
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::manual_assert
    )
)]

pub mod config;
pub mod error;
pub mod graph;


pub use config::GraphConfig;
pub use error::{Error, Result};
pub use graph::{
    CoarseGraph, Distances, Graph, GraphVariant, LazyGraph, LockStatsSnapshot, NaiveGraph,
    ReclamationPolicy, SnapshotGuard, SweepReport, Traversable, Version, VersionedGraph,
    VertexKey,
};
