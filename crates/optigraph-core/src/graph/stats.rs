//! Per-graph locking and reclamation counters.
//!
//! Always-on atomic counters for locator retries, lock-order violations,
//! snapshots and physical unlinks. All counters use relaxed ordering since
//! they are advisory and never synchronize with graph operations.
//!
//! # Lock order
//!
//! Every pair acquisition locks the predecessor before the candidate. Because
//! lists are key-sorted, that means the predecessor's ordering key never
//! exceeds the candidate's. [`LockStats::check_order`] verifies this on each
//! acquisition and records a violation instead of panicking.

use std::sync::atomic::{AtomicU64, Ordering};

use super::list::Bound;
use super::sweep::SweepReport;

/// Atomic counters owned by a single graph instance.
#[derive(Debug, Default)]
#[allow(clippy::struct_field_names)]
pub(crate) struct LockStats {
    /// Locator attempts whose validation failed and had to restart.
    locate_retries_total: AtomicU64,
    /// Pair acquisitions whose keys were out of list order.
    order_violations_total: AtomicU64,
    /// Snapshots registered by BFS readers.
    snapshots_total: AtomicU64,
    /// Sweeps that actually walked the structure.
    sweeps_total: AtomicU64,
    /// Vertex nodes physically unlinked (immediately or by a sweep).
    vertices_unlinked_total: AtomicU64,
    /// Edge nodes physically unlinked (immediately or by a sweep).
    edges_unlinked_total: AtomicU64,
}

impl LockStats {
    /// Creates a counter set with all values at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            locate_retries_total: AtomicU64::new(0),
            order_violations_total: AtomicU64::new(0),
            snapshots_total: AtomicU64::new(0),
            sweeps_total: AtomicU64::new(0),
            vertices_unlinked_total: AtomicU64::new(0),
            edges_unlinked_total: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_retry(&self) {
        self.locate_retries_total.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_snapshot(&self) {
        self.snapshots_total.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_vertex_unlink(&self) {
        self.vertices_unlinked_total.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_edge_unlink(&self) {
        self.edges_unlinked_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Folds a finished sweep into the totals.
    pub fn record_sweep(&self, report: SweepReport) {
        self.sweeps_total.fetch_add(1, Ordering::Relaxed);
        self.vertices_unlinked_total
            .fetch_add(report.vertices as u64, Ordering::Relaxed);
        self.edges_unlinked_total
            .fetch_add(report.edges as u64, Ordering::Relaxed);
    }

    /// Verifies that a pair is being locked in list order.
    ///
    /// A violation is recorded in the counters (always) and logged as a
    /// warning in debug builds.
    #[inline]
    pub fn check_order(&self, pred: Bound, curr: Bound) {
        if pred > curr {
            self.order_violations_total.fetch_add(1, Ordering::Relaxed);

            #[cfg(debug_assertions)]
            {
                tracing::warn!(
                    pred,
                    curr,
                    "lock-order violation: predecessor key exceeds candidate key"
                );
            }
        }
    }

    /// Returns a snapshot of all counters.
    #[must_use]
    pub fn snapshot(&self) -> LockStatsSnapshot {
        LockStatsSnapshot {
            locate_retries_total: self.locate_retries_total.load(Ordering::Relaxed),
            order_violations_total: self.order_violations_total.load(Ordering::Relaxed),
            snapshots_total: self.snapshots_total.load(Ordering::Relaxed),
            sweeps_total: self.sweeps_total.load(Ordering::Relaxed),
            vertices_unlinked_total: self.vertices_unlinked_total.load(Ordering::Relaxed),
            edges_unlinked_total: self.edges_unlinked_total.load(Ordering::Relaxed),
        }
    }
}

/// Immutable snapshot of counter values for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_field_names)]
pub struct LockStatsSnapshot {
    /// Locator attempts that failed validation and restarted.
    pub locate_retries_total: u64,
    /// Pair acquisitions observed out of list order (expected to stay 0).
    pub order_violations_total: u64,
    /// Snapshots registered by BFS readers.
    pub snapshots_total: u64,
    /// Sweeps that walked the structure.
    pub sweeps_total: u64,
    /// Vertex nodes physically unlinked.
    pub vertices_unlinked_total: u64,
    /// Edge nodes physically unlinked.
    pub edges_unlinked_total: u64,
}
