//! Version clock and reclamation gate.
//!
//! The clock is a monotonically increasing counter. Mutations stamp creations
//! and deletions with its current value; only a snapshot advances it, so a
//! node created after snapshot `v` began always carries a stamp `>= v` and a
//! node deleted while `v` is in flight carries exactly `v`.
//!
//! The gate counts in-flight readers. Physical unlinking is permitted only
//! while that count is zero; otherwise deleted nodes stay linked until a
//! sweep the gate allows.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};

use crate::error::Error;

use super::list::Node;
use super::Version;

/// When logically deleted nodes may be physically reclaimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReclamationPolicy {
    /// BFS calls are serialized by one mutex; an unfiltered sweep runs after
    /// each call.
    Exclusive,
    /// BFS calls run concurrently; the last reader out sweeps nodes deleted
    /// under its own snapshot version.
    ///
    /// Under unbroken BFS load deleted nodes accumulate, since the reader
    /// count may never reach zero.
    #[default]
    Concurrent,
}

impl ReclamationPolicy {
    /// Every policy, in declaration order.
    pub const ALL: [Self; 2] = [Self::Exclusive, Self::Concurrent];

    /// Lowercase name used in configuration files and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exclusive => "exclusive",
            Self::Concurrent => "concurrent",
        }
    }
}

impl fmt::Display for ReclamationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReclamationPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|policy| policy.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownName {
                kind: "reclamation policy",
                value: s.to_string(),
            })
    }
}

/// Which marked nodes a sweep may unlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SweepFilter {
    /// Every marked node.
    Any,
    /// Only nodes deleted under exactly this snapshot version.
    Exactly(Version),
    /// Nodes deleted at or before this version.
    UpTo(Version),
}

impl SweepFilter {
    pub(crate) fn admits<P>(self, node: &Node<P>) -> bool {
        match self {
            Self::Any => true,
            Self::Exactly(version) => node.deleted_at() == version,
            Self::UpTo(version) => node.deleted_at() <= version,
        }
    }
}

/// Process-wide monotonic counter, owned by one graph.
#[derive(Debug, Default)]
pub(crate) struct VersionClock {
    version: AtomicU64,
}

impl VersionClock {
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self {
            version: AtomicU64::new(0),
        }
    }

    /// Value used to stamp a creation or deletion.
    #[inline]
    pub(crate) fn current(&self) -> Version {
        self.version.load(Ordering::SeqCst)
    }

    /// Atomically increments the counter and returns the new value.
    #[inline]
    pub(crate) fn advance(&self) -> Version {
        self.version.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// A registered reader. Holds the exclusive-policy mutex, if any, until dropped.
pub(crate) struct ReaderTicket<'a> {
    version: Version,
    _serial: Option<MutexGuard<'a, ()>>,
}

impl ReaderTicket<'_> {
    pub(crate) fn version(&self) -> Version {
        self.version
    }
}

/// Reader registration and the cleanup-permitted predicate.
#[derive(Debug)]
pub(crate) struct ReclamationGate {
    policy: ReclamationPolicy,
    clock: VersionClock,
    readers: AtomicUsize,
    serial: Mutex<()>,
}

impl ReclamationGate {
    pub(crate) fn new(policy: ReclamationPolicy) -> Self {
        Self {
            policy,
            clock: VersionClock::new(),
            readers: AtomicUsize::new(0),
            serial: Mutex::new(()),
        }
    }

    pub(crate) fn policy(&self) -> ReclamationPolicy {
        self.policy
    }

    pub(crate) fn clock(&self) -> &VersionClock {
        &self.clock
    }

    /// Number of readers currently registered.
    pub(crate) fn readers(&self) -> usize {
        self.readers.load(Ordering::SeqCst)
    }

    /// Whether a node marked right now may be unlinked right away.
    ///
    /// Callers read their stamp before asking. A reader registers before it
    /// advances the clock, so a stamp equal to a live snapshot version always
    /// sees that reader here.
    pub(crate) fn cleanup_permitted(&self) -> bool {
        self.readers() == 0
    }

    /// Registers a reader and captures its snapshot version.
    pub(crate) fn enter(&self) -> ReaderTicket<'_> {
        let serial = match self.policy {
            ReclamationPolicy::Exclusive => Some(self.serial.lock()),
            ReclamationPolicy::Concurrent => None,
        };
        self.readers.fetch_add(1, Ordering::SeqCst);
        let version = self.clock.advance();
        tracing::trace!(version, policy = %self.policy, "reader registered");
        ReaderTicket {
            version,
            _serial: serial,
        }
    }

    /// Deregisters a reader and decides which sweep, if any, it must run.
    ///
    /// The ticket stays alive in the caller so the exclusive mutex is still
    /// held while that sweep runs.
    pub(crate) fn leave(&self, ticket: &ReaderTicket<'_>) -> Option<SweepFilter> {
        let remaining = self.readers.fetch_sub(1, Ordering::SeqCst) - 1;
        match self.policy {
            ReclamationPolicy::Exclusive => Some(SweepFilter::Any),
            ReclamationPolicy::Concurrent if remaining == 0 => {
                Some(SweepFilter::Exactly(ticket.version))
            }
            ReclamationPolicy::Concurrent => {
                tracing::debug!(
                    version = ticket.version,
                    remaining,
                    "readers still active, deferring sweep"
                );
                None
            }
        }
    }
}
