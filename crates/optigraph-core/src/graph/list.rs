//! Sorted singly linked lists with per-node locks.
//!
//! Both the graph-wide vertex list and every per-vertex adjacency list are a
//! [`SortedList`]: strictly ascending keys between two permanent sentinels
//! holding [`HEAD_BOUND`] and [`TAIL_BOUND`]. A node's `next` slot is the only
//! owning reference to its successor, so physically unlinking a node drops
//! the list's ownership of it; readers that already hold an `Arc` keep it
//! alive until they let go.
//!
//! Reads never lock. Structural changes go through [`SortedList::locate`],
//! which returns a [`LockedPair`] holding both node locks until it is dropped.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex};

use super::stats::LockStats;
use super::{Version, VertexKey};

/// Ordering key stored in every node. Wider than [`VertexKey`] so the
/// sentinels can never collide with a real key.
pub(crate) type Bound = i64;

/// Key of the head sentinel.
pub(crate) const HEAD_BOUND: Bound = i64::MIN;
/// Key of the tail sentinel.
pub(crate) const TAIL_BOUND: Bound = i64::MAX;

/// Widens a vertex key into the list ordering space.
#[inline]
pub(crate) fn bound(key: VertexKey) -> Bound {
    Bound::from(key)
}

type NodeGuard = ArcMutexGuard<RawMutex, ()>;

/// A list node: an immutable key and creation stamp, an atomically updated
/// deletion state, and an owning link to the next node.
pub(crate) struct Node<P> {
    key: Bound,
    created: Version,
    marked: AtomicBool,
    unlinked: AtomicBool,
    deleted_at: AtomicU64,
    next: ArcSwapOption<Node<P>>,
    lock: Arc<Mutex<()>>,
    payload: P,
}

impl<P> Node<P> {
    pub(crate) fn new(key: Bound, created: Version, payload: P) -> Self {
        Self {
            key,
            created,
            marked: AtomicBool::new(false),
            unlinked: AtomicBool::new(false),
            deleted_at: AtomicU64::new(0),
            next: ArcSwapOption::empty(),
            lock: Arc::new(Mutex::new(())),
            payload,
        }
    }

    /// Ordering key, sentinels included.
    #[inline]
    pub(crate) fn bound(&self) -> Bound {
        self.key
    }

    /// The vertex key this node stands for.
    #[inline]
    // Reason: real nodes are only ever built from a VertexKey, and callers
    // never ask a sentinel for its key.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn key(&self) -> VertexKey {
        self.key as VertexKey
    }

    #[inline]
    pub(crate) fn created(&self) -> Version {
        self.created
    }

    #[inline]
    pub(crate) fn is_marked(&self) -> bool {
        self.marked.load(Ordering::Acquire)
    }

    /// Deletion stamp; meaningful only once [`Self::is_marked`] is true.
    #[inline]
    pub(crate) fn deleted_at(&self) -> Version {
        self.deleted_at.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn is_unlinked(&self) -> bool {
        self.unlinked.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn payload(&self) -> &P {
        &self.payload
    }

    /// True if this node carries `key` and has not been logically deleted.
    #[inline]
    pub(crate) fn is_live(&self, key: Bound) -> bool {
        self.key == key && !self.is_marked()
    }

    /// Snapshot visibility: created before `version`, and not deleted before it.
    #[inline]
    pub(crate) fn visible_at(&self, version: Version) -> bool {
        self.created() < version && !(self.is_marked() && self.deleted_at() < version)
    }

    fn is_tail(&self) -> bool {
        self.key == TAIL_BOUND
    }

    /// Follows the owning link.
    ///
    /// Only the tail sentinel has no successor, and every walk stops at the
    /// first node whose key reaches the target, which the tail always does.
    fn successor(&self) -> Arc<Self> {
        match self.next.load_full() {
            Some(next) => next,
            None => unreachable!("walked past the tail sentinel"),
        }
    }

    /// First node at or after `self` whose key is `>= key`, found without locking.
    ///
    /// Works from a node that has since been unlinked too: its stale link
    /// still leads back into the list.
    pub(crate) fn seek(self: &Arc<Self>, key: Bound) -> Arc<Self> {
        let mut curr = Arc::clone(self);
        while curr.key < key {
            curr = curr.successor();
        }
        curr
    }

    fn points_to(&self, other: &Arc<Self>) -> bool {
        match &*self.next.load() {
            Some(next) => Arc::ptr_eq(next, other),
            None => false,
        }
    }

    pub(crate) fn lock(&self) -> NodeGuard {
        self.lock.lock_arc()
    }

    pub(crate) fn try_lock(&self) -> Option<NodeGuard> {
        self.lock.try_lock_arc()
    }
}

impl<P> Drop for Node<P> {
    /// Detaches the owned chain one node at a time; the default drop would
    /// recurse once per node through the owning links.
    fn drop(&mut self) {
        let mut next = self.next.swap(None);
        while let Some(node) = next {
            next = match Arc::try_unwrap(node) {
                Ok(node) => node.next.swap(None),
                // Another owner keeps the rest of the chain.
                Err(_) => None,
            };
        }
    }
}

/// A key-sorted list bounded by two sentinels.
pub(crate) struct SortedList<P> {
    head: Arc<Node<P>>,
}

impl<P: Default> SortedList<P> {
    /// Creates an empty list: `head -> tail`.
    pub(crate) fn new() -> Self {
        let tail = Arc::new(Node::new(TAIL_BOUND, 0, P::default()));
        let head = Node::new(HEAD_BOUND, 0, P::default());
        head.next.store(Some(tail));
        Self {
            head: Arc::new(head),
        }
    }
}

impl<P: Default> Default for SortedList<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> SortedList<P> {
    /// Unlocked walk to the first node with key `>= key` and its predecessor.
    ///
    /// When a logically deleted node and a fresh one share a key, the fresh
    /// one precedes it, so this window always lands on the live node if any.
    pub(crate) fn search(&self, key: Bound) -> (Arc<Node<P>>, Arc<Node<P>>) {
        let mut pred = Arc::clone(&self.head);
        let mut curr = pred.successor();
        while curr.key < key {
            pred = curr;
            curr = pred.successor();
        }
        (pred, curr)
    }

    /// First node with key `>= key`, found without locking.
    pub(crate) fn find(&self, key: Bound) -> Arc<Node<P>> {
        self.search(key).1
    }

    /// Lock-free membership: the first node with the key exists and is unmarked.
    pub(crate) fn contains(&self, key: Bound) -> bool {
        self.find(key).is_live(key)
    }

    /// First node carrying `key` that satisfies `accept`, scanning past the
    /// live node into any stale deleted ones that share the key.
    pub(crate) fn find_where(
        &self,
        key: Bound,
        accept: impl Fn(&Node<P>) -> bool,
    ) -> Option<Arc<Node<P>>> {
        let mut curr = self.find(key);
        while curr.key == key {
            if accept(&curr) {
                return Some(curr);
            }
            curr = curr.successor();
        }
        None
    }

    /// Lock-coupling locator.
    ///
    /// Walks without locks, locks predecessor then candidate, and validates
    /// that nothing slipped in between. Retries without bound until the pair
    /// validates; under sustained contention on one position this can spin.
    pub(crate) fn locate(&self, key: Bound, stats: &LockStats) -> LockedPair<P> {
        loop {
            let (pred, curr) = self.search(key);
            let pair = LockedPair::acquire(pred, curr, stats);
            if pair.validate() {
                return pair;
            }
            stats.record_retry();
            tracing::trace!(key, "locate validation failed, retrying");
        }
    }

    /// Lock-free iterator over every non-sentinel node, marked ones included.
    pub(crate) fn nodes(&self) -> Nodes<P> {
        Nodes {
            next: Some(self.head.successor()),
        }
    }

    /// Physically unlinks every marked node that `admit` accepts.
    ///
    /// Each unlink locks the pair and re-validates it. `on_survivor` is called
    /// for every node left in place. Returns the number of nodes unlinked.
    pub(crate) fn sweep(
        &self,
        admit: impl Fn(&Node<P>) -> bool,
        stats: &LockStats,
        mut on_survivor: impl FnMut(&Node<P>),
    ) -> usize {
        let mut unlinked = 0;
        let mut pred = Arc::clone(&self.head);
        let mut curr = pred.successor();
        while !curr.is_tail() {
            if curr.is_marked() && admit(&curr) {
                let pair = LockedPair::acquire(Arc::clone(&pred), Arc::clone(&curr), stats);
                if pair.validate() {
                    pair.unlink();
                    unlinked += 1;
                    drop(pair);
                    curr = pred.successor();
                    continue;
                }
            } else {
                on_survivor(&curr);
            }
            pred = curr;
            curr = pred.successor();
        }
        unlinked
    }
}

/// Iterator returned by [`SortedList::nodes`].
pub(crate) struct Nodes<P> {
    next: Option<Arc<Node<P>>>,
}

impl<P> Iterator for Nodes<P> {
    type Item = Arc<Node<P>>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next.take()?;
        if node.is_tail() {
            return None;
        }
        self.next = Some(node.successor());
        Some(node)
    }
}

/// A locked, validated `(predecessor, candidate)` window.
///
/// Both locks are held until the pair is dropped, so every exit path of a
/// mutation releases them.
pub(crate) struct LockedPair<P> {
    pred: Arc<Node<P>>,
    curr: Arc<Node<P>>,
    _pred_guard: NodeGuard,
    _curr_guard: NodeGuard,
}

impl<P> LockedPair<P> {
    /// Locks `pred` then `curr`, always in list order.
    fn acquire(pred: Arc<Node<P>>, curr: Arc<Node<P>>, stats: &LockStats) -> Self {
        stats.check_order(pred.key, curr.key);
        let pred_guard = pred.lock();
        let curr_guard = curr.lock();
        Self {
            pred,
            curr,
            _pred_guard: pred_guard,
            _curr_guard: curr_guard,
        }
    }

    /// The predecessor is still in the list and still links to the candidate.
    ///
    /// Marked-but-linked predecessors are valid: while snapshots are running a
    /// deleted node may legitimately stay in place.
    fn validate(&self) -> bool {
        !self.pred.is_unlinked() && self.pred.points_to(&self.curr)
    }

    pub(crate) fn curr(&self) -> &Arc<Node<P>> {
        &self.curr
    }

    /// Splices `node` in between the predecessor and the candidate.
    pub(crate) fn insert(&self, node: Node<P>) {
        node.next.store(Some(Arc::clone(&self.curr)));
        self.pred.next.store(Some(Arc::new(node)));
    }

    /// Logical deletion: stamp first, then publish the mark.
    pub(crate) fn mark(&self, version: Version) {
        self.curr.deleted_at.store(version, Ordering::Release);
        self.curr.marked.store(true, Ordering::Release);
    }

    /// Physical deletion: the predecessor skips the candidate.
    pub(crate) fn unlink(&self) {
        self.pred.next.store(self.curr.next.load_full());
        self.curr.unlinked.store(true, Ordering::Release);
    }
}
