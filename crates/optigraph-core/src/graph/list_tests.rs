//! Tests for the sorted list, its locator and the locked pair.

use std::sync::Arc;

use super::list::{bound, Node, SortedList, HEAD_BOUND, TAIL_BOUND};
use super::stats::LockStats;
use super::{Version, VertexKey};

fn insert(list: &SortedList<()>, key: VertexKey, created: Version, stats: &LockStats) -> bool {
    let pair = list.locate(bound(key), stats);
    if pair.curr().is_live(bound(key)) {
        return false;
    }
    pair.insert(Node::new(bound(key), created, ()));
    true
}

fn mark(list: &SortedList<()>, key: VertexKey, version: Version, stats: &LockStats) {
    let pair = list.locate(bound(key), stats);
    assert!(pair.curr().is_live(bound(key)), "{key} must be live to mark");
    pair.mark(version);
}

fn keys(list: &SortedList<()>) -> Vec<VertexKey> {
    list.nodes().map(|node| node.key()).collect()
}

// ── Structure ──────────────────────────────────────────────────────

#[test]
fn test_new_list_only_has_sentinels() {
    let list = SortedList::<()>::new();
    assert!(keys(&list).is_empty());

    let (pred, curr) = list.search(bound(0));
    assert_eq!(pred.bound(), HEAD_BOUND);
    assert_eq!(curr.bound(), TAIL_BOUND);
}

#[test]
fn test_sentinels_outrank_extreme_keys() {
    let stats = LockStats::new();
    let list = SortedList::<()>::new();
    assert!(insert(&list, VertexKey::MAX, 0, &stats));
    assert!(insert(&list, VertexKey::MIN, 0, &stats));
    assert_eq!(keys(&list), vec![VertexKey::MIN, VertexKey::MAX]);
}

#[test]
fn test_insert_keeps_keys_sorted() {
    let stats = LockStats::new();
    let list = SortedList::<()>::new();
    for key in [5, 1, 9, 3, 7, -2] {
        assert!(insert(&list, key, 0, &stats));
    }
    assert_eq!(keys(&list), vec![-2, 1, 3, 5, 7, 9]);
}

#[test]
fn test_duplicate_live_key_is_rejected() {
    let stats = LockStats::new();
    let list = SortedList::<()>::new();
    assert!(insert(&list, 4, 0, &stats));
    assert!(!insert(&list, 4, 0, &stats));
    assert_eq!(keys(&list), vec![4]);
}

#[test]
fn test_contains_ignores_marked_nodes() {
    let stats = LockStats::new();
    let list = SortedList::<()>::new();
    insert(&list, 2, 0, &stats);
    assert!(list.contains(bound(2)));
    assert!(!list.contains(bound(3)));

    mark(&list, 2, 0, &stats);
    assert!(!list.contains(bound(2)));
    // Still physically linked.
    assert_eq!(keys(&list), vec![2]);
}

#[test]
fn test_mark_publishes_deletion_stamp() {
    let stats = LockStats::new();
    let list = SortedList::<()>::new();
    insert(&list, 8, 1, &stats);
    mark(&list, 8, 6, &stats);

    let node = list.find(bound(8));
    assert!(node.is_marked());
    assert_eq!(node.deleted_at(), 6);
    assert_eq!(node.created(), 1);
}

#[test]
fn test_reinsert_after_mark_goes_in_front_of_stale_node() {
    let stats = LockStats::new();
    let list = SortedList::<()>::new();
    insert(&list, 3, 0, &stats);
    mark(&list, 3, 1, &stats);
    assert!(insert(&list, 3, 2, &stats));

    let nodes: Vec<_> = list.nodes().collect();
    assert_eq!(nodes.len(), 2);
    assert!(!nodes[0].is_marked());
    assert_eq!(nodes[0].created(), 2);
    assert!(nodes[1].is_marked());
    assert!(list.contains(bound(3)));
}

#[test]
fn test_find_where_reaches_stale_duplicate() {
    let stats = LockStats::new();
    let list = SortedList::<()>::new();
    insert(&list, 3, 0, &stats);
    mark(&list, 3, 5, &stats);
    insert(&list, 3, 5, &stats);

    // At version 5 the fresh node is too new and the stale one still visible.
    let visible = list
        .find_where(bound(3), |node| node.visible_at(5))
        .expect("stale node is visible at 5");
    assert!(visible.is_marked());

    assert!(list.find_where(bound(3), |node| node.visible_at(6)).is_some());
    assert!(list.find_where(bound(4), |_| true).is_none());
}

// ── Visibility ─────────────────────────────────────────────────────

#[test]
fn test_visibility_window() {
    let stats = LockStats::new();
    let list = SortedList::<()>::new();
    insert(&list, 1, 2, &stats);
    let node = list.find(bound(1));

    assert!(!node.visible_at(2), "created at the snapshot version");
    assert!(node.visible_at(3));

    mark(&list, 1, 4, &stats);
    assert!(node.visible_at(4), "deleted while snapshot 4 was running");
    assert!(!node.visible_at(5), "deleted before snapshot 5");
}

// ── Locking ────────────────────────────────────────────────────────

#[test]
fn test_locked_pair_releases_on_drop() {
    let stats = LockStats::new();
    let list = SortedList::<()>::new();
    insert(&list, 1, 0, &stats);
    insert(&list, 2, 0, &stats);

    let (pred, curr) = list.search(bound(2));
    {
        let _pair = list.locate(bound(2), &stats);
        assert!(pred.try_lock().is_none());
        assert!(curr.try_lock().is_none());
    }
    assert!(pred.try_lock().is_some());
    assert!(curr.try_lock().is_some());
}

#[test]
fn test_locate_never_violates_order() {
    let stats = LockStats::new();
    let list = SortedList::<()>::new();
    for key in (0..50).rev() {
        insert(&list, key, 0, &stats);
    }
    assert_eq!(stats.snapshot().order_violations_total, 0);
}

#[test]
fn test_concurrent_inserts_stay_sorted_and_unique() {
    let stats = LockStats::new();
    let list = SortedList::<()>::new();

    std::thread::scope(|scope| {
        for offset in 0..4 {
            let (list, stats) = (&list, &stats);
            scope.spawn(move || {
                // Interleaved keys force contention on shared predecessors.
                for key in (offset..400).step_by(4) {
                    insert(list, key, 0, stats);
                    insert(list, key, 0, stats);
                }
            });
        }
    });

    let expected: Vec<VertexKey> = (0..400).collect();
    assert_eq!(keys(&list), expected);
    assert_eq!(stats.snapshot().order_violations_total, 0);
}

// ── Sweep ──────────────────────────────────────────────────────────

#[test]
fn test_sweep_unlinks_admitted_marked_nodes() {
    let stats = LockStats::new();
    let list = SortedList::<()>::new();
    for key in 1..=5 {
        insert(&list, key, 0, &stats);
    }
    mark(&list, 2, 1, &stats);
    mark(&list, 4, 2, &stats);

    let mut survivors = Vec::new();
    let unlinked = list.sweep(
        |node| node.deleted_at() == 1,
        &stats,
        |node| survivors.push(node.key()),
    );

    assert_eq!(unlinked, 1);
    assert_eq!(keys(&list), vec![1, 3, 4, 5]);
    assert_eq!(survivors, vec![1, 3, 4, 5]);
}

#[test]
fn test_sweep_removes_adjacent_marked_nodes() {
    let stats = LockStats::new();
    let list = SortedList::<()>::new();
    for key in 1..=4 {
        insert(&list, key, 0, &stats);
    }
    for key in 1..=4 {
        mark(&list, key, 0, &stats);
    }

    assert_eq!(list.sweep(|_| true, &stats, |_| {}), 4);
    assert!(keys(&list).is_empty());
}

#[test]
fn test_unlinked_node_is_flagged_and_seek_recovers() {
    let stats = LockStats::new();
    let list = SortedList::<()>::new();
    for key in [1, 2, 3] {
        insert(&list, key, 0, &stats);
    }
    let stale = list.find(bound(2));
    mark(&list, 2, 0, &stats);
    list.sweep(|_| true, &stats, |_| {});

    assert!(stale.is_unlinked());
    // The stale link still leads forward into the live list.
    let next = stale.seek(bound(3));
    assert_eq!(next.key(), 3);
    assert!(!next.is_unlinked());
}

#[test]
fn test_insert_after_unlinked_node_lands_in_live_list() {
    let stats = LockStats::new();
    let list = SortedList::<()>::new();
    for key in [1, 2] {
        insert(&list, key, 0, &stats);
    }
    let pred = list.find(bound(1));
    mark(&list, 1, 0, &stats);
    list.sweep(|_| true, &stats, |_| {});

    // An insert after the unlinked node must not land behind it.
    assert!(pred.is_unlinked());
    assert!(insert(&list, 1, 1, &stats));
    assert_eq!(keys(&list), vec![1, 2]);
    assert!(Arc::ptr_eq(&list.find(bound(2)), &pred.seek(bound(2))));
}

// ── Drop ───────────────────────────────────────────────────────────

#[test]
fn test_long_list_drops_on_small_stack() {
    let handle = std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(|| {
            let stats = LockStats::new();
            let list = SortedList::<()>::new();
            // Descending keys: every insert lands right after the head.
            for key in (0..300_000).rev() {
                assert!(insert(&list, key, 0, &stats));
            }
            let reader = list.find(bound(150_000));
            drop(list);
            // A held node keeps its own tail of the chain alive.
            assert_eq!(reader.key(), 150_000);
            assert_eq!(reader.seek(bound(150_001)).key(), 150_001);
        })
        .expect("spawn test thread");
    handle.join().expect("list dropped without overflowing");
}
