//! Close, clear and drop semantics.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

use tripwire_collections::{
    BreakingCollections, BreakingHashMap, BreakingHashSet, BreakingList, BreakingTreeMap,
    BreakingTreeSet,
};
use tripwire_core::{BreakerRef, CircuitBreaker, LimitExceeded};
use tripwire_mem::MemoryBreaker;

/// Breaker double that counts every call it receives.
#[derive(Default)]
struct RecordingBreaker {
    used: AtomicI64,
    checked: AtomicUsize,
    unchecked: AtomicUsize,
}

impl RecordingBreaker {
    fn calls(&self) -> usize {
        self.checked.load(Ordering::SeqCst) + self.unchecked.load(Ordering::SeqCst)
    }
}

impl CircuitBreaker for RecordingBreaker {
    fn reserve_checked(&self, delta_bytes: i64, _label: &str) -> Result<(), LimitExceeded> {
        self.checked.fetch_add(1, Ordering::SeqCst);
        self.used.fetch_add(delta_bytes, Ordering::SeqCst);
        Ok(())
    }

    fn reserve_unchecked(&self, delta_bytes: i64) {
        self.unchecked.fetch_add(1, Ordering::SeqCst);
        self.used.fetch_add(delta_bytes, Ordering::SeqCst);
    }

    fn used_bytes(&self) -> i64 {
        self.used.load(Ordering::SeqCst)
    }

    fn limit_bytes(&self) -> i64 {
        i64::MAX
    }
}

#[test]
fn test_second_close_is_a_no_op() {
    let recorder = Arc::new(RecordingBreaker::default());
    let handle: BreakerRef = recorder.clone();

    let mut list = BreakingList::new(handle).unwrap();
    list.add(1u64).unwrap();
    assert!(recorder.used_bytes() > 0);

    list.close();
    assert_eq!(recorder.used_bytes(), 0);
    let calls = recorder.calls();

    list.close();
    assert_eq!(recorder.calls(), calls);
    drop(list);
    assert_eq!(recorder.calls(), calls);
    assert_eq!(recorder.used_bytes(), 0);
}

#[test]
fn test_unchanged_size_skips_the_breaker() {
    let recorder = Arc::new(RecordingBreaker::default());
    let mut list = BreakingList::new(recorder.clone()).unwrap();
    list.add(1u64).unwrap();
    let calls = recorder.calls();

    // Within capacity: no delta, no call
    list.add(2).unwrap();
    list.remove(&2).unwrap();
    list.set_at(0, 5);
    assert_eq!(recorder.calls(), calls);
}

#[test]
fn test_every_kind_releases_on_drop() {
    let breaker = MemoryBreaker::unlimited();
    {
        let mut list = BreakingList::new(breaker.handle()).unwrap();
        list.add("a".to_string()).unwrap();
        let mut hash_map = BreakingHashMap::new(breaker.handle()).unwrap();
        hash_map.insert(1u32, vec![1u8, 2, 3]).unwrap();
        let mut tree_map = BreakingTreeMap::new(breaker.handle()).unwrap();
        tree_map.insert(1u32, 2u32).unwrap();
        let mut hash_set = BreakingHashSet::new(breaker.handle()).unwrap();
        hash_set.add(1i64).unwrap();
        let mut tree_set = BreakingTreeSet::new(breaker.handle()).unwrap();
        tree_set.add('x').unwrap();

        let total = list.reserved_bytes()
            + hash_map.reserved_bytes()
            + tree_map.reserved_bytes()
            + hash_set.reserved_bytes()
            + tree_set.reserved_bytes();
        assert_eq!(breaker.used_bytes(), total);
    }
    assert_eq!(breaker.used_bytes(), 0);
}

#[test]
fn test_clear_then_reuse() {
    let breaker = MemoryBreaker::unlimited();
    let mut map = BreakingHashMap::new(breaker.handle()).unwrap();
    map.extend((0..50u32).map(|k| (k, k))).unwrap();

    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.reserved_bytes(), 0);
    assert_eq!(breaker.used_bytes(), 0);

    map.clear();
    assert_eq!(breaker.used_bytes(), 0);

    map.insert(1, 1).unwrap();
    assert_eq!(map.capacity_estimate(), 16);
    assert_eq!(breaker.used_bytes(), map.reserved_bytes());
}

#[test]
fn test_panic_still_releases() {
    let breaker = MemoryBreaker::unlimited();

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut list = BreakingList::new(breaker.handle()).unwrap();
        list.add_all(0..100u64).unwrap();
        assert!(breaker.used_bytes() > 0);
        // Out of bounds
        list.set_at(1_000, 0);
    }));

    assert!(result.is_err());
    assert_eq!(breaker.used_bytes(), 0);
}

#[test]
fn test_factory_shares_one_breaker() {
    let breaker = MemoryBreaker::new("request", 1 << 20);
    let collections = BreakingCollections::new(breaker.handle());
    assert_eq!(collections.breaker().name(), "request");

    let mut list = collections.new_list_from(vec![1u64, 2, 3]).unwrap();
    let map: BreakingTreeMap<u32, u32> = collections.new_tree_map_from([(1, 1)]).unwrap();
    let set = collections.new_hash_set_from(["a", "b"]).unwrap();
    let sized: BreakingHashMap<u8, u8> = collections.new_hash_map_with_capacity(32, 0.5).unwrap();
    let tree_set: BreakingTreeSet<u8> = collections.new_tree_set().unwrap();

    list.add(4).unwrap();
    assert_eq!(sized.threshold(), 32);
    assert!(tree_set.is_empty());
    assert!(set.contains(&"a"));

    let total = list.reserved_bytes()
        + map.reserved_bytes()
        + set.reserved_bytes()
        + sized.reserved_bytes()
        + tree_set.reserved_bytes();
    assert_eq!(breaker.used_bytes(), total);
}

#[test]
fn test_equality_ignores_accounting() {
    let a_breaker = MemoryBreaker::unlimited();
    let b_breaker = MemoryBreaker::new("other", 1 << 20);

    let a = BreakingList::from_source(a_breaker.handle(), vec![1u64, 2, 3]).unwrap();
    let mut b = BreakingList::with_capacity(b_breaker.handle(), 50).unwrap();
    b.add_all(vec![1u64, 2, 3]).unwrap();
    assert_ne!(a.reserved_bytes(), b.reserved_bytes());
    assert_eq!(a, b);

    let x = BreakingTreeMap::from_source(a_breaker.handle(), [(1u8, 2u8)]).unwrap();
    let y = BreakingTreeMap::from_source(b_breaker.handle(), [(1u8, 2u8)]).unwrap();
    assert_eq!(x, y);
}
