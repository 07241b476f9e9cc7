//! Hash map and hash set accounting tests

use std::mem;

use tripwire_collections::growth::hash::CONTROL_BYTES;
use tripwire_collections::{BreakingHashMap, BreakingHashSet, Error};
use tripwire_core::config::SizingConfig;
use tripwire_core::CircuitBreaker;
use tripwire_mem::MemoryBreaker;

#[test]
fn test_thirteen_inserts_double_exactly_once() {
    let breaker = MemoryBreaker::unlimited();
    let mut map =
        BreakingHashMap::with_capacity_and_load_factor(breaker.handle(), 16, 0.75).unwrap();
    assert_eq!(map.capacity_estimate(), 0);
    assert_eq!(map.threshold(), 16);

    let mut doublings = Vec::new();
    let mut last = None;
    for i in 0..13u64 {
        map.insert(i, i * 10).unwrap();
        let cap = map.capacity_estimate();
        if let Some(prev) = last {
            if cap != prev {
                assert_eq!(cap, prev * 2);
                doublings.push(map.len());
            }
        }
        last = Some(cap);
    }

    assert_eq!(doublings, vec![13]);
    assert_eq!(map.capacity_estimate(), 32);
    assert_eq!(map.threshold(), 24);

    let bucket = mem::size_of::<(u64, u64)>() as u64 + CONTROL_BYTES;
    let expected = mem::size_of::<std::collections::HashMap<u64, u64>>() as u64 + 32 * bucket;
    assert_eq!(map.reserved_bytes(), expected as i64);
    assert_eq!(breaker.used_bytes(), expected as i64);
}

#[test]
fn test_first_insert_allocates_default_table() {
    let breaker = MemoryBreaker::unlimited();
    let mut map = BreakingHashMap::new(breaker.handle()).unwrap();
    map.insert(1u32, 1u32).unwrap();
    assert_eq!(map.capacity_estimate(), 16);
    assert_eq!(map.threshold(), 12);
}

#[test]
fn test_hinted_map_parks_capacity_until_first_insert() {
    let breaker = MemoryBreaker::unlimited();
    let mut map = BreakingHashMap::with_capacity(breaker.handle(), 100).unwrap();
    assert_eq!(map.capacity_estimate(), 0);
    assert_eq!(map.threshold(), 128);

    map.insert("a".to_string(), 1u64).unwrap();
    assert_eq!(map.capacity_estimate(), 128);
    assert_eq!(map.threshold(), 96);
}

#[test]
fn test_invalid_load_factor_is_rejected() {
    let breaker = MemoryBreaker::unlimited();

    for lf in [0.0f32, -1.0, f32::NAN, f32::INFINITY] {
        let err = BreakingHashMap::<u64, u64>::with_capacity_and_load_factor(
            breaker.handle(),
            16,
            lf,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)), "load factor {lf}");

        let err = BreakingHashSet::<u64>::with_capacity_and_load_factor(breaker.handle(), 16, lf)
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)), "load factor {lf}");
    }

    // Nothing was reserved for the rejected wrappers
    assert_eq!(breaker.used_bytes(), 0);
}

#[test]
fn test_negative_capacity_from_config_is_rejected() {
    let breaker = MemoryBreaker::unlimited();
    let cfg: SizingConfig =
        serde_json::from_str(r#"{"initial_capacity": -4, "load_factor": 0.75}"#).unwrap();

    let err = BreakingHashMap::<u64, u64>::with_sizing(breaker.handle(), &cfg).unwrap_err();
    assert!(matches!(err, Error::Config(_)));

    let cfg: SizingConfig = serde_json::from_str(r#"{"initial_capacity": 8}"#).unwrap();
    let map = BreakingHashMap::<u64, u64>::with_sizing(breaker.handle(), &cfg).unwrap();
    assert_eq!(map.threshold(), 8);
}

#[test]
fn test_map_operations_keep_ledger_in_step() {
    let breaker = MemoryBreaker::unlimited();
    let mut map = BreakingHashMap::new(breaker.handle()).unwrap();

    assert_eq!(map.insert(1u64, 100u64).unwrap(), None);
    assert_eq!(map.insert(1, 101).unwrap(), Some(100));
    map.extend((2..20u64).map(|k| (k, k))).unwrap();
    assert_eq!(map.len(), 19);
    assert_eq!(map.get(&1), Some(&101));
    assert!(map.contains_key(&19));
    assert!(map.contains_value(&101));
    assert!(!map.contains_value(&1));

    if let Some(v) = map.get_mut(&2) {
        *v = 222;
    }
    assert_eq!(map.get(&2), Some(&222));

    assert_eq!(map.remove(&3).unwrap(), Some(3));
    assert_eq!(map.remove(&3).unwrap(), None);

    map.retain(|k, _| k % 2 == 0).unwrap();
    assert!(map.keys().all(|k| k % 2 == 0));
    assert_eq!(map.values().count(), map.len());
    assert_eq!((&map).into_iter().count(), map.len());

    assert_eq!(breaker.used_bytes(), map.reserved_bytes());
}

#[test]
fn test_from_source_is_presized() {
    let breaker = MemoryBreaker::unlimited();
    let map = BreakingHashMap::from_source(breaker.handle(), (0..20u64).map(|k| (k, k))).unwrap();
    assert_eq!(map.len(), 20);
    assert_eq!(map.capacity_estimate(), 32);
    assert_eq!(map.threshold(), 24);
}

#[test]
fn test_set_from_source_collapses_duplicates() {
    let breaker = MemoryBreaker::unlimited();
    let items = (0..20u64).chain(0..5u64);
    let set = BreakingHashSet::from_source(breaker.handle(), items).unwrap();

    assert_eq!(set.len(), 20);
    assert_eq!(set.capacity_estimate(), 32);
    assert_eq!(breaker.used_bytes(), set.reserved_bytes());
}

#[test]
fn test_set_duplicate_add_returns_false() {
    let breaker = MemoryBreaker::unlimited();
    let mut set = BreakingHashSet::new(breaker.handle()).unwrap();

    assert!(set.add("x".to_string()).unwrap());
    let before = set.reserved_bytes();
    assert!(!set.add("x".to_string()).unwrap());
    assert_eq!(set.len(), 1);
    assert_eq!(set.reserved_bytes(), before);
}

#[test]
fn test_set_lookup_take_and_replace() {
    let breaker = MemoryBreaker::unlimited();
    let mut set = BreakingHashSet::from_source(breaker.handle(), vec![1u64, 2, 3]).unwrap();

    assert_eq!(set.get(&2), Some(&2));
    assert_eq!(set.get(&9), None);
    assert_eq!(set.take(&2).unwrap(), Some(2));
    assert_eq!(set.take(&2).unwrap(), None);
    assert_eq!(set.replace(3).unwrap(), Some(3));
    assert_eq!(set.replace(4).unwrap(), None);

    let other = BreakingHashSet::from_source(breaker.handle(), vec![1u64, 3, 4, 5]).unwrap();
    assert!(set.is_subset(&other));
    let apart = BreakingHashSet::from_source(breaker.handle(), vec![7u64]).unwrap();
    assert!(set.is_disjoint(&apart));
}

#[test]
fn test_hash_set_cannot_shrink() {
    let breaker = MemoryBreaker::unlimited();
    let mut set = BreakingHashSet::from_source(breaker.handle(), 0..10u64).unwrap();
    let before = set.reserved_bytes();

    let err = set.shrink_reservation_to_size().unwrap_err();
    assert!(matches!(err, Error::Unsupported(_)));
    assert_eq!(set.reserved_bytes(), before);
}

#[test]
fn test_cleared_hinted_map_reserves_only_shallow_bytes() {
    let breaker = MemoryBreaker::unlimited();
    let mut map = BreakingHashMap::with_capacity(breaker.handle(), 1 << 16).unwrap();
    map.insert("key".to_string(), String::with_capacity(64)).unwrap();
    assert!(map.reserved_bytes() > 0);

    map.clear();
    assert_eq!(breaker.used_bytes(), 0);

    // Reconciles on an empty map must not charge the parked hint
    assert_eq!(map.remove(&"missing".to_string()).unwrap(), None);
    map.retain(|_, _| true).unwrap();
    let shallow = mem::size_of::<std::collections::HashMap<String, String>>() as i64;
    assert_eq!(map.capacity_estimate(), 0);
    assert_eq!(map.reserved_bytes(), shallow);
    assert_eq!(breaker.used_bytes(), shallow);
}

#[test]
fn test_cleared_map_regrows_from_hint() {
    let breaker = MemoryBreaker::unlimited();
    let mut map = BreakingHashMap::with_capacity(breaker.handle(), 64).unwrap();
    map.extend((0..100u64).map(|k| (k, k))).unwrap();
    assert_eq!(map.capacity_estimate(), 256);

    map.clear();
    assert_eq!(breaker.used_bytes(), 0);
    assert_eq!(map.capacity_estimate(), 0);
    assert_eq!(map.threshold(), 64);

    map.insert(1, 1).unwrap();
    assert_eq!(map.capacity_estimate(), 64);
}
