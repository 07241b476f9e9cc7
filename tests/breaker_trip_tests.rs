//! Trip behaviour: a mutation that trips the breaker still takes effect and
//! stays accounted.

use std::mem;

use tripwire_collections::growth::array::ALLOCATION_HEADER_BYTES;
use tripwire_collections::{BreakingCollections, BreakingHashMap, BreakingList, Error};
use tripwire_core::CircuitBreaker;
use tripwire_mem::MemoryBreaker;

fn list_bytes(capacity: u64) -> i64 {
    (mem::size_of::<Vec<u64>>() as u64 + ALLOCATION_HEADER_BYTES + capacity * 8) as i64
}

#[test]
fn test_trip_keeps_the_element_and_its_bytes() {
    // 120 bytes fit ten u64s; the step to fifteen needs 160.
    let breaker = MemoryBreaker::new("request", 150);
    let mut list = BreakingList::new(breaker.handle()).unwrap();

    for i in 1..=10u64 {
        list.add(i).unwrap();
    }
    assert_eq!(breaker.used_bytes(), list_bytes(10));
    assert_eq!(list_bytes(10), 120);

    let err = list.add(11).unwrap_err();
    assert!(err.is_limit_exceeded());
    assert_eq!(list.len(), 11);
    assert!(list.contains(&11));
    assert_eq!(breaker.used_bytes(), 160);
    assert_eq!(list.reserved_bytes(), 160);
    assert_eq!(breaker.trip_count(), 1);

    // Caller undoes the add; the model keeps its capacity
    list.remove(&11).unwrap();
    assert_eq!(list.len(), 10);
    assert_eq!(breaker.used_bytes(), 160);

    list.shrink_reservation_to_size().unwrap();
    assert_eq!(breaker.used_bytes(), 120);

    drop(list);
    assert_eq!(breaker.used_bytes(), 0);
}

#[test]
fn test_construction_trip_returns_everything() {
    let breaker = MemoryBreaker::new("tiny", 10);

    let err = BreakingList::<u64>::new(breaker.handle()).unwrap_err();
    assert!(matches!(err, Error::LimitExceeded(_)));
    assert_eq!(breaker.used_bytes(), 0);

    let err = BreakingList::from_source(breaker.handle(), 0..100u64).unwrap_err();
    assert!(err.is_limit_exceeded());
    assert_eq!(breaker.used_bytes(), 0);
    assert_eq!(breaker.trip_count(), 2);
}

#[test]
fn test_release_after_trip_does_not_recheck() {
    let breaker = MemoryBreaker::new("request", 150);
    let mut list = BreakingList::new(breaker.handle()).unwrap();
    list.add_all(0..10u64).unwrap();
    assert!(list.add(10).is_err());

    // Already over the limit; clearing must still succeed
    list.clear();
    assert_eq!(breaker.used_bytes(), 0);
    list.add(1).unwrap();
}

#[test]
fn test_shrink_reports_a_breaker_still_over_limit() {
    let breaker = MemoryBreaker::new("request", 200);
    let mut list = BreakingList::new(breaker.handle()).unwrap();
    for i in 0..11u64 {
        list.add(i).unwrap();
    }
    list.remove_if(|x| *x > 0).unwrap();
    assert_eq!(breaker.used_bytes(), list_bytes(15));

    // Another holder pushes the shared total over the limit
    breaker.reserve_unchecked(300);

    let err = list.shrink_reservation_to_size().unwrap_err();
    assert!(err.is_limit_exceeded());
    // Lowered even though the total is still over the limit
    assert_eq!(list.capacity_estimate(), 1);
    assert_eq!(list.reserved_bytes(), list_bytes(1));
    assert_eq!(breaker.used_bytes(), list_bytes(1) + 300);
}

#[test]
fn test_one_breaker_trips_for_everyone() {
    let breaker = MemoryBreaker::new("shared", 2_000);
    let collections = BreakingCollections::new(breaker.handle());

    let mut big: BreakingHashMap<u64, u64> = collections.new_hash_map().unwrap();
    big.extend((0..40u64).map(|k| (k, k))).unwrap();
    let held = breaker.used_bytes();
    assert!(held > 1_000);

    // A small list is fine on its own but pushes the shared total over.
    let mut small = collections.new_list::<u64>().unwrap();
    let mut tripped = false;
    for i in 0..200u64 {
        if small.add(i).is_err() {
            tripped = true;
            break;
        }
    }
    assert!(tripped);
    assert!(breaker.used_bytes() > breaker.limit_bytes());

    drop(big);
    assert_eq!(breaker.used_bytes(), small.reserved_bytes());
    small.add(999).unwrap();
}
