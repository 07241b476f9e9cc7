//! Balanced-tree growth model.
//!
//! Trees allocate per node and have no capacity. The policy keeps an
//! imaginary capacity that grows 1.5x at a time so the breaker is consulted
//! once per step rather than once per insert.

use std::collections::{BTreeMap, BTreeSet};
use std::mem;

use tripwire_core::size::{size_with_one_reference, SizeOf};

use super::GrowthPolicy;

/// First imaginary capacity of a tree with entries.
pub const MIN_IMAGINARY_CAPACITY: u64 = 10;

/// Bytes of one tree node holding `key` and `value`. Set elements are
/// measured as a key paired with `()`, the same rule hash sets use.
fn entry_size<K: SizeOf, V: SizeOf>(key: &K, value: &V) -> u64 {
    size_with_one_reference(key) + value.deep_size()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeGrowth {
    imaginary_capacity: u64,
    per_entry: Option<u64>,
}

impl TreeGrowth {
    pub fn new() -> Self {
        Self::default()
    }

    fn grow_to(&mut self, len: u64) {
        while len > self.imaginary_capacity {
            if self.imaginary_capacity == 0 {
                self.imaginary_capacity = MIN_IMAGINARY_CAPACITY.max(len);
            } else {
                self.imaginary_capacity += self.imaginary_capacity >> 1;
            }
        }
    }

    fn estimate(&self, shallow: u64) -> u64 {
        shallow.saturating_add(
            self.imaginary_capacity
                .saturating_mul(self.per_entry.unwrap_or(0)),
        )
    }
}

impl<K: SizeOf, V: SizeOf> GrowthPolicy<BTreeMap<K, V>> for TreeGrowth {
    fn resize_if_required(&mut self, len: usize) {
        self.grow_to(len as u64);
    }

    fn bytes_required(&mut self, store: &BTreeMap<K, V>) -> u64 {
        if self.per_entry.is_none() {
            if let Some((k, v)) = store.iter().next() {
                self.per_entry = Some(entry_size(k, v));
            }
        }
        self.estimate(mem::size_of_val(store) as u64)
    }

    fn capacity_estimate(&self) -> u64 {
        self.imaginary_capacity
    }

    fn per_element_size(&self) -> Option<u64> {
        self.per_entry
    }

    fn reset(&mut self) {
        self.imaginary_capacity = 0;
    }
}

impl<T: SizeOf> GrowthPolicy<BTreeSet<T>> for TreeGrowth {
    fn resize_if_required(&mut self, len: usize) {
        self.grow_to(len as u64);
    }

    fn bytes_required(&mut self, store: &BTreeSet<T>) -> u64 {
        if self.per_entry.is_none() {
            if let Some(element) = store.iter().next() {
                self.per_entry = Some(entry_size(element, &()));
            }
        }
        self.estimate(mem::size_of_val(store) as u64)
    }

    fn capacity_estimate(&self) -> u64 {
        self.imaginary_capacity
    }

    fn per_element_size(&self) -> Option<u64> {
        self.per_entry
    }

    fn reset(&mut self) {
        self.imaginary_capacity = 0;
    }
}
