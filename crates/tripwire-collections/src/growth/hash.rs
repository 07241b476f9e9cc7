//! Hash-table growth model.
//!
//! Tracks a power-of-two bucket count and the size threshold at which the
//! table doubles (`capacity * load_factor`). An initial capacity hint is
//! parked in `threshold` until the table is first allocated, on the first
//! insert.
//!
//! Bytes are estimated as `shallow + capacity * bucket + threshold * payload`:
//! every bucket holds an inline slot whether occupied or not, while at most
//! `threshold` live entries bring their owned heap along.

use std::collections::{HashMap, HashSet};
use std::hash::BuildHasher;
use std::mem;

use tripwire_core::config::{Sizing, DEFAULT_LOAD_FACTOR};
use tripwire_core::size::SizeOf;

use super::GrowthPolicy;

/// Bucket count of a table allocated without a hint.
pub const DEFAULT_INITIAL_CAPACITY: u64 = 1 << 4;

/// Largest bucket count; the table stops growing here.
pub const MAXIMUM_CAPACITY: u64 = 1 << 30;

/// Threshold once the table can no longer grow.
const UNBOUNDED_THRESHOLD: u64 = i32::MAX as u64;

/// Per-bucket control metadata kept beside each slot.
pub const CONTROL_BYTES: u64 = 1;

/// Round `cap` up to a power of two in `1..=MAXIMUM_CAPACITY`.
pub fn table_size_for(cap: u64) -> u64 {
    if cap <= 1 {
        1
    } else if cap >= MAXIMUM_CAPACITY {
        MAXIMUM_CAPACITY
    } else {
        cap.next_power_of_two()
    }
}

/// Bucket and payload sizes of one `(key, value)` entry.
fn entry_sizes<K: SizeOf, V: SizeOf>(key: &K, value: &V) -> (u64, u64) {
    let bucket = mem::size_of::<(K, V)>() as u64 + CONTROL_BYTES;
    let payload = key.heap_size() + value.heap_size();
    (bucket, payload)
}

#[derive(Debug, Clone, PartialEq)]
pub struct HashGrowth {
    capacity: u64,
    threshold: u64,
    load_factor: f32,
    initial_threshold: u64,
    /// `(bucket, payload)` measured from a live entry.
    entry: Option<(u64, u64)>,
}

impl Default for HashGrowth {
    fn default() -> Self {
        Self::new()
    }
}

impl HashGrowth {
    pub fn new() -> Self {
        Self {
            capacity: 0,
            threshold: 0,
            load_factor: DEFAULT_LOAD_FACTOR,
            initial_threshold: 0,
            entry: None,
        }
    }

    /// Start from validated sizing. Capacity hints above
    /// [`MAXIMUM_CAPACITY`] are clamped.
    pub fn with_sizing(sizing: &Sizing) -> Self {
        let initial_threshold = sizing
            .initial_capacity
            .map(|c| table_size_for((c as u64).min(MAXIMUM_CAPACITY)))
            .unwrap_or(0);
        Self {
            capacity: 0,
            threshold: initial_threshold,
            load_factor: sizing.load_factor,
            initial_threshold,
            entry: None,
        }
    }

    /// Live-entry ceiling before the next doubling.
    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn load_factor(&self) -> f32 {
        self.load_factor
    }

    fn threshold_for(&self, capacity: u64) -> u64 {
        let ft = capacity as f32 * self.load_factor;
        if capacity < MAXIMUM_CAPACITY && ft < MAXIMUM_CAPACITY as f32 {
            ft as u64
        } else {
            UNBOUNDED_THRESHOLD
        }
    }

    /// One allocation or doubling step.
    fn resize(&mut self) {
        let (new_capacity, mut new_threshold);
        if self.capacity > 0 {
            if self.capacity >= MAXIMUM_CAPACITY {
                self.threshold = UNBOUNDED_THRESHOLD;
                return;
            }
            new_capacity = self.capacity << 1;
            new_threshold = if new_capacity < MAXIMUM_CAPACITY
                && self.capacity >= DEFAULT_INITIAL_CAPACITY
            {
                self.threshold << 1
            } else {
                0
            };
        } else if self.threshold > 0 {
            // Hinted capacity was parked in the threshold.
            new_capacity = self.threshold;
            new_threshold = 0;
        } else {
            new_capacity = DEFAULT_INITIAL_CAPACITY;
            new_threshold = 0;
        }
        if new_threshold == 0 {
            new_threshold = self.threshold_for(new_capacity);
        }
        self.capacity = new_capacity;
        self.threshold = new_threshold;
    }

    fn grow_to(&mut self, len: u64) {
        while (self.capacity == 0 && len > 0) || len > self.threshold {
            if self.threshold >= UNBOUNDED_THRESHOLD {
                break;
            }
            self.resize();
        }
    }

    fn estimate(&self, shallow: u64) -> u64 {
        // Until the table is allocated the threshold only holds the parked hint.
        if self.capacity == 0 {
            return shallow;
        }
        let (bucket, payload) = self.entry.unwrap_or((0, 0));
        shallow
            .saturating_add(self.capacity.saturating_mul(bucket))
            .saturating_add(self.threshold.saturating_mul(payload))
    }
}

impl<K: SizeOf, V: SizeOf, H: BuildHasher> GrowthPolicy<HashMap<K, V, H>> for HashGrowth {
    fn resize_if_required(&mut self, len: usize) {
        self.grow_to(len as u64);
    }

    fn bytes_required(&mut self, store: &HashMap<K, V, H>) -> u64 {
        if self.entry.is_none() {
            if let Some((k, v)) = store.iter().next() {
                self.entry = Some(entry_sizes(k, v));
            }
        }
        self.estimate(mem::size_of_val(store) as u64)
    }

    fn capacity_estimate(&self) -> u64 {
        self.capacity
    }

    fn per_element_size(&self) -> Option<u64> {
        self.entry.map(|(bucket, payload)| bucket + payload)
    }

    fn reset(&mut self) {
        self.capacity = 0;
        self.threshold = self.initial_threshold;
    }
}

/// A set is a table whose entries carry no value: each element is measured
/// as a key paired with `()`.
impl<T: SizeOf, H: BuildHasher> GrowthPolicy<HashSet<T, H>> for HashGrowth {
    fn resize_if_required(&mut self, len: usize) {
        self.grow_to(len as u64);
    }

    fn bytes_required(&mut self, store: &HashSet<T, H>) -> u64 {
        if self.entry.is_none() {
            if let Some(element) = store.iter().next() {
                self.entry = Some(entry_sizes(element, &()));
            }
        }
        self.estimate(mem::size_of_val(store) as u64)
    }

    fn capacity_estimate(&self) -> u64 {
        self.capacity
    }

    fn per_element_size(&self) -> Option<u64> {
        self.entry.map(|(bucket, payload)| bucket + payload)
    }

    fn reset(&mut self) {
        self.capacity = 0;
        self.threshold = self.initial_threshold;
    }
}
