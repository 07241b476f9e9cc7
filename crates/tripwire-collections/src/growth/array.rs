//! Dynamic-array growth model.

use std::mem;

use tripwire_core::size::SizeOf;

use super::GrowthPolicy;

/// Capacity taken on the first growth of an array with no size hint.
pub const DEFAULT_ARRAY_CAPACITY: u64 = 10;

/// Largest representable capacity.
pub const MAX_ARRAY_CAPACITY: u64 = i32::MAX as u64;

/// Soft ceiling kept a little below [`MAX_ARRAY_CAPACITY`]; 1.5x growth stops
/// here unless the array truly needs more.
pub const SOFT_MAX_ARRAY_CAPACITY: u64 = MAX_ARRAY_CAPACITY - 8;

/// Fixed bytes charged for the array allocation itself.
pub const ALLOCATION_HEADER_BYTES: u64 = 16;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrayGrowth {
    /// `None` until the first growth when constructed without a hint.
    capacity: Option<u64>,
    initial: Option<u64>,
    per_element: Option<u64>,
}

impl ArrayGrowth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an explicit capacity, clamped to [`MAX_ARRAY_CAPACITY`].
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = (capacity as u64).min(MAX_ARRAY_CAPACITY);
        Self {
            capacity: Some(capacity),
            initial: Some(capacity),
            per_element: None,
        }
    }

    /// One growth step toward `min_capacity`.
    fn grown(capacity: Option<u64>, min_capacity: u64) -> u64 {
        let old = match capacity {
            None => return DEFAULT_ARRAY_CAPACITY.max(min_capacity),
            Some(old) => old,
        };
        let new = old + (old >> 1);
        if new <= min_capacity {
            min_capacity.min(MAX_ARRAY_CAPACITY)
        } else if new <= SOFT_MAX_ARRAY_CAPACITY {
            new
        } else if min_capacity > SOFT_MAX_ARRAY_CAPACITY {
            MAX_ARRAY_CAPACITY
        } else {
            SOFT_MAX_ARRAY_CAPACITY
        }
    }
}

impl<T: SizeOf> GrowthPolicy<Vec<T>> for ArrayGrowth {
    fn resize_if_required(&mut self, len: usize) {
        let len = len as u64;
        while len > self.capacity.unwrap_or(0) {
            let next = Self::grown(self.capacity, len);
            let stuck = self.capacity == Some(next);
            self.capacity = Some(next);
            if stuck {
                break;
            }
        }
    }

    fn bytes_required(&mut self, store: &Vec<T>) -> u64 {
        if self.per_element.is_none() {
            if let Some(first) = store.first() {
                self.per_element = Some(first.deep_size());
            }
        }
        let slots = self
            .capacity
            .unwrap_or(0)
            .saturating_mul(self.per_element.unwrap_or(0));
        mem::size_of_val(store) as u64 + ALLOCATION_HEADER_BYTES + slots
    }

    fn capacity_estimate(&self) -> u64 {
        self.capacity.unwrap_or(0)
    }

    fn per_element_size(&self) -> Option<u64> {
        self.per_element
    }

    fn reset(&mut self) {
        self.capacity = self.initial;
    }

    fn shrink_to(&mut self, len: usize) {
        self.capacity = Some(len as u64);
    }
}
