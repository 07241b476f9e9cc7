//! Array-backed list.

use tripwire_core::breaker::BreakerRef;
use tripwire_core::size::SizeOf;

use crate::collection::BreakingCollection;
use crate::error::Result;
use crate::growth::ArrayGrowth;

const LABEL: &str = "<BreakingList>";

/// A `Vec` whose modeled capacity is reported to a breaker.
pub type BreakingList<T> = BreakingCollection<Vec<T>, ArrayGrowth>;

impl<T: SizeOf + PartialEq> BreakingCollection<Vec<T>, ArrayGrowth> {
    pub fn new(breaker: BreakerRef) -> Result<Self> {
        Self::with_store(Vec::new(), ArrayGrowth::new(), breaker, LABEL)
    }

    /// Model an array pre-sized to `capacity` slots.
    pub fn with_capacity(breaker: BreakerRef, capacity: usize) -> Result<Self> {
        Self::with_store(Vec::new(), ArrayGrowth::with_capacity(capacity), breaker, LABEL)
    }

    /// Populate from `source`, sized exactly to it.
    ///
    /// The returned list already reserves for every element.
    pub fn from_source<I>(breaker: BreakerRef, source: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = source.into_iter().collect();
        let policy = ArrayGrowth::with_capacity(items.len());
        Self::with_store(items, policy, breaker, LABEL)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.tracked.store
    }

    pub fn get_at(&self, index: usize) -> Option<&T> {
        self.tracked.store.get(index)
    }

    /// Replace the element at `index`, returning the old one. Size is
    /// unchanged, so the breaker is not consulted.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn set_at(&mut self, index: usize, value: T) -> T {
        std::mem::replace(&mut self.tracked.store[index], value)
    }

    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_at(&mut self, index: usize, value: T) -> Result<()> {
        self.tracked.mutate(|s| s.insert(index, value))
    }

    /// Insert every value starting at `index`, keeping their order.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_all_at<I>(&mut self, index: usize, values: I) -> Result<bool>
    where
        I: IntoIterator<Item = T>,
    {
        self.tracked.mutate(|s| {
            let before = s.len();
            let tail = s.split_off(index);
            s.extend(values);
            s.extend(tail);
            s.len() != before
        })
    }

    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        self.tracked.mutate(|s| s.remove(index))
    }

    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.tracked.store.iter().position(|x| x == value)
    }

    pub fn last_index_of(&self, value: &T) -> Option<usize> {
        self.tracked.store.iter().rposition(|x| x == value)
    }

    /// Unused modeled slots.
    pub fn spare_capacity(&self) -> u64 {
        self.capacity_estimate()
            .saturating_sub(self.tracked.store.len() as u64)
    }
}
