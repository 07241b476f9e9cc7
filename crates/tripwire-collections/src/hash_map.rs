//! Hash-table-backed map.

use std::collections::HashMap;
use std::hash::Hash;

use tripwire_core::breaker::BreakerRef;
use tripwire_core::config::{validate_load_factor, Sizing, SizingConfig, DEFAULT_LOAD_FACTOR};
use tripwire_core::size::SizeOf;

use crate::error::Result;
use crate::growth::hash::DEFAULT_INITIAL_CAPACITY;
use crate::growth::HashGrowth;
use crate::map::BreakingMap;

const LABEL: &str = "<BreakingHashMap>";

pub type BreakingHashMap<K, V> = BreakingMap<HashMap<K, V>, HashGrowth>;

/// Capacity hint for a table that must hold `len` entries without resizing.
pub(crate) fn hint_for_len(len: usize, load_factor: f32) -> usize {
    ((len as f32 / load_factor) as usize + 1).max(DEFAULT_INITIAL_CAPACITY as usize)
}

impl<K, V> BreakingMap<HashMap<K, V>, HashGrowth>
where
    K: Eq + Hash + SizeOf,
    V: SizeOf,
{
    pub fn new(breaker: BreakerRef) -> Result<Self> {
        Self::with_store(HashMap::new(), HashGrowth::new(), breaker, LABEL)
    }

    pub fn with_capacity(breaker: BreakerRef, initial_capacity: usize) -> Result<Self> {
        Self::with_capacity_and_load_factor(breaker, initial_capacity, DEFAULT_LOAD_FACTOR)
    }

    /// Fails with [`Error::Config`](crate::Error::Config) on a NaN, infinite,
    /// or non-positive load factor.
    pub fn with_capacity_and_load_factor(
        breaker: BreakerRef,
        initial_capacity: usize,
        load_factor: f32,
    ) -> Result<Self> {
        let sizing = Sizing {
            initial_capacity: Some(initial_capacity),
            load_factor: validate_load_factor(load_factor)?,
        };
        Self::with_store(HashMap::new(), HashGrowth::with_sizing(&sizing), breaker, LABEL)
    }

    /// Build from unvalidated hints, e.g. a deserialized [`SizingConfig`].
    pub fn with_sizing(breaker: BreakerRef, cfg: &SizingConfig) -> Result<Self> {
        let sizing = cfg.validate()?;
        Self::with_store(HashMap::new(), HashGrowth::with_sizing(&sizing), breaker, LABEL)
    }

    /// Populate from `source`, pre-sized so no doubling is needed.
    pub fn from_source<I>(breaker: BreakerRef, source: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let store: HashMap<K, V> = source.into_iter().collect();
        let sizing = Sizing {
            initial_capacity: Some(hint_for_len(store.len(), DEFAULT_LOAD_FACTOR)),
            load_factor: DEFAULT_LOAD_FACTOR,
        };
        Self::with_store(store, HashGrowth::with_sizing(&sizing), breaker, LABEL)
    }

    /// Live-entry ceiling before the modeled table doubles.
    pub fn threshold(&self) -> u64 {
        self.growth().threshold()
    }
}
