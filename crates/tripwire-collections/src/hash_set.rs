//! Hash-table-backed set.

use std::collections::HashSet;
use std::hash::Hash;

use tripwire_core::breaker::BreakerRef;
use tripwire_core::config::{validate_load_factor, Sizing, SizingConfig, DEFAULT_LOAD_FACTOR};
use tripwire_core::size::SizeOf;

use crate::collection::BreakingCollection;
use crate::error::Result;
use crate::growth::HashGrowth;
use crate::hash_map::hint_for_len;

const LABEL: &str = "<BreakingHashSet>";

pub type BreakingHashSet<T> = BreakingCollection<HashSet<T>, HashGrowth>;

impl<T: Eq + Hash + SizeOf> BreakingCollection<HashSet<T>, HashGrowth> {
    pub fn new(breaker: BreakerRef) -> Result<Self> {
        Self::with_store(HashSet::new(), HashGrowth::new(), breaker, LABEL)
    }

    pub fn with_capacity(breaker: BreakerRef, initial_capacity: usize) -> Result<Self> {
        Self::with_capacity_and_load_factor(breaker, initial_capacity, DEFAULT_LOAD_FACTOR)
    }

    pub fn with_capacity_and_load_factor(
        breaker: BreakerRef,
        initial_capacity: usize,
        load_factor: f32,
    ) -> Result<Self> {
        let sizing = Sizing {
            initial_capacity: Some(initial_capacity),
            load_factor: validate_load_factor(load_factor)?,
        };
        Self::with_store(HashSet::new(), HashGrowth::with_sizing(&sizing), breaker, LABEL)
    }

    pub fn with_sizing(breaker: BreakerRef, cfg: &SizingConfig) -> Result<Self> {
        let sizing = cfg.validate()?;
        Self::with_store(HashSet::new(), HashGrowth::with_sizing(&sizing), breaker, LABEL)
    }

    /// Populate from `source`; duplicates collapse. Sized from the source's
    /// distinct count.
    pub fn from_source<I>(breaker: BreakerRef, source: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let store: HashSet<T> = source.into_iter().collect();
        let sizing = Sizing {
            initial_capacity: Some(hint_for_len(store.len(), DEFAULT_LOAD_FACTOR)),
            load_factor: DEFAULT_LOAD_FACTOR,
        };
        Self::with_store(store, HashGrowth::with_sizing(&sizing), breaker, LABEL)
    }

    pub fn threshold(&self) -> u64 {
        self.growth().threshold()
    }
}
