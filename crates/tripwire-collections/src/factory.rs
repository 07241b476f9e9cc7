//! One handle that builds every wrapper kind against the same breaker.
//!
//! Wrappers release on drop, so there are no separate auto-closing variants;
//! scope a wrapper to the request that owns it.

use std::hash::Hash;

use tripwire_core::breaker::BreakerRef;
use tripwire_core::config::SizingConfig;
use tripwire_core::size::SizeOf;

use crate::error::Result;
use crate::{BreakingHashMap, BreakingHashSet, BreakingList, BreakingTreeMap, BreakingTreeSet};

#[derive(Clone)]
pub struct BreakingCollections {
    breaker: BreakerRef,
}

impl BreakingCollections {
    pub fn new(breaker: BreakerRef) -> Self {
        Self { breaker }
    }

    pub fn breaker(&self) -> &BreakerRef {
        &self.breaker
    }

    pub fn new_list<T: SizeOf + PartialEq>(&self) -> Result<BreakingList<T>> {
        BreakingList::new(self.breaker.clone())
    }

    pub fn new_list_with_capacity<T: SizeOf + PartialEq>(
        &self,
        capacity: usize,
    ) -> Result<BreakingList<T>> {
        BreakingList::with_capacity(self.breaker.clone(), capacity)
    }

    pub fn new_list_from<T, I>(&self, source: I) -> Result<BreakingList<T>>
    where
        T: SizeOf + PartialEq,
        I: IntoIterator<Item = T>,
    {
        BreakingList::from_source(self.breaker.clone(), source)
    }

    pub fn new_hash_map<K, V>(&self) -> Result<BreakingHashMap<K, V>>
    where
        K: Eq + Hash + SizeOf,
        V: SizeOf,
    {
        BreakingHashMap::new(self.breaker.clone())
    }

    pub fn new_hash_map_with_capacity<K, V>(
        &self,
        initial_capacity: usize,
        load_factor: f32,
    ) -> Result<BreakingHashMap<K, V>>
    where
        K: Eq + Hash + SizeOf,
        V: SizeOf,
    {
        BreakingHashMap::with_capacity_and_load_factor(
            self.breaker.clone(),
            initial_capacity,
            load_factor,
        )
    }

    pub fn new_hash_map_with_sizing<K, V>(
        &self,
        cfg: &SizingConfig,
    ) -> Result<BreakingHashMap<K, V>>
    where
        K: Eq + Hash + SizeOf,
        V: SizeOf,
    {
        BreakingHashMap::with_sizing(self.breaker.clone(), cfg)
    }

    pub fn new_tree_map<K: Ord + SizeOf, V: SizeOf>(&self) -> Result<BreakingTreeMap<K, V>> {
        BreakingTreeMap::new(self.breaker.clone())
    }

    pub fn new_tree_map_from<K, V, I>(&self, source: I) -> Result<BreakingTreeMap<K, V>>
    where
        K: Ord + SizeOf,
        V: SizeOf,
        I: IntoIterator<Item = (K, V)>,
    {
        BreakingTreeMap::from_source(self.breaker.clone(), source)
    }

    pub fn new_hash_set<T: Eq + Hash + SizeOf>(&self) -> Result<BreakingHashSet<T>> {
        BreakingHashSet::new(self.breaker.clone())
    }

    pub fn new_hash_set_with_capacity<T: Eq + Hash + SizeOf>(
        &self,
        initial_capacity: usize,
        load_factor: f32,
    ) -> Result<BreakingHashSet<T>> {
        BreakingHashSet::with_capacity_and_load_factor(
            self.breaker.clone(),
            initial_capacity,
            load_factor,
        )
    }

    pub fn new_hash_set_from<T, I>(&self, source: I) -> Result<BreakingHashSet<T>>
    where
        T: Eq + Hash + SizeOf,
        I: IntoIterator<Item = T>,
    {
        BreakingHashSet::from_source(self.breaker.clone(), source)
    }

    pub fn new_tree_set<T: Ord + SizeOf>(&self) -> Result<BreakingTreeSet<T>> {
        BreakingTreeSet::new(self.breaker.clone())
    }

    pub fn new_tree_set_from<T, I>(&self, source: I) -> Result<BreakingTreeSet<T>>
    where
        T: Ord + SizeOf,
        I: IntoIterator<Item = T>,
    {
        BreakingTreeSet::from_source(self.breaker.clone(), source)
    }
}
