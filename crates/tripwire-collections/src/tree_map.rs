//! Ordered map on a B-tree.
//!
//! Ordering is the key type's `Ord`. For a custom order, key by a newtype
//! (e.g. [`std::cmp::Reverse`]) rather than passing a comparator.

use std::collections::{btree_map, BTreeMap};
use std::ops::RangeBounds;

use tripwire_core::breaker::BreakerRef;
use tripwire_core::size::SizeOf;

use crate::error::Result;
use crate::growth::TreeGrowth;
use crate::map::BreakingMap;

const LABEL: &str = "<BreakingTreeMap>";

pub type BreakingTreeMap<K, V> = BreakingMap<BTreeMap<K, V>, TreeGrowth>;

impl<K: Ord + SizeOf, V: SizeOf> BreakingMap<BTreeMap<K, V>, TreeGrowth> {
    pub fn new(breaker: BreakerRef) -> Result<Self> {
        Self::with_store(BTreeMap::new(), TreeGrowth::new(), breaker, LABEL)
    }

    /// Populate from `source`; later duplicates of a key win.
    pub fn from_source<I>(breaker: BreakerRef, source: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::with_store(source.into_iter().collect(), TreeGrowth::new(), breaker, LABEL)
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tracked.store.first_key_value()
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tracked.store.last_key_value()
    }

    pub fn pop_first(&mut self) -> Result<Option<(K, V)>> {
        self.tracked.mutate(|s| s.pop_first())
    }

    pub fn pop_last(&mut self) -> Result<Option<(K, V)>> {
        self.tracked.mutate(|s| s.pop_last())
    }

    pub fn range<R: RangeBounds<K>>(&self, range: R) -> btree_map::Range<'_, K, V> {
        self.tracked.store.range(range)
    }
}
