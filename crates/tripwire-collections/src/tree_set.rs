//! Ordered set on a B-tree.

use std::collections::{btree_set, BTreeSet};
use std::ops::RangeBounds;

use tripwire_core::breaker::BreakerRef;
use tripwire_core::size::SizeOf;

use crate::collection::BreakingCollection;
use crate::error::Result;
use crate::growth::TreeGrowth;

const LABEL: &str = "<BreakingTreeSet>";

pub type BreakingTreeSet<T> = BreakingCollection<BTreeSet<T>, TreeGrowth>;

impl<T: Ord + SizeOf> BreakingCollection<BTreeSet<T>, TreeGrowth> {
    pub fn new(breaker: BreakerRef) -> Result<Self> {
        Self::with_store(BTreeSet::new(), TreeGrowth::new(), breaker, LABEL)
    }

    pub fn from_source<I>(breaker: BreakerRef, source: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        Self::with_store(source.into_iter().collect(), TreeGrowth::new(), breaker, LABEL)
    }

    pub fn first(&self) -> Option<&T> {
        self.tracked.store.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.tracked.store.last()
    }

    pub fn pop_first(&mut self) -> Result<Option<T>> {
        self.tracked.mutate(|s| s.pop_first())
    }

    pub fn pop_last(&mut self) -> Result<Option<T>> {
        self.tracked.mutate(|s| s.pop_last())
    }

    pub fn range<R: RangeBounds<T>>(&self, range: R) -> btree_set::Range<'_, T> {
        self.tracked.store.range(range)
    }
}
