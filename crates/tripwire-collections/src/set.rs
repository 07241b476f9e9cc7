//! Set specialization of [`BreakingCollection`].
//!
//! Uniqueness comes from the backing store; accounting is the collection's.

use std::collections::{BTreeSet, HashSet};
use std::hash::{BuildHasher, Hash};

use crate::collection::{Bag, BreakingCollection};
use crate::error::Result;
use crate::growth::GrowthPolicy;

/// A [`Bag`] that holds each value at most once.
pub trait SetStore: Bag {
    /// The stored value equal to `value`, if any.
    fn get(&self, value: &Self::Item) -> Option<&Self::Item>;

    fn take(&mut self, value: &Self::Item) -> Option<Self::Item>;

    /// Insert `value`, handing back the equal value it displaced.
    fn replace(&mut self, value: Self::Item) -> Option<Self::Item>;

    fn is_subset(&self, other: &Self) -> bool;

    fn is_disjoint(&self, other: &Self) -> bool;
}

impl<T: Eq + Hash, H: BuildHasher> SetStore for HashSet<T, H> {
    fn get(&self, value: &T) -> Option<&T> {
        HashSet::get(self, value)
    }

    fn take(&mut self, value: &T) -> Option<T> {
        HashSet::take(self, value)
    }

    fn replace(&mut self, value: T) -> Option<T> {
        HashSet::replace(self, value)
    }

    fn is_subset(&self, other: &Self) -> bool {
        HashSet::is_subset(self, other)
    }

    fn is_disjoint(&self, other: &Self) -> bool {
        HashSet::is_disjoint(self, other)
    }
}

impl<T: Ord> SetStore for BTreeSet<T> {
    fn get(&self, value: &T) -> Option<&T> {
        BTreeSet::get(self, value)
    }

    fn take(&mut self, value: &T) -> Option<T> {
        BTreeSet::take(self, value)
    }

    fn replace(&mut self, value: T) -> Option<T> {
        BTreeSet::replace(self, value)
    }

    fn is_subset(&self, other: &Self) -> bool {
        BTreeSet::is_subset(self, other)
    }

    fn is_disjoint(&self, other: &Self) -> bool {
        BTreeSet::is_disjoint(self, other)
    }
}

impl<S: SetStore, P: GrowthPolicy<S>> BreakingCollection<S, P> {
    pub fn get(&self, value: &S::Item) -> Option<&S::Item> {
        self.tracked.store.get(value)
    }

    /// Remove and return the stored value equal to `value`.
    pub fn take(&mut self, value: &S::Item) -> Result<Option<S::Item>> {
        self.tracked.mutate(|s| s.take(value))
    }

    pub fn replace(&mut self, value: S::Item) -> Result<Option<S::Item>> {
        self.tracked.mutate(|s| s.replace(value))
    }

    pub fn is_subset<Q>(&self, other: &BreakingCollection<S, Q>) -> bool {
        self.tracked.store.is_subset(&other.tracked.store)
    }

    pub fn is_disjoint<Q>(&self, other: &BreakingCollection<S, Q>) -> bool {
        self.tracked.store.is_disjoint(&other.tracked.store)
    }
}
