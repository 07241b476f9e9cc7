//! Generic breaker-accounted collection.
//!
//! Sequence/bag operations delegate to the backing store; every call that
//! can change the store's size is followed by a reconcile with the breaker.
//! When that reconcile trips, the operation returns
//! [`Error::LimitExceeded`](crate::Error::LimitExceeded) but its effect on the
//! store stands. Callers that need "no growth on failure" must undo the
//! change themselves (e.g. remove the element they just added).

use std::collections::{btree_set, hash_set, BTreeSet, HashSet};
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::slice;

use tripwire_core::breaker::BreakerRef;

use crate::error::{Error, Result};
use crate::growth::GrowthPolicy;
use crate::tracked::{Backing, Tracked};

/// A store with bag semantics: may or may not enforce uniqueness.
pub trait Bag: Backing {
    type Item: PartialEq;
    type Iter<'a>: Iterator<Item = &'a Self::Item>
    where
        Self: 'a;

    fn contains(&self, value: &Self::Item) -> bool;

    /// Returns `false` if the store rejected the value as a duplicate.
    fn add(&mut self, value: Self::Item) -> bool;

    /// Remove one occurrence of `value`.
    fn remove(&mut self, value: &Self::Item) -> bool;

    fn retain<F: FnMut(&Self::Item) -> bool>(&mut self, f: F);

    fn iter(&self) -> Self::Iter<'_>;

    /// Release unused capacity. Returns `false` if the store can't.
    fn compact(&mut self) -> bool {
        false
    }
}

impl<T: PartialEq> Bag for Vec<T> {
    type Item = T;
    type Iter<'a>
        = slice::Iter<'a, T>
    where
        Self: 'a;

    fn contains(&self, value: &T) -> bool {
        <[T]>::contains(self, value)
    }

    fn add(&mut self, value: T) -> bool {
        self.push(value);
        true
    }

    fn remove(&mut self, value: &T) -> bool {
        match <[T]>::iter(self).position(|x| x == value) {
            Some(idx) => {
                Vec::remove(self, idx);
                true
            }
            None => false,
        }
    }

    fn retain<F: FnMut(&T) -> bool>(&mut self, f: F) {
        Vec::retain(self, f)
    }

    fn iter(&self) -> Self::Iter<'_> {
        <[T]>::iter(self)
    }

    fn compact(&mut self) -> bool {
        self.shrink_to_fit();
        true
    }
}

impl<T: Eq + Hash, H: BuildHasher> Bag for HashSet<T, H> {
    type Item = T;
    type Iter<'a>
        = hash_set::Iter<'a, T>
    where
        Self: 'a;

    fn contains(&self, value: &T) -> bool {
        HashSet::contains(self, value)
    }

    fn add(&mut self, value: T) -> bool {
        self.insert(value)
    }

    fn remove(&mut self, value: &T) -> bool {
        HashSet::remove(self, value)
    }

    fn retain<F: FnMut(&T) -> bool>(&mut self, f: F) {
        HashSet::retain(self, f)
    }

    fn iter(&self) -> Self::Iter<'_> {
        HashSet::iter(self)
    }
}

impl<T: Ord> Bag for BTreeSet<T> {
    type Item = T;
    type Iter<'a>
        = btree_set::Iter<'a, T>
    where
        Self: 'a;

    fn contains(&self, value: &T) -> bool {
        BTreeSet::contains(self, value)
    }

    fn add(&mut self, value: T) -> bool {
        self.insert(value)
    }

    fn remove(&mut self, value: &T) -> bool {
        BTreeSet::remove(self, value)
    }

    fn retain<F: FnMut(&T) -> bool>(&mut self, f: F) {
        BTreeSet::retain(self, f)
    }

    fn iter(&self) -> Self::Iter<'_> {
        BTreeSet::iter(self)
    }
}

/// A bag-like store `S` whose footprint is modeled by `P` and reported to a
/// breaker.
///
/// Dropping the wrapper returns its reservation; [`close`](Self::close) does
/// the same eagerly and may be called any number of times.
pub struct BreakingCollection<S, P> {
    pub(crate) tracked: Tracked<S, P>,
}

impl<S: Bag, P: GrowthPolicy<S>> BreakingCollection<S, P> {
    pub(crate) fn with_store(
        store: S,
        policy: P,
        breaker: BreakerRef,
        label: &'static str,
    ) -> Result<Self> {
        Ok(Self {
            tracked: Tracked::new(store, policy, breaker, label)?,
        })
    }

    pub fn len(&self) -> usize {
        self.tracked.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.store.is_empty()
    }

    pub fn contains(&self, value: &S::Item) -> bool {
        self.tracked.store.contains(value)
    }

    pub fn iter(&self) -> S::Iter<'_> {
        self.tracked.store.iter()
    }

    /// Read-only view of the backing store.
    pub fn inner(&self) -> &S {
        &self.tracked.store
    }

    pub fn add(&mut self, value: S::Item) -> Result<bool> {
        self.tracked.mutate(|s| s.add(value))
    }

    pub fn remove(&mut self, value: &S::Item) -> Result<bool> {
        self.tracked.mutate(|s| s.remove(value))
    }

    /// Add every value, reconciling once at the end.
    pub fn add_all<I>(&mut self, values: I) -> Result<bool>
    where
        I: IntoIterator<Item = S::Item>,
    {
        self.tracked.mutate(|s| {
            let mut changed = false;
            for v in values {
                changed |= s.add(v);
            }
            changed
        })
    }

    /// Remove every occurrence of every value in `values`.
    pub fn remove_all<'a, I>(&mut self, values: I) -> Result<bool>
    where
        I: IntoIterator<Item = &'a S::Item>,
        S::Item: 'a,
    {
        let doomed: Vec<&S::Item> = values.into_iter().collect();
        self.retain_counting(|x| !doomed.iter().any(|d| *d == x))
    }

    /// Keep only elements that appear in `values`.
    pub fn retain_all<'a, I>(&mut self, values: I) -> Result<bool>
    where
        I: IntoIterator<Item = &'a S::Item>,
        S::Item: 'a,
    {
        let kept: Vec<&S::Item> = values.into_iter().collect();
        self.retain_counting(|x| kept.iter().any(|k| *k == x))
    }

    pub fn remove_if<F>(&mut self, mut pred: F) -> Result<bool>
    where
        F: FnMut(&S::Item) -> bool,
    {
        self.retain_counting(|x| !pred(x))
    }

    pub fn retain<F>(&mut self, f: F) -> Result<()>
    where
        F: FnMut(&S::Item) -> bool,
    {
        self.retain_counting(f).map(|_| ())
    }

    fn retain_counting<F>(&mut self, f: F) -> Result<bool>
    where
        F: FnMut(&S::Item) -> bool,
    {
        self.tracked.mutate(|s| {
            let before = s.len();
            s.retain(f);
            s.len() != before
        })
    }

    /// Empty the collection and return its whole reservation.
    pub fn clear(&mut self) {
        self.tracked.clear();
    }

    /// Same as [`clear`](Self::clear); the explicit end-of-use call.
    pub fn close(&mut self) {
        self.clear();
    }

    /// Compact the backing store to its length and lower the reservation to
    /// match.
    ///
    /// Only array-backed stores can compact; others return
    /// [`Error::Unsupported`] and are left untouched. If the shared breaker is
    /// still over its limit afterwards, the lower reservation stands and
    /// [`Error::LimitExceeded`] is returned.
    pub fn shrink_reservation_to_size(&mut self) -> Result<()> {
        if !self.tracked.store.compact() {
            return Err(Error::Unsupported("backing store cannot be compacted"));
        }
        let len = self.tracked.store.len();
        self.tracked.policy.shrink_to(len);
        self.tracked.update_breaker()?;
        Ok(())
    }

    /// Bytes currently reserved for this collection.
    pub fn reserved_bytes(&self) -> i64 {
        self.tracked.reserved_bytes()
    }

    pub fn capacity_estimate(&self) -> u64 {
        self.tracked.capacity_estimate()
    }

    pub fn per_element_size(&self) -> Option<u64> {
        self.tracked.per_element_size()
    }

    /// The growth policy's state, for diagnostics.
    pub fn growth(&self) -> &P {
        &self.tracked.policy
    }
}

impl<'a, S: Bag, P: GrowthPolicy<S>> IntoIterator for &'a BreakingCollection<S, P> {
    type Item = &'a S::Item;
    type IntoIter = S::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Equality is over contents only; accounting state is ignored.
impl<S: PartialEq, P> PartialEq for BreakingCollection<S, P> {
    fn eq(&self, other: &Self) -> bool {
        self.tracked.store == other.tracked.store
    }
}

impl<S: Eq, P> Eq for BreakingCollection<S, P> {}

impl<S: fmt::Debug, P> fmt::Debug for BreakingCollection<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BreakingCollection")
            .field("items", &self.tracked.store)
            .field("reserved", &self.tracked.reservation.reserved_bytes())
            .finish()
    }
}
