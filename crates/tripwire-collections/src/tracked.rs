//! Shared machinery behind every wrapper: one backing store, its growth
//! policy, and its reservation.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::{BuildHasher, Hash};

use tripwire_core::breaker::BreakerRef;
use tripwire_core::error::LimitExceeded;

use crate::error::Result;
use crate::growth::GrowthPolicy;
use crate::reservation::Reservation;

/// What every backing store exposes to the accounting layer.
pub trait Backing {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);
}

impl<T> Backing for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }
    fn clear(&mut self) {
        Vec::clear(self)
    }
}

impl<T: Eq + Hash, H: BuildHasher> Backing for HashSet<T, H> {
    fn len(&self) -> usize {
        HashSet::len(self)
    }
    fn clear(&mut self) {
        HashSet::clear(self)
    }
}

impl<T: Ord> Backing for BTreeSet<T> {
    fn len(&self) -> usize {
        BTreeSet::len(self)
    }
    fn clear(&mut self) {
        BTreeSet::clear(self)
    }
}

impl<K: Eq + Hash, V, H: BuildHasher> Backing for HashMap<K, V, H> {
    fn len(&self) -> usize {
        HashMap::len(self)
    }
    fn clear(&mut self) {
        HashMap::clear(self)
    }
}

impl<K: Ord, V> Backing for BTreeMap<K, V> {
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
    fn clear(&mut self) {
        BTreeMap::clear(self)
    }
}

pub(crate) struct Tracked<S, P> {
    pub(crate) store: S,
    pub(crate) policy: P,
    pub(crate) reservation: Reservation,
}

impl<S: Backing, P: GrowthPolicy<S>> Tracked<S, P> {
    /// Wrap `store` and reserve for it right away.
    ///
    /// If that first reservation trips, the partially built wrapper is dropped
    /// and its bytes are returned before the error reaches the caller.
    pub(crate) fn new(store: S, policy: P, breaker: BreakerRef, label: &'static str) -> Result<Self> {
        let mut tracked = Self {
            store,
            policy,
            reservation: Reservation::new(breaker, label),
        };
        tracked.update_breaker()?;
        Ok(tracked)
    }

    /// Bring the capacity estimate up to the store's size, then settle the
    /// reservation to the new byte estimate.
    pub(crate) fn update_breaker(&mut self) -> std::result::Result<(), LimitExceeded> {
        self.policy.resize_if_required(self.store.len());
        let required = self.policy.bytes_required(&self.store);
        self.reservation
            .settle(i64::try_from(required).unwrap_or(i64::MAX))
    }

    /// Apply a size-changing mutation, then reconcile.
    ///
    /// The mutation is kept even if the breaker trips.
    pub(crate) fn mutate<R>(&mut self, f: impl FnOnce(&mut S) -> R) -> Result<R> {
        let out = f(&mut self.store);
        self.update_breaker()?;
        Ok(out)
    }

    /// Empty the store and return the whole reservation.
    pub(crate) fn clear(&mut self) {
        self.store.clear();
        self.policy.reset();
        self.reservation.release();
    }

    pub(crate) fn capacity_estimate(&self) -> u64 {
        self.policy.capacity_estimate()
    }

    pub(crate) fn per_element_size(&self) -> Option<u64> {
        self.policy.per_element_size()
    }

    pub(crate) fn reserved_bytes(&self) -> i64 {
        self.reservation.reserved_bytes()
    }
}
