//! Generic breaker-accounted map.
//!
//! `insert`, `remove`, `extend`, `retain` and `clear` reconcile with the
//! breaker; lookups and iteration pass through. Equality and hashing look at
//! entries only.

use std::collections::{btree_map, hash_map, BTreeMap, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};

use tripwire_core::breaker::BreakerRef;

use crate::error::Result;
use crate::growth::GrowthPolicy;
use crate::tracked::{Backing, Tracked};

/// A key-to-value store.
pub trait MapStore: Backing {
    type Key;
    type Value;
    type Iter<'a>: Iterator<Item = (&'a Self::Key, &'a Self::Value)>
    where
        Self: 'a;

    fn get(&self, key: &Self::Key) -> Option<&Self::Value>;

    fn get_mut(&mut self, key: &Self::Key) -> Option<&mut Self::Value>;

    fn contains_key(&self, key: &Self::Key) -> bool;

    fn insert(&mut self, key: Self::Key, value: Self::Value) -> Option<Self::Value>;

    fn remove(&mut self, key: &Self::Key) -> Option<Self::Value>;

    fn retain<F: FnMut(&Self::Key, &mut Self::Value) -> bool>(&mut self, f: F);

    fn iter(&self) -> Self::Iter<'_>;
}

impl<K: Eq + Hash, V, H: BuildHasher> MapStore for HashMap<K, V, H> {
    type Key = K;
    type Value = V;
    type Iter<'a>
        = hash_map::Iter<'a, K, V>
    where
        Self: 'a;

    fn get(&self, key: &K) -> Option<&V> {
        HashMap::get(self, key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        HashMap::get_mut(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        HashMap::contains_key(self, key)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        HashMap::insert(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        HashMap::remove(self, key)
    }

    fn retain<F: FnMut(&K, &mut V) -> bool>(&mut self, f: F) {
        HashMap::retain(self, f)
    }

    fn iter(&self) -> Self::Iter<'_> {
        HashMap::iter(self)
    }
}

impl<K: Ord, V> MapStore for BTreeMap<K, V> {
    type Key = K;
    type Value = V;
    type Iter<'a>
        = btree_map::Iter<'a, K, V>
    where
        Self: 'a;

    fn get(&self, key: &K) -> Option<&V> {
        BTreeMap::get(self, key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        BTreeMap::get_mut(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        BTreeMap::contains_key(self, key)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        BTreeMap::insert(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        BTreeMap::remove(self, key)
    }

    fn retain<F: FnMut(&K, &mut V) -> bool>(&mut self, f: F) {
        BTreeMap::retain(self, f)
    }

    fn iter(&self) -> Self::Iter<'_> {
        BTreeMap::iter(self)
    }
}

/// A map store `S` whose footprint is modeled by `P` and reported to a
/// breaker. Released on drop or [`close`](Self::close).
pub struct BreakingMap<S, P> {
    pub(crate) tracked: Tracked<S, P>,
}

impl<S: MapStore, P: GrowthPolicy<S>> BreakingMap<S, P> {
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

    pub fn get(&self, key: &S::Key) -> Option<&S::Value> {
        self.tracked.store.get(key)
    }

    /// In-place value access. Does not re-measure; per-entry sizes are fixed
    /// after the first measurement.
    pub fn get_mut(&mut self, key: &S::Key) -> Option<&mut S::Value> {
        self.tracked.store.get_mut(key)
    }

    pub fn contains_key(&self, key: &S::Key) -> bool {
        self.tracked.store.contains_key(key)
    }

    pub fn contains_value(&self, value: &S::Value) -> bool
    where
        S::Value: PartialEq,
    {
        self.tracked.store.iter().any(|(_, v)| v == value)
    }

    pub fn iter(&self) -> S::Iter<'_> {
        self.tracked.store.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &S::Key> + '_ {
        self.tracked.store.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &S::Value> + '_ {
        self.tracked.store.iter().map(|(_, v)| v)
    }

    /// Read-only view of the backing map.
    pub fn inner(&self) -> &S {
        &self.tracked.store
    }

    /// Insert, returning the displaced value.
    ///
    /// If the breaker trips, the entry is in the map regardless; a displaced
    /// value is dropped along with the error.
    pub fn insert(&mut self, key: S::Key, value: S::Value) -> Result<Option<S::Value>> {
        self.tracked.mutate(|s| s.insert(key, value))
    }

    pub fn remove(&mut self, key: &S::Key) -> Result<Option<S::Value>> {
        self.tracked.mutate(|s| s.remove(key))
    }

    /// Insert every entry, reconciling once at the end.
    pub fn extend<I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (S::Key, S::Value)>,
    {
        self.tracked.mutate(|s| {
            for (k, v) in entries {
                s.insert(k, v);
            }
        })
    }

    pub fn retain<F>(&mut self, f: F) -> Result<()>
    where
        F: FnMut(&S::Key, &mut S::Value) -> bool,
    {
        self.tracked.mutate(|s| s.retain(f))
    }

    /// Empty the map and return its whole reservation.
    pub fn clear(&mut self) {
        self.tracked.clear();
    }

    /// Same as [`clear`](Self::clear); the explicit end-of-use call.
    pub fn close(&mut self) {
        self.clear();
    }

    pub fn reserved_bytes(&self) -> i64 {
        self.tracked.reserved_bytes()
    }

    pub fn capacity_estimate(&self) -> u64 {
        self.tracked.capacity_estimate()
    }

    pub fn per_element_size(&self) -> Option<u64> {
        self.tracked.per_element_size()
    }

    pub fn growth(&self) -> &P {
        &self.tracked.policy
    }
}

impl<'a, S: MapStore, P: GrowthPolicy<S>> IntoIterator for &'a BreakingMap<S, P> {
    type Item = (&'a S::Key, &'a S::Value);
    type IntoIter = S::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S: PartialEq, P> PartialEq for BreakingMap<S, P> {
    fn eq(&self, other: &Self) -> bool {
        self.tracked.store == other.tracked.store
    }
}

impl<S: Eq, P> Eq for BreakingMap<S, P> {}

impl<S: Hash, P> Hash for BreakingMap<S, P> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tracked.store.hash(state);
    }
}

impl<S: fmt::Debug, P> fmt::Debug for BreakingMap<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BreakingMap")
            .field("entries", &self.tracked.store)
            .field("reserved", &self.tracked.reservation.reserved_bytes())
            .finish()
    }
}
