#![forbid(unsafe_code)]
//! tripwire-collections: lists, maps, and sets that report their estimated
//! footprint to a shared [`CircuitBreaker`](tripwire_core::CircuitBreaker).
//!
//! Every mutating call first lets the backing std container change, then
//! re-estimates the bytes that container occupies through a growth policy
//! and settles the difference with the breaker. A trip surfaces as
//! [`Error::LimitExceeded`] *after* the mutation took effect; the wrapper's
//! new state is authoritative either way and the bytes stay accounted.
//!
//! Reads pass straight through. Dropping or closing a wrapper returns its
//! whole reservation exactly once.
//!
//! Wrappers assume a single writer. The breaker is the only shared state.

pub mod collection;
pub mod error;
pub mod factory;
pub mod growth;
pub mod hash_map;
pub mod hash_set;
pub mod list;
pub mod map;
pub mod reservation;
pub mod set;
mod tracked;
pub mod tree_map;
pub mod tree_set;

pub use collection::{Bag, BreakingCollection};
pub use error::{Error, Result};
pub use factory::BreakingCollections;
pub use growth::{ArrayGrowth, GrowthPolicy, HashGrowth, TreeGrowth};
pub use hash_map::BreakingHashMap;
pub use hash_set::BreakingHashSet;
pub use list::BreakingList;
pub use map::{BreakingMap, MapStore};
pub use reservation::Reservation;
pub use set::SetStore;
pub use tracked::Backing;
pub use tree_map::BreakingTreeMap;
pub use tree_set::BreakingTreeSet;
