#![forbid(unsafe_code)]
//! tripwire: memory admission control for request-scoped collections.
//!
//! Wrap the lists, maps, and sets a request accumulates so that their
//! estimated footprint is reserved against a shared circuit breaker. A trip
//! is an ordinary, recoverable error; it never leaks the bytes already
//! reserved.
//!
//! ```ignore
//! use tripwire::{BreakingList, MemoryBreaker};
//!
//! let breaker = MemoryBreaker::new("request", 64 * 1024 * 1024);
//! let mut hits = BreakingList::new(breaker.handle())?;
//! hits.add(42u64)?;
//! ```

pub use tripwire_collections;
pub use tripwire_core;
pub use tripwire_mem;

pub use tripwire_collections::{
    BreakingCollections, BreakingHashMap, BreakingHashSet, BreakingList, BreakingTreeMap,
    BreakingTreeSet, Error, Result,
};
pub use tripwire_core::{BreakerRef, CircuitBreaker, LimitExceeded, SizeOf};
pub use tripwire_mem::MemoryBreaker;
