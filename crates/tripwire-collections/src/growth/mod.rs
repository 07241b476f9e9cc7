//! Growth policies: models of how a backing container's allocation grows.
//!
//! Each policy keeps a capacity estimate in its own units and turns it into a
//! byte estimate. The set of policies is closed:
//!
//! - [`ArrayGrowth`]: dynamic arrays growing by 1.5x from a default of 10.
//! - [`HashGrowth`]: power-of-two hash tables doubling past a load threshold.
//! - [`TreeGrowth`]: balanced trees, using an imaginary capacity purely to
//!   amortize re-estimation.
//!
//! Per-element sizes are measured once, from a live element, the first time
//! an estimate is taken on a non-empty container. Elements are assumed to be
//! homogeneous in size after that; a collection of wildly varying elements
//! will be over- or under-estimated.

pub mod array;
pub mod hash;
pub mod tree;

pub use array::ArrayGrowth;
pub use hash::HashGrowth;
pub use tree::TreeGrowth;

/// Capacity and byte estimation for one kind of backing store `S`.
pub trait GrowthPolicy<S: ?Sized> {
    /// Grow the capacity estimate until it covers `len` elements.
    ///
    /// Never lowers the estimate.
    fn resize_if_required(&mut self, len: usize);

    /// Estimated bytes held by `store` at the current capacity estimate.
    ///
    /// Measures and caches the per-element size on first use with a
    /// non-empty store.
    fn bytes_required(&mut self, store: &S) -> u64;

    /// Current modeled capacity, in policy-specific units.
    fn capacity_estimate(&self) -> u64;

    /// Cached per-element cost, once measured.
    fn per_element_size(&self) -> Option<u64>;

    /// Forget the capacity estimate after the store was emptied.
    ///
    /// Cached element sizes survive.
    fn reset(&mut self);

    /// Pin the estimate to exactly `len` after the store was compacted.
    fn shrink_to(&mut self, len: usize) {
        let _ = len;
    }
}
