//! Abstract circuit-breaker (memory accountant) interface.
//!
//! The concrete ledgers live in `tripwire-mem`. We keep only the trait here
//! so collection wrappers can depend on the contract without pulling a policy.

use std::sync::Arc;

use crate::error::LimitExceeded;

/// A shared accountant tracking reserved bytes against a limit.
///
/// Deltas are signed: a negative delta is a release and must never be
/// checked against the limit. Implementations must be safe to call from many
/// wrappers on many threads at once; wrappers never serialize access.
pub trait CircuitBreaker: Send + Sync + 'static {
    /// Add `delta_bytes` and fail if the new total would exceed the limit.
    ///
    /// On rejection the delta is NOT recorded. A zero delta only evaluates
    /// whether the current total is already over the limit.
    fn reserve_checked(&self, delta_bytes: i64, label: &str) -> Result<(), LimitExceeded>;

    /// Add `delta_bytes` unconditionally.
    ///
    /// Used for bytes that already exist in memory; refusing them would
    /// desynchronize the ledger from reality.
    fn reserve_unchecked(&self, delta_bytes: i64);

    /// Bytes currently reserved across every holder (advisory).
    fn used_bytes(&self) -> i64;

    /// Configured limit. `i64::MAX` means unlimited.
    fn limit_bytes(&self) -> i64;

    /// Stable name used in error messages and traces.
    fn name(&self) -> &str {
        "breaker"
    }
}

/// Handle passed into every wrapper at construction.
pub type BreakerRef = Arc<dyn CircuitBreaker>;

// NOTE: Do *not* add a process-wide default breaker here. Wrappers receive
// their accountant explicitly.
