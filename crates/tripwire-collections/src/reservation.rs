//! A wrapper's outstanding reservation against its breaker.
//!
//! The reservation moves by deltas: each settle computes
//! `required - reserved`, records the delta unchecked (the backing container
//! already holds the memory), then asks the breaker whether the new total is
//! over its limit. That check runs after shrinks too, so a wrapper that
//! shrinks while the breaker is still over its limit reports the trip.
//! `reserved` follows `required` even when the check trips, so the next delta
//! is taken against what the ledger really holds.
//!
//! Only [`Reservation::release`] and drop skip the check.

use tripwire_core::breaker::BreakerRef;
use tripwire_core::error::LimitExceeded;

pub struct Reservation {
    breaker: BreakerRef,
    label: &'static str,
    reserved: i64,
}

impl Reservation {
    pub fn new(breaker: BreakerRef, label: &'static str) -> Self {
        Self {
            breaker,
            label,
            reserved: 0,
        }
    }

    /// Bytes currently attributed to this holder in the breaker's ledger.
    pub fn reserved_bytes(&self) -> i64 {
        self.reserved
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn breaker(&self) -> &BreakerRef {
        &self.breaker
    }

    /// Move the reservation to `required` bytes.
    ///
    /// The delta is recorded first and the total checked second. An
    /// unchanged size never reaches the breaker.
    pub fn settle(&mut self, required: i64) -> Result<(), LimitExceeded> {
        let diff = required - self.reserved;
        if diff == 0 {
            return Ok(());
        }
        self.breaker.reserve_unchecked(diff);
        self.reserved = required;
        #[cfg(feature = "tracing")]
        tracing::trace!(label = self.label, diff, reserved = required, "settled reservation");
        self.breaker.reserve_checked(0, self.label)
    }

    /// Return everything. A second call is a no-op.
    pub fn release(&mut self) {
        if self.reserved != 0 {
            #[cfg(feature = "tracing")]
            tracing::debug!(label = self.label, bytes = self.reserved, "releasing reservation");
            self.breaker.reserve_unchecked(-self.reserved);
            self.reserved = 0;
        }
    }
}

impl Drop for Reservation {
    fn drop(&mut self) {
        if self.reserved != 0 {
            // NOTE: do not log here to keep drop path fast.
            self.breaker.reserve_unchecked(-self.reserved);
            self.reserved = 0;
        }
    }
}

impl std::fmt::Debug for Reservation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reservation")
            .field("breaker", &self.breaker.name())
            .field("label", &self.label)
            .field("reserved", &self.reserved)
            .finish()
    }
}
