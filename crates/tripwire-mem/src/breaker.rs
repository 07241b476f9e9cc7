//! Atomic breaker ledger.
//!
//! Many collections share one breaker. Reservation and release are lock-free;
//! a checked reservation never records bytes it rejects.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

use tripwire_core::breaker::{BreakerRef, CircuitBreaker};
use tripwire_core::config::BreakerConfig;
use tripwire_core::error::{Error, LimitExceeded, Result};

/// Shared inner state for the breaker.
struct BreakerInner {
    name: String,
    limit: i64,
    used: AtomicI64,
    trips: AtomicU64,
    /// High-water mark of `used`.
    peak: AtomicI64,
}

impl BreakerInner {
    fn new(name: String, limit: i64) -> Self {
        Self {
            name,
            limit,
            used: AtomicI64::new(0),
            trips: AtomicU64::new(0),
            peak: AtomicI64::new(0),
        }
    }

    fn try_add(&self, delta: i64) -> std::result::Result<i64, i64> {
        loop {
            let cur = self.used.load(Ordering::Relaxed);
            let next = cur.saturating_add(delta);
            if next > self.limit {
                return Err(next);
            }
            if self
                .used
                .compare_exchange(cur, next, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
            {
                return Ok(next);
            }
        }
    }

    fn add(&self, delta: i64) -> i64 {
        self.used.fetch_add(delta, Ordering::AcqRel) + delta
    }

    fn record_peak(&self, used: i64) {
        let prev = self.peak.fetch_max(used, Ordering::Relaxed);
        #[cfg(feature = "tracing")]
        {
            if used > prev {
                tracing::trace!(breaker = %self.name, used, "new peak");
            }
        }
        #[cfg(not(feature = "tracing"))]
        let _ = prev;
    }
}

/// Concrete breaker used by tracked collections.
///
/// Cloning yields another handle onto the same ledger.
#[derive(Clone)]
pub struct MemoryBreaker {
    inner: Arc<BreakerInner>,
}

impl MemoryBreaker {
    pub fn new(name: impl Into<String>, limit_bytes: i64) -> Self {
        Self {
            inner: Arc::new(BreakerInner::new(name.into(), limit_bytes)),
        }
    }

    /// A breaker that records reservations but never trips.
    pub fn unlimited() -> Self {
        Self::new("unlimited", i64::MAX)
    }

    pub fn from_config(cfg: &BreakerConfig) -> Result<Self> {
        if cfg.limit_bytes < 0 {
            return Err(Error::Config(format!(
                "breaker [{}] limit must be non-negative, got {}",
                cfg.name, cfg.limit_bytes
            )));
        }
        Ok(Self::new(cfg.name.clone(), cfg.limit_bytes))
    }

    /// Type-erased handle to pass into collection constructors.
    pub fn handle(&self) -> BreakerRef {
        Arc::new(self.clone())
    }

    /// Number of rejected checked reservations so far.
    pub fn trip_count(&self) -> u64 {
        self.inner.trips.load(Ordering::Relaxed)
    }

    /// Highest total ever reserved.
    pub fn peak_bytes(&self) -> i64 {
        self.inner.peak.load(Ordering::Relaxed)
    }

    fn trip(&self, requested: i64, would_be: i64, label: &str) -> LimitExceeded {
        self.inner.trips.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            breaker = %self.inner.name,
            label,
            requested,
            would_be,
            limit = self.inner.limit,
            "breaker tripped"
        );
        LimitExceeded {
            breaker: self.inner.name.clone(),
            label: label.to_string(),
            requested,
            would_be,
            limit: self.inner.limit,
        }
    }
}

impl CircuitBreaker for MemoryBreaker {
    fn reserve_checked(&self, delta_bytes: i64, label: &str) -> std::result::Result<(), LimitExceeded> {
        if delta_bytes < 0 {
            self.reserve_unchecked(delta_bytes);
            return Ok(());
        }
        match self.inner.try_add(delta_bytes) {
            Ok(used) => {
                self.inner.record_peak(used);
                Ok(())
            }
            Err(would_be) => Err(self.trip(delta_bytes, would_be, label)),
        }
    }

    fn reserve_unchecked(&self, delta_bytes: i64) {
        let used = self.inner.add(delta_bytes);
        self.inner.record_peak(used);
    }

    fn used_bytes(&self) -> i64 {
        self.inner.used.load(Ordering::Relaxed)
    }

    fn limit_bytes(&self) -> i64 {
        self.inner.limit
    }

    fn name(&self) -> &str {
        &self.inner.name
    }
}

impl std::fmt::Debug for MemoryBreaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBreaker")
            .field("name", &self.inner.name)
            .field("limit", &self.inner.limit)
            .field("used", &self.used_bytes())
            .finish()
    }
}
