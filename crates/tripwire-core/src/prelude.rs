//! Convenient re-exports for downstream crates.

pub use crate::breaker::{BreakerRef, CircuitBreaker};
pub use crate::config::{BreakerConfig, Sizing, SizingConfig, DEFAULT_LOAD_FACTOR};
pub use crate::error::{Error, LimitExceeded, Result};
pub use crate::size::{size_with_one_reference, SizeOf, REFERENCE_BYTES};
