#![forbid(unsafe_code)]
//! tripwire-core: contracts shared by every tripwire crate.
//!
//! - [`breaker::CircuitBreaker`]: the memory accountant wrappers report to.
//! - [`size::SizeOf`]: the per-value byte estimator wrappers measure with.
//! - Configs and the error taxonomy.
//!
//! No concrete ledger lives here; see `tripwire-mem`.

pub mod breaker;
pub mod config;
pub mod error;
pub mod prelude;
pub mod size;

pub use breaker::{BreakerRef, CircuitBreaker};
pub use error::{Error, LimitExceeded, Result};
pub use size::{size_with_one_reference, SizeOf, REFERENCE_BYTES};
