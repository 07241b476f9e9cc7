#![forbid(unsafe_code)]
//! tripwire-mem: concrete circuit breakers.
//!
//! This crate provides the ledger behind the `CircuitBreaker` interface defined
//! in `tripwire-core::breaker`. Every tracked collection reports into one of
//! these; many collections may share a single breaker.

pub mod breaker;

pub use breaker::MemoryBreaker;
