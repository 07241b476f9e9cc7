//! Breaker and collection-sizing configuration that callers can
//! serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Load factor used by hash-backed wrappers when none is given.
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakerConfig {
    /// Limit in bytes. The breaker trips once reservations exceed this.
    pub limit_bytes: i64,

    /// Name reported in trip errors and traces.
    pub name: String,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            limit_bytes: 512 * 1024 * 1024, // 512 MiB default
            name: "request".to_string(),
        }
    }
}

impl BreakerConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `TRIPWIRE_BREAKER_LIMIT_BYTES`: limit in bytes
    /// - `TRIPWIRE_BREAKER_NAME`: breaker name
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("TRIPWIRE_BREAKER_LIMIT_BYTES") {
            if let Ok(v) = s.parse::<i64>() {
                cfg.limit_bytes = v;
            }
        }

        if let Ok(s) = std::env::var("TRIPWIRE_BREAKER_NAME") {
            cfg.name = s;
        }

        cfg
    }
}

/// Raw construction hints for a wrapper, as they arrive from callers or files.
///
/// Capacity is signed on purpose: a negative value is a configuration error
/// rather than something the type system silently wraps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SizingConfig {
    pub initial_capacity: Option<i64>,
    pub load_factor: Option<f32>,
}

/// Checked construction hints. Only produced by [`SizingConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sizing {
    pub initial_capacity: Option<usize>,
    pub load_factor: f32,
}

impl Default for Sizing {
    fn default() -> Self {
        Self {
            initial_capacity: None,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl SizingConfig {
    /// Environment variables:
    /// - `TRIPWIRE_INITIAL_CAPACITY`: initial capacity hint
    /// - `TRIPWIRE_LOAD_FACTOR`: hash load factor
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("TRIPWIRE_INITIAL_CAPACITY") {
            if let Ok(v) = s.parse::<i64>() {
                cfg.initial_capacity = Some(v);
            }
        }

        if let Ok(s) = std::env::var("TRIPWIRE_LOAD_FACTOR") {
            if let Ok(v) = s.parse::<f32>() {
                cfg.load_factor = Some(v);
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<Sizing> {
        let initial_capacity = match self.initial_capacity {
            Some(c) if c < 0 => {
                return Err(Error::Config(format!("illegal initial capacity: {c}")));
            }
            Some(c) => Some(usize::try_from(c).unwrap_or(usize::MAX)),
            None => None,
        };
        let load_factor = validate_load_factor(self.load_factor.unwrap_or(DEFAULT_LOAD_FACTOR))?;
        Ok(Sizing {
            initial_capacity,
            load_factor,
        })
    }
}

/// Reject NaN, infinite, and non-positive load factors.
pub fn validate_load_factor(load_factor: f32) -> Result<f32> {
    if load_factor.is_nan() || !load_factor.is_finite() || load_factor <= 0.0 {
        return Err(Error::Config(format!("illegal load factor: {load_factor}")));
    }
    Ok(load_factor)
}
