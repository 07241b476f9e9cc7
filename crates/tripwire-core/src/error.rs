use thiserror::Error;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

/// Raised by a [`CircuitBreaker`](crate::breaker::CircuitBreaker) when the
/// cumulative reservation exceeds its limit.
///
/// This is an expected, recoverable condition under load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{breaker}] data for [{label}] would be [{would_be}] bytes, which is larger than the limit of [{limit}] bytes (requested {requested})")]
pub struct LimitExceeded {
    pub breaker: String,
    pub label: String,
    pub requested: i64,
    pub would_be: i64,
    pub limit: i64,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    LimitExceeded(#[from] LimitExceeded),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}
