use thiserror::Error;

use tripwire_core::error::LimitExceeded;

/// Result type local to tripwire-collections.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The breaker tripped. The mutation that caused it has already happened
    /// and its bytes remain reserved.
    #[error(transparent)]
    LimitExceeded(#[from] LimitExceeded),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}

impl Error {
    pub fn is_limit_exceeded(&self) -> bool {
        matches!(self, Error::LimitExceeded(_))
    }
}

impl From<tripwire_core::Error> for Error {
    fn from(e: tripwire_core::Error) -> Self {
        match e {
            tripwire_core::Error::LimitExceeded(l) => Error::LimitExceeded(l),
            tripwire_core::Error::Config(msg) => Error::Config(msg),
        }
    }
}
