//! Error types for bpindex.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the public tree operations.
///
/// Lookups never fail: a missing key is reported as `None`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid degree {degree}, accepted range is from {min} to {max}")]
    Configuration { degree: usize, min: usize, max: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),
}
