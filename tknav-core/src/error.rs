//! Error types for tknav-core.

use thiserror::Error;

/// Result type alias for geometry construction.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for geometry construction.
#[derive(Error, Debug)]
pub enum Error {
    /// A detector collection that must not be empty was empty.
    #[error("empty detector collection: {0}")]
    EmptyCollection(&'static str),

    /// A computed geometric quantity was not finite.
    #[error("non-finite geometry value: {0}")]
    NonFinite(&'static str),
}
