//! Common error types used throughout mediascore.
//!
//! This module provides a unified error type that covers unavailable stores,
//! database failures, I/O and invalid input.

/// Common error type for mediascore.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The cache store could not be opened; lookups and writes are skipped.
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a new CacheUnavailable error.
    pub fn cache_unavailable<S: Into<String>>(msg: S) -> Self {
        Self::CacheUnavailable(msg.into())
    }

    /// Create a new Database error.
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Returns `true` for the degraded no-cache condition.
    pub fn is_cache_unavailable(&self) -> bool {
        matches!(self, Self::CacheUnavailable(_))
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
