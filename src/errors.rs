//! Unified error types for the analytics backend.
//!
//! Every fallible operation in the crate returns [`Result`]. The variants map onto the
//! categories an HTTP caller can act on: bad query parameters, storage failures,
//! missing resources, and a missing user identity.

use thiserror::Error;

/// All errors produced by the analytics engine, its repositories, and the HTTP layer.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or out-of-bounds date/window parameters. Never retried.
    #[error("Invalid range: {message}")]
    InvalidRange {
        /// Human-readable description of what was wrong with the parameters
        message: String,
    },

    /// Underlying storage failure. The whole request fails; no partial results.
    #[error("Repository error: {0}")]
    Repository(#[from] sea_orm::DbErr),

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity that was looked up
        entity: &'static str,
        /// Identifier (or path) that failed to resolve
        id: String,
    },

    /// The request carried no authenticated user identity.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Why the identity was rejected
        message: String,
    },

    /// Invalid or unreadable application configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// Binding or serving the HTTP listener failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for building an [`Error::InvalidRange`].
    pub fn invalid_range(message: impl Into<String>) -> Self {
        Self::InvalidRange {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
