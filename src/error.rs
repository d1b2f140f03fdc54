//! Crate-wide error taxonomy.
//!
//! Four failure classes with distinct propagation policies:
//!
//! - [`RouteError::Config`]: invalid strategy parameters or a distance
//!   matrix failing validation; raised before any optimization work begins.
//! - [`RouteError::DataMismatch`]: a persisted matrix or route file
//!   disagrees with the current station set; fails fast rather than
//!   silently misaligning indices.
//! - [`RouteError::ExternalService`]: a routing-service request exhausted
//!   its retry budget. Inside a matrix build this degrades to a per-entry
//!   "unavailable" marker; it only surfaces as an error when no entry could
//!   be computed at all.
//! - [`RouteError::Io`] / [`RouteError::Csv`]: a required file is missing,
//!   unreadable, or unwritable; fatal and surfaced to the caller.

use thiserror::Error;

/// Errors produced by the route-optimization pipeline.
#[derive(Debug, Error)]
pub enum RouteError {
    /// Invalid strategy parameters, or a matrix that is not square,
    /// finite, and non-negative.
    #[error("configuration error: {0}")]
    Config(String),

    /// A persisted file's ids or shape disagree with the current
    /// station registry.
    #[error("data mismatch: {0}")]
    DataMismatch(String),

    /// The routing service could not be reached within the retry budget.
    #[error("routing service failed after {attempts} attempts: {url}")]
    ExternalService { url: String, attempts: u32 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RouteError>;
