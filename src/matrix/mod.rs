//! Travel-cost matrices.
//!
//! Two interchangeable sources produce an N×N [`DistanceMatrix`] in
//! kilometers over the current station set:
//!
//! - **Geometric** ([`haversine_matrix`]): great-circle distance per
//!   unordered pair; symmetric by construction, zero diagonal.
//! - **Network-derived** ([`NetworkMatrixBuilder`]): travel distance (or
//!   duration) along a real network, queried pair-by-pair from a routing
//!   service and persisted row-by-row to a [`MatrixStore`] so a long build
//!   can be resumed. May be asymmetric.
//!
//! A persisted matrix is keyed by station ids; [`MatrixStore::load`]
//! validates the header against the current registry and fails fast on any
//! disagreement rather than silently re-indexing.

mod geometric;
mod network;
mod store;
mod types;

pub use geometric::haversine_matrix;
pub use network::{Metric, NetworkMatrixBuilder, OsrmClient, RetryPolicy, RouteLeg, RoutingApi};
pub use store::MatrixStore;
pub use types::DistanceMatrix;
