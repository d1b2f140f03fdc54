//! Route-optimization engine for station networks.
//!
//! Computes a near-optimal cyclic visiting order ("tour") over a fixed set
//! of geographically located stations, minimizing total travel cost, and
//! re-derives that cost across repeated runs as data or parameters change.
//!
//! # Components
//!
//! - [`station`]: the immutable, ordered station registry whose iteration
//!   order fixes the integer index used everywhere else.
//! - [`matrix`]: N×N travel-cost matrices, geometric (haversine) or
//!   network-derived via a routing service, with resumable persistence and
//!   fail-fast id validation.
//! - [`solver`]: the heuristic tour solver, simulated annealing and
//!   iterated local search over 2-opt neighborhoods, seedable for
//!   reproducibility.
//! - [`route`]: annotated-route formatting and the single-slot repository
//!   behind the warm-start loop.
//! - [`planner`]: per-run configuration and the pipeline tying the
//!   components together.
//!
//! # Architecture
//!
//! Execution is single-threaded and synchronous per run. The optimizer is
//! pure computation; all I/O lives at the edges (station table in, matrix
//! store and route file in/out, routing service during matrix builds).
//! Each run persists its formatted route so the next run can seed from it
//! instead of starting cold.

pub mod error;
pub mod geo;
pub mod matrix;
pub mod planner;
pub mod route;
pub mod solver;
pub mod station;

pub use error::{Result, RouteError};
