//! Annotated routes and their persistence.
//!
//! [`format_route`] converts an index-sequence tour into an ordered,
//! human/consumer-facing stop list with per-leg and cumulative distances.
//! A [`RouteRepository`] is the single-slot persistent cache behind the
//! warm-start loop: the newest route replaces the prior one, and the next
//! run derives its seed tour from it via [`warm_start_seed`].

mod formatter;
mod repository;

pub use formatter::{format_route, AnnotatedRoute, RouteStop};
pub use repository::{warm_start_seed, CsvRouteRepository, InMemoryRouteRepository, RouteRepository};
