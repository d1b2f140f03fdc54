//! Station catalog.
//!
//! A [`Station`] is an immutable geographic point with a stable integer id.
//! The [`StationRegistry`] loads an ordered list of stations and assigns
//! each a dense index (its position in iteration order); that index is the
//! coordinate system shared by the distance matrix and the tour.

mod registry;
mod types;

pub use registry::StationRegistry;
pub use types::Station;
