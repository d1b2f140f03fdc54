//! Single-slot route persistence and warm-start derivation.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use log::{info, warn};

use super::formatter::{AnnotatedRoute, RouteStop};
use crate::error::Result;
use crate::solver::Tour;
use crate::station::StationRegistry;

/// A single-slot persistent cache for the newest annotated route.
///
/// `load` returns the previously persisted route if one exists; `save`
/// replaces it. Failures while persisting are fatal to the run: a
/// partially written route file would corrupt the next run's warm-start
/// read.
pub trait RouteRepository {
    fn load(&self) -> Result<Option<AnnotatedRoute>>;
    fn save(&self, route: &AnnotatedRoute) -> Result<()>;
}

/// File-backed repository using the annotated-route CSV table.
#[derive(Debug, Clone)]
pub struct CsvRouteRepository {
    path: PathBuf,
}

impl CsvRouteRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RouteRepository for CsvRouteRepository {
    fn load(&self) -> Result<Option<AnnotatedRoute>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut stops = Vec::new();
        for record in reader.deserialize() {
            let stop: RouteStop = record?;
            stops.push(stop);
        }
        info!(
            "loaded prior route with {} stops from {}",
            stops.len(),
            self.path.display()
        );
        Ok(Some(AnnotatedRoute { stops }))
    }

    fn save(&self, route: &AnnotatedRoute) -> Result<()> {
        let mut writer = csv::Writer::from_path(&self.path)?;
        for stop in &route.stops {
            writer.serialize(stop)?;
        }
        writer.flush()?;
        info!(
            "persisted route with {} stops ({:.3} km) to {}",
            route.stops.len(),
            route.total_km(),
            self.path.display()
        );
        Ok(())
    }
}

/// In-memory stand-in for tests.
#[derive(Debug, Default)]
pub struct InMemoryRouteRepository {
    slot: RefCell<Option<AnnotatedRoute>>,
}

impl InMemoryRouteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates the slot, as if a prior run had persisted `route`.
    pub fn seeded(route: AnnotatedRoute) -> Self {
        Self {
            slot: RefCell::new(Some(route)),
        }
    }
}

impl RouteRepository for InMemoryRouteRepository {
    fn load(&self) -> Result<Option<AnnotatedRoute>> {
        Ok(self.slot.borrow().clone())
    }

    fn save(&self, route: &AnnotatedRoute) -> Result<()> {
        *self.slot.borrow_mut() = Some(route.clone());
        Ok(())
    }
}

/// Derives a warm-start seed tour from a previously persisted route.
///
/// Valid only when the route's stop count equals the current station count
/// and every station id still resolves; otherwise the seed is discarded
/// and `None` is returned (the optimizer then falls back to its generated
/// initial tour).
pub fn warm_start_seed(route: &AnnotatedRoute, registry: &StationRegistry) -> Option<Tour> {
    if route.stops.len() != registry.len() {
        warn!(
            "prior route has {} stops but registry has {}; ignoring warm start",
            route.stops.len(),
            registry.len()
        );
        return None;
    }

    let mut indices = Vec::with_capacity(route.stops.len());
    for stop in &route.stops {
        match registry.index_of(stop.station_id) {
            Some(index) => indices.push(index),
            None => {
                warn!(
                    "prior route references unknown station id {}; ignoring warm start",
                    stop.station_id
                );
                return None;
            }
        }
    }

    match Tour::from_indices(indices) {
        Ok(tour) => Some(tour),
        Err(reason) => {
            warn!("prior route is not a valid tour ({reason}); ignoring warm start");
            None
        }
    }
}
