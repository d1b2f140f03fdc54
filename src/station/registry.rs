//! Ordered, index-stable station registry.

use std::collections::HashMap;
use std::path::Path;

use log::info;

use super::types::Station;
use crate::error::{Result, RouteError};

/// An immutable, ordered list of stations.
///
/// Iteration order fixes the dense index (`0..len`) used by the distance
/// matrix and the tour. Ids must be unique; lookups in both directions
/// (`index -> station`, `id -> index`) are supported.
#[derive(Debug, Clone)]
pub struct StationRegistry {
    stations: Vec<Station>,
    index_by_id: HashMap<u32, usize>,
}

impl StationRegistry {
    /// Builds a registry from an already-ordered station list.
    ///
    /// Fails with [`RouteError::Config`] on an out-of-range coordinate and
    /// [`RouteError::DataMismatch`] on a duplicate id.
    pub fn new(stations: Vec<Station>) -> Result<Self> {
        let mut index_by_id = HashMap::with_capacity(stations.len());
        for (index, station) in stations.iter().enumerate() {
            station.validate().map_err(RouteError::Config)?;
            if index_by_id.insert(station.id, index).is_some() {
                return Err(RouteError::DataMismatch(format!(
                    "duplicate station id {} in station table",
                    station.id
                )));
            }
        }
        Ok(Self {
            stations,
            index_by_id,
        })
    }

    /// Loads the station table (columns `id, name, lat, lng`) from CSV.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)?;
        let mut stations = Vec::new();
        for record in reader.deserialize() {
            let station: Station = record?;
            stations.push(station);
        }
        info!("loaded {} stations from {}", stations.len(), path.display());
        Self::new(stations)
    }

    /// Returns a registry truncated to the first `max` stations, keeping
    /// the original order. A limit of `None` or one at or above the current
    /// size returns the registry unchanged.
    pub fn limited(self, max: Option<usize>) -> Self {
        match max {
            Some(limit) if limit < self.stations.len() => {
                let mut stations = self.stations;
                stations.truncate(limit);
                // Ids were unique in the full set, so this cannot fail.
                Self::new(stations).unwrap()
            }
            _ => self,
        }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// The station at dense index `index`.
    pub fn get(&self, index: usize) -> Option<&Station> {
        self.stations.get(index)
    }

    /// Dense index of the station with the given id.
    pub fn index_of(&self, id: u32) -> Option<usize> {
        self.index_by_id.get(&id).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Station> {
        self.stations.iter()
    }

    /// Station ids in iteration order.
    pub fn ids(&self) -> Vec<u32> {
        self.stations.iter().map(|s| s.id).collect()
    }
}
