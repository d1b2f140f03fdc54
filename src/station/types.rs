//! Station value type.

use serde::{Deserialize, Serialize};

/// A fixed, geographically located station.
///
/// `id` is unique and stable across runs; persisted matrix and route
/// files are keyed by it. `lat`/`lng` are decimal degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: u32,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl Station {
    pub fn new(id: u32, name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id,
            name: name.into(),
            lat,
            lng,
        }
    }

    /// Checks coordinate ranges: lat in [-90, 90], lng in [-180, 180].
    pub fn validate(&self) -> Result<(), String> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(format!("station {} has invalid latitude {}", self.id, self.lat));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(format!(
                "station {} has invalid longitude {}",
                self.id, self.lng
            ));
        }
        Ok(())
    }
}
