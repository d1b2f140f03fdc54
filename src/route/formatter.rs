//! Tour-to-route formatting.

use serde::{Deserialize, Serialize};

use crate::geo::haversine_km;
use crate::solver::Tour;
use crate::station::StationRegistry;

/// One stop of an annotated route. Field order matches the persisted CSV
/// columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    pub stop_number: u32,
    pub station_id: u32,
    pub station_name: String,
    pub lat: f64,
    pub lng: f64,
    pub distance_to_next_km: f64,
    pub cumulative_distance_km: f64,
}

/// An ordered stop list with per-leg and cumulative distances.
///
/// Open-path display convention: the last stop's `distance_to_next_km` is
/// 0.0; the closing leg back to the first stop is not shown. Cumulative
/// distance is non-decreasing across stops.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnnotatedRoute {
    pub stops: Vec<RouteStop>,
}

impl AnnotatedRoute {
    /// Station ids in visiting order.
    pub fn station_ids(&self) -> Vec<u32> {
        self.stops.iter().map(|s| s.station_id).collect()
    }

    /// Displayed length: the last stop's cumulative distance.
    pub fn total_km(&self) -> f64 {
        self.stops
            .last()
            .map(|s| s.cumulative_distance_km)
            .unwrap_or(0.0)
    }
}

/// Rounds to three decimal places for display.
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Annotates `tour` over `registry` with haversine leg distances.
///
/// The displayed metric is always great-circle distance, independent of
/// whichever metric the optimizer minimized. Rounding applies to the
/// displayed values only; cumulative
/// distance accumulates unrounded legs.
///
/// # Panics
///
/// Panics if any tour index is out of range for the registry; a `Tour` is
/// only ever produced against a matrix of the registry's dimension.
pub fn format_route(registry: &StationRegistry, tour: &Tour) -> AnnotatedRoute {
    let indices = tour.as_slice();
    let mut stops = Vec::with_capacity(indices.len());
    let mut cumulative = 0.0f64;

    for (position, &index) in indices.iter().enumerate() {
        let station = registry.get(index).expect("tour index within registry");

        let distance_to_next = match indices.get(position + 1) {
            Some(&next) => {
                let next = registry.get(next).expect("tour index within registry");
                haversine_km(station.lat, station.lng, next.lat, next.lng)
            }
            None => 0.0,
        };

        stops.push(RouteStop {
            stop_number: position as u32 + 1,
            station_id: station.id,
            station_name: station.name.clone(),
            lat: station.lat,
            lng: station.lng,
            distance_to_next_km: round3(distance_to_next),
            cumulative_distance_km: round3(cumulative),
        });

        cumulative += distance_to_next;
    }

    AnnotatedRoute { stops }
}
