//! Geometric (haversine) matrix construction.

use log::debug;

use super::types::DistanceMatrix;
use crate::geo::haversine_km;
use crate::station::StationRegistry;

/// Builds the great-circle distance matrix over the registry.
///
/// Each unordered pair is computed once and mirrored into both triangles,
/// so the result is symmetric with a zero diagonal by construction.
pub fn haversine_matrix(registry: &StationRegistry) -> DistanceMatrix {
    let n = registry.len();
    let mut matrix = DistanceMatrix::zeroed(n);

    for i in 0..n {
        let a = registry.get(i).unwrap();
        for j in (i + 1)..n {
            let b = registry.get(j).unwrap();
            let d = haversine_km(a.lat, a.lng, b.lat, b.lng);
            matrix.set(i, j, d);
            matrix.set(j, i, d);
        }
    }

    debug!("built {n}x{n} haversine matrix");
    matrix
}
