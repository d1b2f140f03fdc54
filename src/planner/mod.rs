//! Per-run configuration and the run pipeline.
//!
//! One run is: load the station registry, obtain a distance matrix
//! (geometric or persisted network-derived), derive a warm-start seed from
//! the previously persisted route, optimize, format, and persist the new
//! route. The persisted route becomes the next run's seed, closing an
//! implicit loop of iterative refinement across invocations.

use std::path::PathBuf;

use log::info;

use crate::error::Result;
use crate::matrix::{haversine_matrix, DistanceMatrix, MatrixStore};
use crate::route::{
    format_route, warm_start_seed, AnnotatedRoute, CsvRouteRepository, RouteRepository,
};
use crate::solver::{Strategy, TourOptimizer};
use crate::station::StationRegistry;

/// Where the travel-cost matrix comes from.
#[derive(Debug, Clone)]
pub enum MatrixSource {
    /// Compute great-circle distances from station coordinates.
    Geometric,
    /// Load a network-derived matrix previously built into this file.
    PersistedNetwork { path: PathBuf },
}

/// Everything one run needs, constructed once and passed down; there is
/// no process-wide mutable state.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Station table (columns `id, name, lat, lng`).
    pub stations_path: PathBuf,
    /// Single-slot route file read for the seed and replaced at the end.
    pub route_path: PathBuf,
    pub matrix_source: MatrixSource,
    pub strategy: Strategy,
    /// Truncate the registry to the first N stations.
    pub max_stations: Option<usize>,
    /// Whether to seed the optimizer from the persisted route.
    pub warm_start: bool,
}

impl RunConfig {
    pub fn new(stations_path: impl Into<PathBuf>, route_path: impl Into<PathBuf>) -> Self {
        Self {
            stations_path: stations_path.into(),
            route_path: route_path.into(),
            matrix_source: MatrixSource::Geometric,
            strategy: Strategy::default(),
            max_stations: None,
            warm_start: true,
        }
    }

    pub fn with_matrix_source(mut self, source: MatrixSource) -> Self {
        self.matrix_source = source;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_stations(mut self, max: usize) -> Self {
        self.max_stations = Some(max);
        self
    }

    pub fn with_warm_start(mut self, enabled: bool) -> Self {
        self.warm_start = enabled;
        self
    }
}

/// Outcome of one run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Stations actually routed (after any `max_stations` truncation).
    pub stations: usize,
    /// Optimized tour cost under the configured matrix.
    pub cost: f64,
    /// Whether a prior route seeded this run.
    pub seeded: bool,
    /// The newly persisted route.
    pub route: AnnotatedRoute,
}

/// Executes runs against a [`RunConfig`].
pub struct Planner {
    config: RunConfig,
}

impl Planner {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Runs once against the file-backed route repository at the
    /// configured path.
    pub fn run(&self) -> Result<RunReport> {
        let repository = CsvRouteRepository::new(&self.config.route_path);
        self.run_with_repository(&repository)
    }

    /// Runs once against any repository (tests use the in-memory one).
    pub fn run_with_repository<R: RouteRepository>(&self, repository: &R) -> Result<RunReport> {
        let registry = StationRegistry::from_csv_path(&self.config.stations_path)?
            .limited(self.config.max_stations);
        let matrix = self.load_matrix(&registry)?;

        let seed = if self.config.warm_start {
            repository
                .load()?
                .and_then(|prior| warm_start_seed(&prior, &registry))
        } else {
            None
        };
        let seeded = seed.is_some();

        let solution = TourOptimizer::optimize(&matrix, seed, &self.config.strategy)?;
        let route = format_route(&registry, &solution.tour);
        repository.save(&route)?;

        info!(
            "run complete: {} stations, cost {:.3}, seeded: {seeded}",
            registry.len(),
            solution.cost
        );
        Ok(RunReport {
            stations: registry.len(),
            cost: solution.cost,
            seeded,
            route,
        })
    }

    fn load_matrix(&self, registry: &StationRegistry) -> Result<DistanceMatrix> {
        match &self.config.matrix_source {
            MatrixSource::Geometric => Ok(haversine_matrix(registry)),
            MatrixSource::PersistedNetwork { path } => MatrixStore::new(path).load(registry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RouteError;
    use crate::geo::haversine_km;
    use crate::route::InMemoryRouteRepository;
    use crate::solver::{IlsParams, SaParams};
    use crate::station::Station;
    use std::path::Path;

    /// Four stations on a small square; the perimeter walk is the exact
    /// optimum, and all 4-node tours are enumerable.
    fn square_stations() -> Vec<Station> {
        vec![
            Station::new(1, "A", 42.00, -71.00),
            Station::new(2, "B", 42.01, -71.00),
            Station::new(3, "C", 42.01, -71.01),
            Station::new(4, "D", 42.00, -71.01),
        ]
    }

    fn write_stations(path: &Path, stations: &[Station]) {
        let mut writer = csv::Writer::from_path(path).unwrap();
        for station in stations {
            writer.serialize(station).unwrap();
        }
        writer.flush().unwrap();
    }

    fn square_perimeter(stations: &[Station]) -> f64 {
        (0..4)
            .map(|k| {
                let a = &stations[k];
                let b = &stations[(k + 1) % 4];
                haversine_km(a.lat, a.lng, b.lat, b.lng)
            })
            .sum()
    }

    fn strategies() -> Vec<Strategy> {
        vec![
            Strategy::SimulatedAnnealing(SaParams::default().with_seed(42)),
            Strategy::IteratedLocalSearch(IlsParams::default().with_seed(42)),
        ]
    }

    #[test]
    fn test_square_run_reaches_perimeter_optimum() {
        let dir = tempfile::tempdir().unwrap();
        let stations = square_stations();
        let stations_path = dir.path().join("stations.csv");
        write_stations(&stations_path, &stations);
        let perimeter = square_perimeter(&stations);

        for strategy in strategies() {
            let config = RunConfig::new(&stations_path, dir.path().join("route.csv"))
                .with_strategy(strategy);
            let report = Planner::new(config).run_with_repository(&InMemoryRouteRepository::new()).unwrap();

            assert_eq!(report.stations, 4);
            assert!(
                (report.cost - perimeter).abs() < 1e-6,
                "expected perimeter {perimeter}, got {}",
                report.cost
            );
        }
    }

    #[test]
    fn test_route_persisted_and_reused_as_seed() {
        let dir = tempfile::tempdir().unwrap();
        let stations_path = dir.path().join("stations.csv");
        write_stations(&stations_path, &square_stations());

        let config = RunConfig::new(&stations_path, dir.path().join("route.csv"))
            .with_strategy(Strategy::SimulatedAnnealing(SaParams::default().with_seed(7)));
        let planner = Planner::new(config);

        let first = planner.run().unwrap();
        assert!(!first.seeded);
        assert!(dir.path().join("route.csv").exists());

        // Second run on unchanged data and parameters: seeded, and never
        // worse than the first.
        let second = planner.run().unwrap();
        assert!(second.seeded);
        assert!(second.cost <= first.cost + 1e-9);
    }

    #[test]
    fn test_warm_start_disabled_ignores_prior_route() {
        let dir = tempfile::tempdir().unwrap();
        let stations_path = dir.path().join("stations.csv");
        write_stations(&stations_path, &square_stations());

        let config = RunConfig::new(&stations_path, dir.path().join("route.csv"))
            .with_warm_start(false);
        let planner = Planner::new(config);

        planner.run().unwrap();
        let second = planner.run().unwrap();
        assert!(!second.seeded);
    }

    #[test]
    fn test_stale_route_discarded_when_station_set_grows() {
        // A 2-stop prior route against 4 current stations: not seeded,
        // no panic, full-length result.
        let dir = tempfile::tempdir().unwrap();
        let stations = square_stations();
        let stations_path = dir.path().join("stations.csv");
        let route_path = dir.path().join("route.csv");

        write_stations(&stations_path, &stations[..2]);
        let config = RunConfig::new(&stations_path, &route_path);
        Planner::new(config.clone()).run().unwrap();

        write_stations(&stations_path, &stations);
        let report = Planner::new(config).run().unwrap();
        assert!(!report.seeded);
        assert_eq!(report.route.stops.len(), 4);
    }

    #[test]
    fn test_max_stations_truncates_run() {
        let dir = tempfile::tempdir().unwrap();
        let stations_path = dir.path().join("stations.csv");
        write_stations(&stations_path, &square_stations());

        let config = RunConfig::new(&stations_path, dir.path().join("route.csv"))
            .with_max_stations(3);
        let report = Planner::new(config).run_with_repository(&InMemoryRouteRepository::new()).unwrap();
        assert_eq!(report.stations, 3);
        assert_eq!(report.route.station_ids().len(), 3);
    }

    #[test]
    fn test_persisted_network_matrix_source() {
        let dir = tempfile::tempdir().unwrap();
        let stations = square_stations();
        let stations_path = dir.path().join("stations.csv");
        write_stations(&stations_path, &stations);
        let matrix_path = dir.path().join("distance_matrix.csv");

        // Persist a matrix (meters) keyed by the same station ids.
        let registry = StationRegistry::new(stations.clone()).unwrap();
        let geometric = haversine_matrix(&registry);
        let store = MatrixStore::new(&matrix_path);
        let mut appender = store.appender(&registry).unwrap();
        for i in 0..4 {
            let row: Vec<Option<f64>> =
                (0..4).map(|j| Some(geometric.get(i, j) * 1000.0)).collect();
            appender.append_row(stations[i].id, &row).unwrap();
        }
        drop(appender);

        let config = RunConfig::new(&stations_path, dir.path().join("route.csv"))
            .with_matrix_source(MatrixSource::PersistedNetwork { path: matrix_path });
        let report = Planner::new(config).run_with_repository(&InMemoryRouteRepository::new()).unwrap();
        assert!((report.cost - square_perimeter(&stations)).abs() < 1e-6);
    }

    #[test]
    fn test_mismatched_matrix_file_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let stations = square_stations();
        let stations_path = dir.path().join("stations.csv");
        write_stations(&stations_path, &stations);
        let matrix_path = dir.path().join("distance_matrix.csv");

        // Persist under different station ids.
        let other = StationRegistry::new(vec![
            Station::new(8, "X", 42.0, -71.0),
            Station::new(9, "Y", 42.1, -71.1),
            Station::new(10, "Z", 42.2, -71.2),
            Station::new(11, "W", 42.3, -71.3),
        ])
        .unwrap();
        let mut appender = MatrixStore::new(&matrix_path).appender(&other).unwrap();
        appender
            .append_row(8, &[Some(0.0), Some(1.0), Some(2.0), Some(3.0)])
            .unwrap();
        drop(appender);

        let config = RunConfig::new(&stations_path, dir.path().join("route.csv"))
            .with_matrix_source(MatrixSource::PersistedNetwork { path: matrix_path });
        let err = Planner::new(config)
            .run_with_repository(&InMemoryRouteRepository::new())
            .unwrap_err();
        assert!(matches!(err, RouteError::DataMismatch(_)), "{err}");
    }

    #[test]
    fn test_missing_station_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig::new(dir.path().join("absent.csv"), dir.path().join("route.csv"));
        let err = Planner::new(config)
            .run_with_repository(&InMemoryRouteRepository::new())
            .unwrap_err();
        assert!(matches!(err, RouteError::Csv(_) | RouteError::Io(_)), "{err}");
    }
}
