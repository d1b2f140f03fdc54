//! Heuristic tour solver.
//!
//! Consumes a [`DistanceMatrix`](crate::matrix::DistanceMatrix) and an
//! optional warm-start seed, returns an improved [`Tour`] and its cost.
//! Two pluggable strategies:
//!
//! - **Simulated annealing**: Metropolis-accepted 2-opt moves under a
//!   geometrically cooling temperature.
//! - **Iterated local search**: 2-opt descent alternated with a
//!   configurable perturbation kick (segment reversal or double bridge).
//!
//! Both are stochastic but seedable, so runs are reproducible under test.
//! The optimizer is pure, synchronous, CPU-bound computation: no I/O and
//! no suspension points.

mod config;
mod ils;
mod local_search;
mod sa;
mod tour;

pub use config::{IlsParams, PerturbationScheme, SaParams, Strategy};
pub use tour::Tour;

use log::{info, warn};

use crate::error::{Result, RouteError};
use crate::matrix::DistanceMatrix;

/// Result of an optimization run.
#[derive(Debug, Clone)]
pub struct TourSolution {
    /// The best tour found.
    pub tour: Tour,
    /// Its total cycle cost under the optimized matrix.
    pub cost: f64,
    /// Neighbor evaluations (SA) or kicks (ILS) performed.
    pub iterations: usize,
}

/// Entry point for tour optimization.
pub struct TourOptimizer;

impl TourOptimizer {
    /// Optimizes a tour over `matrix` with the given strategy.
    ///
    /// A `seed` tour whose length differs from the matrix dimension is
    /// discarded with a warning; the run then starts from a greedy
    /// nearest-neighbor tour. Strategy parameters and the matrix (square,
    /// finite, non-negative, zero diagonal) are validated up front;
    /// a violation is a [`RouteError::Config`] raised before any search
    /// work begins.
    pub fn optimize(
        matrix: &DistanceMatrix,
        seed: Option<Tour>,
        strategy: &Strategy,
    ) -> Result<TourSolution> {
        strategy.validate().map_err(RouteError::Config)?;
        matrix.validate().map_err(RouteError::Config)?;

        let n = matrix.dim();
        if n <= 1 {
            return Ok(TourSolution {
                tour: Tour::identity(n),
                cost: 0.0,
                iterations: 0,
            });
        }

        let initial = match seed {
            Some(tour) if tour.len() == n => {
                info!("warm-starting {} from seed tour", strategy.name());
                tour
            }
            Some(tour) => {
                warn!(
                    "discarding warm-start seed of length {} for {} stations",
                    tour.len(),
                    n
                );
                Tour::nearest_neighbor(matrix)
            }
            None => Tour::nearest_neighbor(matrix),
        };

        let solution = match strategy {
            Strategy::SimulatedAnnealing(params) => sa::SaSolver::run(matrix, initial, params),
            Strategy::IteratedLocalSearch(params) => ils::IlsSolver::run(matrix, initial, params),
        };
        info!(
            "{} finished: cost {:.3} after {} iterations",
            strategy.name(),
            solution.cost,
            solution.iterations
        );
        Ok(solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use super::Strategy;

    fn euclidean_matrix(points: &[(f64, f64)]) -> DistanceMatrix {
        let n = points.len();
        let mut m = DistanceMatrix::zeroed(n);
        for i in 0..n {
            for j in 0..n {
                let (xi, yi) = points[i];
                let (xj, yj) = points[j];
                m.set(i, j, ((xi - xj).powi(2) + (yi - yj).powi(2)).sqrt());
            }
        }
        m
    }

    fn strategies() -> Vec<Strategy> {
        vec![
            Strategy::SimulatedAnnealing(SaParams::default().with_seed(42)),
            Strategy::IteratedLocalSearch(IlsParams::default().with_seed(42)),
            Strategy::IteratedLocalSearch(
                IlsParams::default()
                    .with_perturbation(PerturbationScheme::SegmentReversal)
                    .with_seed(42),
            ),
        ]
    }

    #[test]
    fn test_empty_instance() {
        let m = DistanceMatrix::zeroed(0);
        for strategy in strategies() {
            let result = TourOptimizer::optimize(&m, None, &strategy).unwrap();
            assert!(result.tour.is_empty());
            assert_eq!(result.cost, 0.0);
        }
    }

    #[test]
    fn test_single_station() {
        let m = DistanceMatrix::zeroed(1);
        for strategy in strategies() {
            let result = TourOptimizer::optimize(&m, None, &strategy).unwrap();
            assert_eq!(result.tour.as_slice(), &[0]);
            assert_eq!(result.cost, 0.0);
        }
    }

    #[test]
    fn test_invalid_matrix_is_config_error() {
        let mut m = DistanceMatrix::zeroed(3);
        m.set(0, 1, f64::NAN);
        let err = TourOptimizer::optimize(&m, None, &Strategy::default()).unwrap_err();
        assert!(matches!(err, RouteError::Config(_)));
    }

    #[test]
    fn test_invalid_params_rejected_before_search() {
        let m = DistanceMatrix::zeroed(3);
        let bad = Strategy::SimulatedAnnealing(SaParams::default().with_cooling_rate(1.5));
        let err = TourOptimizer::optimize(&m, None, &bad).unwrap_err();
        assert!(matches!(err, RouteError::Config(_)));
    }

    #[test]
    fn test_mismatched_seed_discarded_safely() {
        // A 5-stop seed against a 7-station matrix: no panic, no
        // truncation, fall back to a generated initial tour.
        let points: Vec<(f64, f64)> = (0..7).map(|k| (k as f64, (k * k) as f64 * 0.1)).collect();
        let m = euclidean_matrix(&points);
        let stale_seed = Tour::identity(5);

        for strategy in strategies() {
            let result = TourOptimizer::optimize(&m, Some(stale_seed.clone()), &strategy).unwrap();
            assert_eq!(result.tour.len(), 7);
            assert!(Tour::from_indices(result.tour.as_slice().to_vec()).is_ok());
        }
    }

    #[test]
    fn test_warm_start_non_regression() {
        // Re-running seeded with the prior output on an unchanged matrix
        // and unchanged parameters never worsens the cost.
        let points: Vec<(f64, f64)> = (0..15)
            .map(|k| {
                let a = 2.0 * std::f64::consts::PI * (k as f64) * 0.618;
                (a.cos() * (1.0 + 0.1 * k as f64), a.sin() * (1.0 + 0.1 * k as f64))
            })
            .collect();
        let m = euclidean_matrix(&points);

        for strategy in strategies() {
            let first = TourOptimizer::optimize(&m, None, &strategy).unwrap();
            let second =
                TourOptimizer::optimize(&m, Some(first.tour.clone()), &strategy).unwrap();
            assert!(
                second.cost <= first.cost + 1e-9,
                "{} regressed: {} -> {}",
                strategy.name(),
                first.cost,
                second.cost
            );
        }
    }

    #[test]
    fn test_four_station_square_reaches_known_optimum() {
        // All distinct tours of a 4-node complete graph are enumerable;
        // the perimeter walk is the exact optimum.
        let m = euclidean_matrix(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        for strategy in strategies() {
            let result = TourOptimizer::optimize(&m, None, &strategy).unwrap();
            assert!(
                (result.cost - 4.0).abs() < 1e-9,
                "{} missed the square perimeter: {}",
                strategy.name(),
                result.cost
            );
        }
    }

    proptest! {
        #[test]
        fn prop_result_is_always_a_permutation(
            xs in proptest::collection::vec((-50.0f64..50.0, -50.0f64..50.0), 2..30),
            seed in 0u64..1000,
        ) {
            let m = euclidean_matrix(&xs);
            let strategy = Strategy::IteratedLocalSearch(
                IlsParams::default()
                    .with_max_iterations(10)
                    .with_max_no_improve(5)
                    .with_seed(seed),
            );
            let result = TourOptimizer::optimize(&m, None, &strategy).unwrap();
            prop_assert_eq!(result.tour.len(), xs.len());
            prop_assert!(Tour::from_indices(result.tour.as_slice().to_vec()).is_ok());
            prop_assert!((result.tour.cost(&m) - result.cost).abs() < 1e-6);
        }
    }
}
