//! Iterated-local-search run loop.
//!
//! Alternates 2-opt descent with a perturbation kick: descend to a local
//! optimum, kick the best tour with the configured scheme, descend again,
//! and keep the best tour seen. Stops at the iteration budget or after a
//! bounded number of kicks without improvement.

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::config::{IlsParams, PerturbationScheme};
use super::local_search::{double_bridge, segment_reversal, two_opt_descent};
use super::tour::Tour;
use super::TourSolution;
use crate::matrix::DistanceMatrix;

pub(crate) struct IlsSolver;

impl IlsSolver {
    /// Runs ILS from `initial`. The matrix and parameters are validated by
    /// the caller; `initial.len() == matrix.dim() >= 2` holds here.
    pub(crate) fn run(matrix: &DistanceMatrix, initial: Tour, params: &IlsParams) -> TourSolution {
        let mut rng = StdRng::seed_from_u64(params.seed.unwrap_or_else(rand::random));

        let (mut best, mut best_cost) = two_opt_descent(matrix, initial.into_indices());
        let mut no_improve = 0usize;
        let mut iterations = 0usize;

        for _ in 0..params.max_iterations {
            let kicked = match params.perturbation {
                PerturbationScheme::SegmentReversal => segment_reversal(&best, &mut rng),
                PerturbationScheme::DoubleBridge => double_bridge(&best, &mut rng),
            };
            let (candidate, candidate_cost) = two_opt_descent(matrix, kicked);
            iterations += 1;

            if candidate_cost < best_cost - 1e-12 {
                best = candidate;
                best_cost = candidate_cost;
                no_improve = 0;
            } else {
                no_improve += 1;
                if no_improve >= params.max_no_improve {
                    break;
                }
            }
        }

        debug!("ils finished: cost {best_cost:.6}, {iterations} kicks");

        TourSolution {
            tour: Tour::from_permutation_unchecked(best),
            cost: best_cost,
            iterations,
        }
    }
}
