//! Simulated-annealing run loop.
//!
//! Single-solution trajectory search with the Metropolis acceptance
//! criterion: an improving 2-opt move is always taken, a worsening one is
//! taken with probability `exp(-delta / T)`. Temperature decays
//! geometrically each epoch; the run stops at the temperature floor or
//! after a bounded number of epochs without improvement.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::SaParams;
use super::local_search::{apply_two_opt, random_move, two_opt_delta};
use super::tour::Tour;
use super::TourSolution;
use crate::matrix::DistanceMatrix;

pub(crate) struct SaSolver;

impl SaSolver {
    /// Runs SA from `initial`. The matrix and parameters are validated by
    /// the caller; `initial.len() == matrix.dim() >= 2` holds here.
    pub(crate) fn run(matrix: &DistanceMatrix, initial: Tour, params: &SaParams) -> TourSolution {
        let mut rng = StdRng::seed_from_u64(params.seed.unwrap_or_else(rand::random));
        let symmetric = matrix.is_symmetric(1e-12);

        let mut current = initial.into_indices();
        let n = current.len();
        let mut current_cost = super::local_search::cycle_cost(matrix, &current);
        let mut best = current.clone();
        let mut best_cost = current_cost;

        let mut temperature = params.initial_temperature;
        let mut stale_epochs = 0usize;
        let mut iterations = 0usize;

        while temperature > params.min_temperature && stale_epochs < params.max_stale_epochs {
            let mut epoch_improved = false;

            for _ in 0..params.iterations_per_temperature {
                let (i, j) = random_move(n, &mut rng);
                let delta = two_opt_delta(matrix, &current, i, j, symmetric);

                // Metropolis acceptance criterion.
                let accept = delta < 0.0
                    || (temperature > 0.0
                        && rng.random_range(0.0..1.0) < (-delta / temperature).exp());

                if accept {
                    apply_two_opt(&mut current, i, j);
                    current_cost += delta;

                    if current_cost < best_cost - 1e-12 {
                        best.copy_from_slice(&current);
                        best_cost = current_cost;
                        epoch_improved = true;
                    }
                }

                iterations += 1;
            }

            if epoch_improved {
                stale_epochs = 0;
            } else {
                stale_epochs += 1;
            }
            temperature *= params.cooling_rate;
        }

        debug!(
            "sa finished: cost {best_cost:.6}, {iterations} iterations, final T {temperature:.2e}"
        );

        TourSolution {
            tour: Tour::from_permutation_unchecked(best),
            cost: best_cost,
            iterations,
        }
    }
}
