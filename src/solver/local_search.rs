//! Edge moves and 2-opt descent.
//!
//! The 2-opt move reverses the tour segment at positions `i+1..=j`,
//! replacing edges `(t[i], t[i+1])` and `(t[j], t[j+1])` with
//! `(t[i], t[j])` and `(t[i+1], t[j+1])` (positions mod n). For a
//! symmetric matrix the reversed inner edges cancel and the delta is four
//! lookups; for an asymmetric matrix the inner edges change direction and
//! are summed explicitly.

use rand::Rng;

use crate::matrix::DistanceMatrix;

/// Cost change of reversing positions `i+1..=j` of `tour`, where
/// `0 <= i < j < n`.
pub(crate) fn two_opt_delta(
    matrix: &DistanceMatrix,
    tour: &[usize],
    i: usize,
    j: usize,
    symmetric: bool,
) -> f64 {
    let n = tour.len();
    let (a, b) = (tour[i], tour[i + 1]);
    let (c, d) = (tour[j], tour[(j + 1) % n]);

    let mut delta = matrix.get(a, c) + matrix.get(b, d) - matrix.get(a, b) - matrix.get(c, d);

    if !symmetric {
        for k in (i + 1)..j {
            delta += matrix.get(tour[k + 1], tour[k]) - matrix.get(tour[k], tour[k + 1]);
        }
    }

    delta
}

/// Applies the 2-opt move: reverses positions `i+1..=j` in place.
pub(crate) fn apply_two_opt(tour: &mut [usize], i: usize, j: usize) {
    tour[(i + 1)..=j].reverse();
}

/// Picks a random 2-opt move `(i, j)` with `i < j`.
pub(crate) fn random_move<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    debug_assert!(n >= 2);
    let i = rng.random_range(0..n - 1);
    let j = rng.random_range(i + 1..n);
    (i, j)
}

/// First-improvement 2-opt descent to a local optimum.
///
/// Returns the improved tour and its cost. `n < 3` tours are already
/// optimal and returned unchanged.
pub(crate) fn two_opt_descent(matrix: &DistanceMatrix, mut tour: Vec<usize>) -> (Vec<usize>, f64) {
    let n = tour.len();
    let symmetric = matrix.is_symmetric(1e-12);
    let mut cost = cycle_cost(matrix, &tour);
    if n < 3 {
        return (tour, cost);
    }

    let mut improved = true;
    while improved {
        improved = false;
        for i in 0..n - 1 {
            for j in (i + 1)..n {
                let delta = two_opt_delta(matrix, &tour, i, j, symmetric);
                if delta < -1e-12 {
                    apply_two_opt(&mut tour, i, j);
                    cost += delta;
                    improved = true;
                }
            }
        }
    }

    (tour, cost)
}

/// Weak perturbation: reverse one random segment.
pub(crate) fn segment_reversal<R: Rng>(tour: &[usize], rng: &mut R) -> Vec<usize> {
    let mut out = tour.to_vec();
    if out.len() >= 2 {
        let (i, j) = random_move(out.len(), rng);
        apply_two_opt(&mut out, i, j);
    }
    out
}

/// Strong perturbation: the double-bridge 4-opt move. Cuts the cycle at
/// three random points and reconnects the segments as A-C-B-D, a move
/// 2-opt cannot undo in one step.
pub(crate) fn double_bridge<R: Rng>(tour: &[usize], rng: &mut R) -> Vec<usize> {
    let n = tour.len();
    if n < 4 {
        return tour.to_vec();
    }

    let mut cuts = [
        rng.random_range(1..n),
        rng.random_range(1..n),
        rng.random_range(1..n),
    ];
    cuts.sort_unstable();
    let [p1, p2, p3] = cuts;

    let mut out = Vec::with_capacity(n);
    out.extend_from_slice(&tour[..p1]);
    out.extend_from_slice(&tour[p2..p3]);
    out.extend_from_slice(&tour[p1..p2]);
    out.extend_from_slice(&tour[p3..]);
    out
}

pub(crate) fn cycle_cost(matrix: &DistanceMatrix, tour: &[usize]) -> f64 {
    let n = tour.len();
    if n < 2 {
        return 0.0;
    }
    (0..n).map(|k| matrix.get(tour[k], tour[(k + 1) % n])).sum()
}
