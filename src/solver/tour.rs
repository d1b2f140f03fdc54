//! Tour representation.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::matrix::DistanceMatrix;

/// A closed visiting order: a permutation of `0..len`, with the cycle
/// implicitly closing from the last index back to the first.
///
/// The permutation invariant is enforced at construction, so any `Tour`
/// in circulation visits every station exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour {
    indices: Vec<usize>,
}

impl Tour {
    /// The identity ordering `0, 1, ..., n-1`.
    pub fn identity(n: usize) -> Self {
        Self {
            indices: (0..n).collect(),
        }
    }

    /// Validates that `indices` is a permutation of `0..indices.len()`.
    pub fn from_indices(indices: Vec<usize>) -> Result<Self, String> {
        let n = indices.len();
        let mut seen = vec![false; n];
        for &idx in &indices {
            if idx >= n {
                return Err(format!("tour index {idx} out of range for {n} stations"));
            }
            if seen[idx] {
                return Err(format!("tour visits station index {idx} twice"));
            }
            seen[idx] = true;
        }
        Ok(Self { indices })
    }

    /// A uniformly random permutation.
    pub fn shuffled<R: Rng>(n: usize, rng: &mut R) -> Self {
        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(rng);
        Self { indices }
    }

    /// Greedy nearest-neighbor construction starting from index 0.
    ///
    /// The default initial tour when no (valid) warm-start seed exists.
    pub fn nearest_neighbor(matrix: &DistanceMatrix) -> Self {
        let n = matrix.dim();
        if n == 0 {
            return Self::identity(0);
        }

        let mut visited = vec![false; n];
        let mut indices = Vec::with_capacity(n);
        let mut current = 0usize;
        visited[0] = true;
        indices.push(0);

        for _ in 1..n {
            let mut next = None;
            let mut best = f64::INFINITY;
            for (candidate, seen) in visited.iter().enumerate() {
                if !seen && matrix.get(current, candidate) < best {
                    best = matrix.get(current, candidate);
                    next = Some(candidate);
                }
            }
            let next = next.expect("unvisited station must exist");
            visited[next] = true;
            indices.push(next);
            current = next;
        }

        Self { indices }
    }

    /// Total cycle cost: consecutive legs plus the closing edge.
    pub fn cost(&self, matrix: &DistanceMatrix) -> f64 {
        let n = self.indices.len();
        if n < 2 {
            return 0.0;
        }
        let mut total = 0.0;
        for k in 0..n {
            total += matrix.get(self.indices[k], self.indices[(k + 1) % n]);
        }
        total
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    pub(crate) fn from_permutation_unchecked(indices: Vec<usize>) -> Self {
        debug_assert!(Self::from_indices(indices.clone()).is_ok());
        Self { indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_matrix() -> DistanceMatrix {
        // 0-1-2-3 around a unit square, diagonals sqrt(2).
        let s = std::f64::consts::SQRT_2;
        DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0, s, 1.0],
            vec![1.0, 0.0, 1.0, s],
            vec![s, 1.0, 0.0, 1.0],
            vec![1.0, s, 1.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_identity() {
        let tour = Tour::identity(4);
        assert_eq!(tour.as_slice(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_from_indices_rejects_duplicate() {
        assert!(Tour::from_indices(vec![0, 1, 1, 3]).is_err());
    }

    #[test]
    fn test_from_indices_rejects_out_of_range() {
        assert!(Tour::from_indices(vec![0, 1, 4, 2]).is_err());
    }

    #[test]
    fn test_cost_includes_closing_edge() {
        let m = square_matrix();
        let perimeter = Tour::from_indices(vec![0, 1, 2, 3]).unwrap();
        assert!((perimeter.cost(&m) - 4.0).abs() < 1e-12);

        let crossed = Tour::from_indices(vec![0, 2, 1, 3]).unwrap();
        assert!(crossed.cost(&m) > perimeter.cost(&m));
    }

    #[test]
    fn test_cost_trivial_tours() {
        assert_eq!(Tour::identity(0).cost(&DistanceMatrix::zeroed(0)), 0.0);
        assert_eq!(Tour::identity(1).cost(&DistanceMatrix::zeroed(1)), 0.0);
    }

    #[test]
    fn test_nearest_neighbor_is_permutation() {
        let m = square_matrix();
        let tour = Tour::nearest_neighbor(&m);
        assert!(Tour::from_indices(tour.as_slice().to_vec()).is_ok());
        assert_eq!(tour.as_slice()[0], 0);
    }

    #[test]
    fn test_nearest_neighbor_on_square_finds_perimeter() {
        let m = square_matrix();
        let tour = Tour::nearest_neighbor(&m);
        assert!((tour.cost(&m) - 4.0).abs() < 1e-12);
    }
}
