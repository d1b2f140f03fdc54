//! Dense travel-cost matrix.

/// An N×N matrix of travel costs in kilometers, row-major.
///
/// `get(i, j)` is the cost of travelling from station index `i` to `j`.
/// A valid matrix is finite, non-negative, and zero on the diagonal;
/// symmetry is guaranteed only for geometric (haversine) matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    dim: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// Creates an all-zero matrix of the given dimension.
    pub fn zeroed(dim: usize) -> Self {
        Self {
            dim,
            values: vec![0.0; dim * dim],
        }
    }

    /// Builds a matrix from row vectors. All rows must have length equal
    /// to the row count.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, String> {
        let dim = rows.len();
        let mut values = Vec::with_capacity(dim * dim);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != dim {
                return Err(format!(
                    "row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    dim
                ));
            }
            values.extend(row);
        }
        Ok(Self { dim, values })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.dim + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.values[i * self.dim + j] = value;
    }

    /// Checks the invariants every cost matrix must satisfy: all entries
    /// finite and non-negative, diagonal exactly zero.
    pub fn validate(&self) -> Result<(), String> {
        for i in 0..self.dim {
            for j in 0..self.dim {
                let v = self.get(i, j);
                if !v.is_finite() {
                    return Err(format!("matrix entry ({i}, {j}) is not finite: {v}"));
                }
                if v < 0.0 {
                    return Err(format!("matrix entry ({i}, {j}) is negative: {v}"));
                }
            }
            if self.get(i, i) != 0.0 {
                return Err(format!(
                    "matrix diagonal ({i}, {i}) is nonzero: {}",
                    self.get(i, i)
                ));
            }
        }
        Ok(())
    }

    /// Whether the matrix is symmetric within `eps`.
    pub fn is_symmetric(&self, eps: f64) -> bool {
        for i in 0..self.dim {
            for j in (i + 1)..self.dim {
                if (self.get(i, j) - self.get(j, i)).abs() > eps {
                    return false;
                }
            }
        }
        true
    }
}
