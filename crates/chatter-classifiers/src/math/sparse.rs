use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};

/// A sparse row: active dimension indices in ascending order with their values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    /// Build a vector from `(index, value)` pairs. Pairs are sorted by index;
    /// duplicate indices are summed and explicit zeros dropped.
    pub fn from_pairs(mut pairs: Vec<(usize, f64)>) -> Self {
        pairs.sort_by_key(|&(idx, _)| idx);
        let mut indices: Vec<usize> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f64> = Vec::with_capacity(pairs.len());
        for (idx, value) in pairs {
            if indices.last() == Some(&idx) {
                if let Some(last) = values.last_mut() {
                    *last += value;
                }
            } else {
                indices.push(idx);
                values.push(value);
            }
        }
        let (indices, values) = indices
            .into_iter()
            .zip(values)
            .filter(|&(_, v)| v != 0.0)
            .unzip();
        SparseVector { indices, values }
    }

    /// A binary vector with 1.0 at every given index.
    pub fn binary(mut indices: Vec<usize>) -> Self {
        indices.sort_unstable();
        indices.dedup();
        let values = vec![1.0; indices.len()];
        SparseVector { indices, values }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    pub fn get(&self, index: usize) -> f64 {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Largest stored index, if any.
    pub fn max_index(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    /// Dot product against a dense vector. Indices outside `dense` contribute nothing.
    pub fn dot(&self, dense: ArrayView1<f64>) -> f64 {
        self.iter()
            .filter_map(|(idx, v)| dense.get(idx).map(|w| w * v))
            .sum()
    }
}

/// Row-major sparse matrix with a fixed column count.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseMatrix {
    rows: Vec<SparseVector>,
    ncols: usize,
}

impl SparseMatrix {
    /// Assemble a matrix, checking that no row addresses a column `>= ncols`.
    pub fn from_rows(rows: Vec<SparseVector>, ncols: usize) -> Result<Self> {
        if let Some(found) = rows.iter().filter_map(SparseVector::max_index).max() {
            if found >= ncols {
                return Err(ClassifierError::DimensionMismatch {
                    expected: ncols,
                    found: found + 1,
                });
            }
        }
        Ok(SparseMatrix { rows, ncols })
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.ncols)
    }

    pub fn row(&self, row: usize) -> &SparseVector {
        &self.rows[row]
    }

    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    /// Dense copy of the matrix, one row per sample.
    pub fn to_dense(&self) -> Array2<f64> {
        let mut dense = Array2::zeros(self.shape());
        for (r, row) in self.rows.iter().enumerate() {
            for (idx, v) in row.iter() {
                dense[(r, idx)] = v;
            }
        }
        dense
    }

    /// Per-column sums over all rows.
    pub fn column_sums(&self) -> Array1<f64> {
        let mut sums = Array1::zeros(self.ncols);
        for row in &self.rows {
            for (idx, v) in row.iter() {
                sums[idx] += v;
            }
        }
        sums
    }

    /// Total number of stored entries.
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(SparseVector::nnz).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_from_pairs_sorts_and_merges() {
        let v = SparseVector::from_pairs(vec![(4, 1.0), (1, 2.0), (4, 0.5), (2, 0.0)]);
        assert_eq!(v.indices(), &[1, 4]);
        assert_eq!(v.values(), &[2.0, 1.5]);
        assert_eq!(v.get(4), 1.5);
        assert_eq!(v.get(3), 0.0);
    }

    #[test]
    fn test_binary_dot() {
        let v = SparseVector::binary(vec![2, 0, 2]);
        let w = array![0.5, 10.0, -1.0];
        assert_eq!(v.nnz(), 2);
        assert!((v.dot(w.view()) - (-0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_from_rows_rejects_out_of_range_columns() {
        let rows = vec![SparseVector::binary(vec![0, 3])];
        let err = SparseMatrix::from_rows(rows, 3).unwrap_err();
        assert!(matches!(
            err,
            ClassifierError::DimensionMismatch { expected: 3, found: 4 }
        ));
    }

    #[test]
    fn test_column_sums() {
        let m = SparseMatrix::from_rows(
            vec![SparseVector::binary(vec![0, 2]), SparseVector::binary(vec![2])],
            3,
        )
        .unwrap();
        assert_eq!(m.column_sums(), array![1.0, 0.0, 2.0]);
        assert_eq!(m.nnz(), 3);
    }

    #[test]
    fn test_to_dense() {
        let m = SparseMatrix::from_rows(
            vec![SparseVector::from_pairs(vec![(2, 0.5)]), SparseVector::binary(vec![0, 1])],
            3,
        )
        .unwrap();
        assert_eq!(m.to_dense(), array![[0.0, 0.0, 0.5], [1.0, 1.0, 0.0]]);
    }
}
