use ndarray::Array2;
use rayon::prelude::*;

use crate::error::{ClassifierError, Result};
use crate::math::SparseMatrix;
use crate::models::weights::Weights;

/// The narrow contract between the pipeline and a linear classifier.
///
/// Implementations only need to know how to `fit`; prediction is defined in
/// terms of the frozen [`Weights`] they expose, so any linear trainer can be
/// swapped in without touching the pipeline or the artifact format.
pub trait ClassifierModel: Send + Sync {
    /// Fit the model on reduced feature vectors, one label per row.
    fn fit(&mut self, x: &SparseMatrix, y: &[String]) -> Result<()>;

    /// Trained parameters, or [`ClassifierError::NotReady`] before training/loading.
    fn weights(&self) -> Result<&Weights>;

    /// Per-class margins, shape (n_samples, n_classes).
    fn decision_function(&self, x: &SparseMatrix) -> Result<Array2<f64>> {
        let weights = self.checked_weights(x)?;
        let n_classes = weights.classes().len();
        let mut margins = Array2::zeros((x.nrows(), n_classes));
        for (i, row) in x.rows().iter().enumerate() {
            margins.row_mut(i).assign(&weights.decision_function(row));
        }
        Ok(margins)
    }

    /// Predict one label per row.
    fn predict(&self, x: &SparseMatrix) -> Result<Vec<String>> {
        let weights = self.checked_weights(x)?;
        Ok(x.rows()
            .par_iter()
            .map(|row| weights.predict_label(row).to_string())
            .collect())
    }

    /// Weights, after checking `x` lives in the space they were trained on.
    fn checked_weights(&self, x: &SparseMatrix) -> Result<&Weights> {
        let weights = self.weights()?;
        if x.ncols() != weights.n_features() {
            return Err(ClassifierError::DimensionMismatch {
                expected: weights.n_features(),
                found: x.ncols(),
            });
        }
        Ok(weights)
    }

    fn is_ready(&self) -> bool {
        self.weights().is_ok()
    }

    /// Optional human readable name for the model
    fn name(&self) -> &str { "classifier" }
}
