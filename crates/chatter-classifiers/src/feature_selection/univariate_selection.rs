//! Univariate feature selection methods following scikit-learn's API.
//!
//! See: https://scikit-learn.org/stable/modules/feature_selection.html#univariate-feature-selection

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::data_handling::encode_labels;
use crate::error::{ClassifierError, Result};
use crate::math::{SparseMatrix, SparseVector};


/// Compute chi-squared stats between each non-negative feature and class.
///
/// The statistic measures dependence between a feature and the label
/// distribution: features that are independent of the class get a score
/// close to zero, while features concentrated in one class score high.
///
/// For every feature `j`, the observed counts `O[c, j]` are the sum of the
/// feature over the samples of class `c`, and the expected counts are
/// `E[c, j] = P(c) * sum_j`. The score is `sum_c (O - E)^2 / E`. Terms with a
/// zero expectation and non-finite scores are treated as zero.
///
/// # Parameters
///
/// * `x` - A sparse matrix of shape (n_samples, n_features) with non-negative values.
/// * `y` - Class index of every sample, in `0..n_classes`.
/// * `n_classes` - Number of distinct classes.
///
/// # Returns
///
/// A tuple containing:
/// - An array of shape (n_features,) with the chi-squared statistic of each feature.
/// - An array of shape (n_features,) with the p-value of each statistic, using
///   `n_classes - 1` degrees of freedom. When fewer than two classes are
///   present every p-value is 1.0.
///
/// # Examples
///
/// ```rust
/// use chatter_classifiers::feature_selection::univariate_selection::chi2;
/// use chatter_classifiers::math::{SparseMatrix, SparseVector};
///
/// let x = SparseMatrix::from_rows(
///     vec![SparseVector::binary(vec![0]), SparseVector::binary(vec![1])],
///     2,
/// ).unwrap();
/// let (scores, p_values) = chi2(&x, &[0, 1], 2);
/// assert_eq!(scores.len(), 2);
/// assert_eq!(p_values.len(), 2);
/// ```
pub fn chi2(x: &SparseMatrix, y: &[usize], n_classes: usize) -> (Array1<f64>, Array1<f64>) {
    let n_features = x.ncols();
    let n_samples = x.nrows() as f64;

    let mut observed = Array2::<f64>::zeros((n_classes, n_features));
    let mut class_count = Array1::<f64>::zeros(n_classes);
    for (row, &class) in x.rows().iter().zip(y) {
        class_count[class] += 1.0;
        for (idx, v) in row.iter() {
            observed[(class, idx)] += v;
        }
    }

    let feature_count = x.column_sums();
    let class_prob = class_count.mapv(|c| if n_samples > 0.0 { c / n_samples } else { 0.0 });

    let mut scores = Array1::<f64>::zeros(n_features);
    for j in 0..n_features {
        let mut stat = 0.0;
        for c in 0..n_classes {
            let expected = class_prob[c] * feature_count[j];
            if expected > 0.0 {
                let diff = observed[(c, j)] - expected;
                stat += diff * diff / expected;
            }
        }
        scores[j] = if stat.is_finite() { stat } else { 0.0 };
    }

    let p_values = match ChiSquared::new(n_classes.saturating_sub(1) as f64) {
        Ok(dist) if n_classes > 1 => scores.mapv(|s| dist.sf(s)),
        _ => Array1::from_elem(n_features, 1.0),
    };

    (scores, p_values)
}


/// The frozen output of feature selection: which input dimensions survive,
/// in ascending input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionMask {
    /// Selected input dimensions, strictly ascending.
    indices: Vec<usize>,
    /// Dimensionality of the input space the mask was fitted on.
    n_input: usize,
}

impl SelectionMask {
    pub fn new(mut indices: Vec<usize>, n_input: usize) -> Result<Self> {
        indices.sort_unstable();
        indices.dedup();
        if let Some(&max) = indices.last() {
            if max >= n_input {
                return Err(ClassifierError::DimensionMismatch {
                    expected: n_input,
                    found: max + 1,
                });
            }
        }
        Ok(SelectionMask { indices, n_input })
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of selected dimensions (the output dimensionality).
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn n_input(&self) -> usize {
        self.n_input
    }

    /// Output position of input dimension `index`, if it was selected.
    pub fn position(&self, index: usize) -> Option<usize> {
        self.indices.binary_search(&index).ok()
    }

    /// Restrict one vector to the selected dimensions, renumbered to their
    /// position in the mask.
    pub fn apply_vector(&self, v: &SparseVector) -> SparseVector {
        SparseVector::from_pairs(
            v.iter()
                .filter_map(|(idx, value)| self.position(idx).map(|pos| (pos, value)))
                .collect(),
        )
    }

    /// Restrict every row of `x` to the selected dimensions.
    pub fn apply(&self, x: &SparseMatrix) -> Result<SparseMatrix> {
        if x.ncols() != self.n_input {
            return Err(ClassifierError::DimensionMismatch {
                expected: self.n_input,
                found: x.ncols(),
            });
        }
        let rows = x.rows().iter().map(|row| self.apply_vector(row)).collect();
        SparseMatrix::from_rows(rows, self.len())
    }
}


/// A struct for selecting the k best features based on chi-squared scores.
///
/// This struct implements a feature selection method similar to scikit-learn's SelectKBest
/// with chi2 as the scoring function. The mask is computed once by [`SelectKBest::fit`] and
/// reused unchanged by every later call to [`SelectKBest::apply`].
#[derive(Debug, Clone)]
pub struct SelectKBest {
    /// The number of top features to select.
    k: usize,
    /// Selected dimensions, set by `fit`.
    mask: Option<SelectionMask>,
    /// Chi-squared statistic of every input dimension, set by `fit`.
    scores: Option<Array1<f64>>,
    /// p-values of the statistics, set by `fit`.
    p_values: Option<Array1<f64>>,
}

impl SelectKBest {
    /// Creates a new SelectKBest instance.
    ///
    /// # Arguments
    ///
    /// * `k` - The number of top features to select.
    ///
    /// # Returns
    ///
    /// A new, unfitted SelectKBest instance.
    pub fn new(k: usize) -> Self {
        SelectKBest {
            k,
            mask: None,
            scores: None,
            p_values: None,
        }
    }

    /// Wraps a mask restored from a model artifact.
    pub fn from_mask(mask: SelectionMask) -> Self {
        SelectKBest {
            k: mask.len(),
            mask: Some(mask),
            scores: None,
            p_values: None,
        }
    }

    /// Fits the SelectKBest model and returns the mask of the k best features.
    ///
    /// When `k` exceeds the number of features every feature is selected.
    /// Ties in score are resolved toward the lower feature index. The mask keeps
    /// the selected features in their original (ascending) order, not in score
    /// order.
    ///
    /// # Arguments
    ///
    /// * `x` - The feature matrix (n_samples x n_features).
    /// * `y` - One label per sample.
    ///
    /// # Returns
    ///
    /// The fitted selection mask.
    pub fn fit<S: AsRef<str>>(&mut self, x: &SparseMatrix, y: &[S]) -> Result<&SelectionMask> {
        if x.nrows() != y.len() {
            return Err(ClassifierError::LengthMismatch {
                rows: x.nrows(),
                labels: y.len(),
            });
        }
        if x.nrows() == 0 {
            return Err(ClassifierError::EmptyTrainingSet);
        }

        let (classes, encoded) = encode_labels(y);
        let (scores, p_values) = chi2(x, &encoded, classes.len());

        let n_features = x.ncols();
        let k = self.k.min(n_features);
        if k < self.k {
            log::info!(
                "Requested {} features but only {} are available; selecting all",
                self.k,
                n_features
            );
        }

        // Rank by descending score; stable sort keeps lower indices first on ties
        let mut ranked: Vec<usize> = (0..n_features).collect();
        ranked.sort_by(|&i, &j| {
            scores[j]
                .partial_cmp(&scores[i])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(k);

        let mask = SelectionMask::new(ranked, n_features)?;
        log::info!("Selected {} of {} features by chi-squared score", mask.len(), n_features);

        self.scores = Some(scores);
        self.p_values = Some(p_values);
        Ok(&*self.mask.insert(mask))
    }

    /// Restricts `x` to the fitted mask.
    ///
    /// # Errors
    ///
    /// [`ClassifierError::SelectionNotFitted`] when called before `fit`.
    pub fn apply(&self, x: &SparseMatrix) -> Result<SparseMatrix> {
        self.mask()?.apply(x)
    }

    pub fn mask(&self) -> Result<&SelectionMask> {
        self.mask.as_ref().ok_or(ClassifierError::SelectionNotFitted)
    }

    /// Chi-squared score of every input feature from the last `fit`.
    pub fn scores(&self) -> Option<&Array1<f64>> {
        self.scores.as_ref()
    }

    /// p-values of the scores from the last `fit`.
    pub fn p_values(&self) -> Option<&Array1<f64>> {
        self.p_values.as_ref()
    }

    /// Selected feature indices ordered by descending score, at most `n` of them.
    pub fn top_features(&self, n: usize) -> Vec<(usize, f64)> {
        let (Some(mask), Some(scores)) = (self.mask.as_ref(), self.scores.as_ref()) else {
            return Vec::new();
        };
        let mut ranked: Vec<(usize, f64)> = mask.indices().iter().map(|&i| (i, scores[i])).collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(n);
        ranked
    }
}
