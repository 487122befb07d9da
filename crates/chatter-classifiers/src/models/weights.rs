use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};
use crate::math::SparseVector;

/// Frozen parameters of a one-vs-rest linear classifier.
///
/// Row `c` of `coef` and `intercept[c]` form the hyperplane separating
/// `classes[c]` from every other class. Prediction picks the class with the
/// largest margin; ties go to the class listed first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWeights", into = "RawWeights")]
pub struct Weights {
    classes: Vec<String>,
    coef: Array2<f64>,
    intercept: Array1<f64>,
}

/// Serialized form of [`Weights`]; shapes are checked on the way in.
#[derive(Serialize, Deserialize)]
struct RawWeights {
    classes: Vec<String>,
    coef: Array2<f64>,
    intercept: Array1<f64>,
}

impl TryFrom<RawWeights> for Weights {
    type Error = ClassifierError;

    fn try_from(raw: RawWeights) -> Result<Self> {
        Weights::new(raw.classes, raw.coef, raw.intercept)
    }
}

impl From<Weights> for RawWeights {
    fn from(weights: Weights) -> Self {
        RawWeights {
            classes: weights.classes,
            coef: weights.coef,
            intercept: weights.intercept,
        }
    }
}

impl Weights {
    pub fn new(classes: Vec<String>, coef: Array2<f64>, intercept: Array1<f64>) -> Result<Self> {
        if classes.is_empty() {
            return Err(ClassifierError::InvalidParameter(
                "weights need at least one class".to_string(),
            ));
        }
        if coef.nrows() != classes.len() || intercept.len() != classes.len() {
            return Err(ClassifierError::InvalidParameter(format!(
                "{} classes but {} coefficient rows and {} intercepts",
                classes.len(),
                coef.nrows(),
                intercept.len()
            )));
        }
        Ok(Weights {
            classes,
            coef,
            intercept,
        })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn coef(&self) -> &Array2<f64> {
        &self.coef
    }

    pub fn intercept(&self) -> &Array1<f64> {
        &self.intercept
    }

    /// Dimensionality of the input space.
    pub fn n_features(&self) -> usize {
        self.coef.ncols()
    }

    /// Margin of `x` against every class hyperplane.
    pub fn decision_function(&self, x: &SparseVector) -> Array1<f64> {
        self.coef
            .rows()
            .into_iter()
            .zip(self.intercept.iter())
            .map(|(w, b)| x.dot(w) + b)
            .collect()
    }

    /// Index of the class with the largest margin.
    pub fn predict_index(&self, x: &SparseVector) -> usize {
        let margins = self.decision_function(x);
        let mut best = 0;
        for (c, &m) in margins.iter().enumerate().skip(1) {
            if m > margins[best] {
                best = c;
            }
        }
        best
    }

    pub fn predict_label(&self, x: &SparseVector) -> &str {
        &self.classes[self.predict_index(x)]
    }
}
