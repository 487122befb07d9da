//! Linear support vector classifier backed by `linfa-svm`.
//!
//! Each class gets its own binary SVM with a linear kernel (one-vs-rest).
//! linfa returns the dual solution; since the kernel is linear the
//! hyperplane is folded into an explicit weight vector `w = sum(alpha_i x_i)`
//! and intercept `-rho`, so prediction never touches the training samples.
use linfa::traits::Fit;
use linfa::Dataset;
use linfa_svm::Svm;
use ndarray::{Array1, Array2};
use rayon::prelude::*;

use crate::config::ModelType;
use crate::data_handling::encode_labels;
use crate::error::{ClassifierError, Result};
use crate::math::SparseMatrix;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::weights::Weights;

pub struct LinearSvc {
    params: ModelType,
    weights: Option<Weights>,
}

/// Explicit hyperplane of one binary sub-problem.
struct Hyperplane {
    w: Array1<f64>,
    b: f64,
    n_support: usize,
}

impl LinearSvc {
    pub fn new(params: ModelType) -> Self {
        LinearSvc {
            params,
            weights: None,
        }
    }

    /// A ready-to-predict classifier around previously trained weights.
    pub fn from_weights(params: ModelType, weights: Weights) -> Self {
        LinearSvc {
            params,
            weights: Some(weights),
        }
    }

    fn fit_binary(
        x: &Array2<f64>,
        targets: Array1<bool>,
        c: f64,
        eps: f64,
        shrinking: bool,
    ) -> Result<Hyperplane> {
        let dataset = Dataset::new(x.clone(), targets);
        let svm = Svm::<f64, bool>::params()
            .pos_neg_weights(c, c)
            .eps(eps)
            .shrinking(shrinking)
            .linear_kernel()
            .fit(&dataset)?;

        let mut w = Array1::<f64>::zeros(x.ncols());
        for (row, &alpha) in x.rows().into_iter().zip(svm.alpha.iter()) {
            if alpha != 0.0 {
                w.scaled_add(alpha, &row);
            }
        }

        Ok(Hyperplane {
            w,
            b: -svm.rho,
            n_support: svm.nsupport(),
        })
    }
}

impl ClassifierModel for LinearSvc {
    fn fit(&mut self, x: &SparseMatrix, y: &[String]) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(ClassifierError::LengthMismatch {
                rows: x.nrows(),
                labels: y.len(),
            });
        }
        if x.nrows() == 0 {
            return Err(ClassifierError::EmptyTrainingSet);
        }
        self.params.validate()?;

        let ModelType::LinearSvc { c, eps, shrinking } = self.params.clone();

        let (classes, encoded) = encode_labels(y);
        log::info!(
            "Training {} one-vs-rest hyperplanes on {} samples x {} features",
            classes.len(),
            x.nrows(),
            x.ncols()
        );

        let mut coef = Array2::<f64>::zeros((classes.len(), x.ncols()));
        let mut intercept = Array1::<f64>::zeros(classes.len());

        // With a single class there is nothing to separate: a zero hyperplane
        // with a positive intercept always picks it.
        if classes.len() == 1 {
            log::warn!("Only one class ('{}') in the training data", classes[0]);
            intercept[0] = 1.0;
            self.weights = Some(Weights::new(classes, coef, intercept)?);
            return Ok(());
        }

        let dense = x.to_dense();
        let hyperplanes: Vec<Hyperplane> = (0..classes.len())
            .into_par_iter()
            .map(|class| {
                let targets: Array1<bool> = encoded.iter().map(|&e| e == class).collect();
                Self::fit_binary(&dense, targets, c, eps, shrinking)
            })
            .collect::<Result<_>>()?;

        for (class, hyperplane) in hyperplanes.into_iter().enumerate() {
            log::debug!(
                "Class '{}': {} support vectors, intercept {:.4}",
                classes[class],
                hyperplane.n_support,
                hyperplane.b
            );
            coef.row_mut(class).assign(&hyperplane.w);
            intercept[class] = hyperplane.b;
        }

        self.weights = Some(Weights::new(classes, coef, intercept)?);
        Ok(())
    }

    fn weights(&self) -> Result<&Weights> {
        self.weights.as_ref().ok_or(ClassifierError::NotReady)
    }

    fn name(&self) -> &str {
        "linear_svc"
    }
}
