use std::fmt;

use ndarray::Array2;
use serde::Serialize;

use crate::data_handling::encode_labels;
use crate::error::{ClassifierError, Result};

/// Precision, recall and F1 of one class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassScores {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of gold instances of the class.
    pub support: usize,
}

/// Evaluation of predicted labels against gold labels.
///
/// Classes are the sorted union of gold and predicted labels; rows of the
/// confusion matrix are gold classes and columns predicted classes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub accuracy: f64,
    pub per_class: Vec<ClassScores>,
    pub classes: Vec<String>,
    pub confusion: Array2<usize>,
}

/// Fraction of positions where `predicted` equals `gold`. Empty input scores 0.
pub fn accuracy<S: AsRef<str>, T: AsRef<str>>(gold: &[S], predicted: &[T]) -> Result<f64> {
    check_lengths(gold.len(), predicted.len())?;
    if gold.is_empty() {
        return Ok(0.0);
    }
    let correct = gold
        .iter()
        .zip(predicted)
        .filter(|(g, p)| g.as_ref() == p.as_ref())
        .count();
    Ok(correct as f64 / gold.len() as f64)
}

/// Build the full per-class report.
///
/// Precision, recall or F1 whose denominator is zero is reported as 0.
pub fn classification_report<S: AsRef<str>, T: AsRef<str>>(
    gold: &[S],
    predicted: &[T],
) -> Result<ClassificationReport> {
    check_lengths(gold.len(), predicted.len())?;

    let all: Vec<&str> = gold
        .iter()
        .map(AsRef::as_ref)
        .chain(predicted.iter().map(AsRef::as_ref))
        .collect();
    let (classes, encoded) = encode_labels(&all);
    let (gold_idx, pred_idx) = encoded.split_at(gold.len());

    let n = classes.len();
    let mut confusion = Array2::<usize>::zeros((n, n));
    for (&g, &p) in gold_idx.iter().zip(pred_idx) {
        confusion[(g, p)] += 1;
    }

    let per_class = classes
        .iter()
        .enumerate()
        .map(|(c, label)| {
            let tp = confusion[(c, c)] as f64;
            let support = confusion.row(c).sum();
            let predicted_total = confusion.column(c).sum();
            let precision = ratio(tp, predicted_total as f64);
            let recall = ratio(tp, support as f64);
            ClassScores {
                label: label.clone(),
                precision,
                recall,
                f1: ratio(2.0 * precision * recall, precision + recall),
                support,
            }
        })
        .collect();

    Ok(ClassificationReport {
        accuracy: accuracy(gold, predicted)?,
        per_class,
        classes,
        confusion,
    })
}

impl ClassificationReport {
    /// Unweighted mean F1 over classes with gold support.
    pub fn macro_f1(&self) -> f64 {
        let supported: Vec<f64> = self
            .per_class
            .iter()
            .filter(|c| c.support > 0)
            .map(|c| c.f1)
            .collect();
        if supported.is_empty() {
            0.0
        } else {
            supported.iter().sum::<f64>() / supported.len() as f64
        }
    }

    pub fn log_summary(&self) {
        for line in self.to_string().lines() {
            log::info!("{}", line);
        }
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<16} {:>9} {:>9} {:>9} {:>9}", "label", "precision", "recall", "f1", "support")?;
        for c in &self.per_class {
            writeln!(
                f,
                "{:<16} {:>9.3} {:>9.3} {:>9.3} {:>9}",
                c.label, c.precision, c.recall, c.f1, c.support
            )?;
        }
        write!(f, "accuracy {:.3}, macro F1 {:.3}", self.accuracy, self.macro_f1())
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

fn check_lengths(gold: usize, predicted: usize) -> Result<()> {
    if gold != predicted {
        return Err(ClassifierError::LengthMismatch {
            rows: predicted,
            labels: gold,
        });
    }
    Ok(())
}
