//! Feature selection utilities.
//!
//! This module contains univariate selection routines (a la scikit-learn)
//! for scoring features against the class labels and keeping the k most
//! discriminative ones.
pub mod univariate_selection;

pub use univariate_selection::{chi2, SelectKBest, SelectionMask};
