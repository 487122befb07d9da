//! Sparse vector types used between the vectorizer, the feature selector
//! and the classifier.
//!
//! Feature vectors are binary and very sparse (a post touches a few dozen of
//! several thousand dimensions), so rows only store their active indices.
//! Dense parameters (class weights, count tables) use `ndarray`.
pub mod sparse;

pub use sparse::{SparseMatrix, SparseVector};
