//! Symbolic feature extraction.
//!
//! A record is turned into a [`FeatureSet`]: a set of boolean presence
//! indicators keyed by feature name (lexical n-grams, the author handle and
//! bucketed author metadata). Feature names are later given numeric
//! dimensions by the vectorizer.
pub mod extractor;
pub mod feature_set;

pub use extractor::FeatureExtractor;
pub use feature_set::FeatureSet;
