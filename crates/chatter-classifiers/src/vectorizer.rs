//! Feature-name ↔ dimension mapping.
//!
//! A [`VocabularyBuilder`] collects feature names while training data is
//! observed and is then frozen into a [`Vocabulary`]. Dimensions are assigned
//! in lexical order of the feature names, so the same training batch always
//! yields the same numbering. Once frozen, a vocabulary never grows: names it
//! has not seen are dropped when vectorizing.
use std::collections::{BTreeSet, HashMap};
use std::convert::TryFrom;

use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};
use crate::features::FeatureSet;
use crate::math::{SparseMatrix, SparseVector};

/// Mutable collection stage of a vocabulary.
#[derive(Debug, Default, Clone)]
pub struct VocabularyBuilder {
    names: BTreeSet<String>,
}

impl VocabularyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every name flagged present in `features`.
    pub fn observe(&mut self, features: &FeatureSet) {
        for name in features.present() {
            if !self.names.contains(name) {
                self.names.insert(name.to_string());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn freeze(self) -> Vocabulary {
        let names: Vec<String> = self.names.into_iter().collect();
        let index = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Vocabulary { names, index }
    }
}

/// Frozen, bidirectional feature-name ↔ dimension mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Vectorize one feature set; unknown names are silently omitted.
    pub fn vectorize(&self, features: &FeatureSet) -> SparseVector {
        SparseVector::binary(
            features
                .present()
                .filter_map(|name| self.index_of(name))
                .collect(),
        )
    }
}

impl TryFrom<Vec<String>> for Vocabulary {
    type Error = String;

    fn try_from(names: Vec<String>) -> std::result::Result<Self, Self::Error> {
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(format!("duplicate feature name '{}' in vocabulary", name));
            }
        }
        Ok(Vocabulary { names, index })
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocabulary: Vocabulary) -> Self {
        vocabulary.names
    }
}

/// Converts feature sets into sparse binary vectors over a frozen vocabulary.
#[derive(Debug, Default, Clone)]
pub struct DictVectorizer {
    vocabulary: Option<Vocabulary>,
}

impl DictVectorizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vocabulary(vocabulary: Vocabulary) -> Self {
        DictVectorizer {
            vocabulary: Some(vocabulary),
        }
    }

    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.vocabulary.as_ref()
    }

    pub fn into_vocabulary(self) -> Option<Vocabulary> {
        self.vocabulary
    }

    pub fn is_fitted(&self) -> bool {
        self.vocabulary.is_some()
    }

    /// Build the vocabulary from `batch` and return the batch vectorized.
    ///
    /// Replaces any previously fitted vocabulary.
    pub fn fit_transform(&mut self, batch: &[FeatureSet]) -> Result<SparseMatrix> {
        let mut builder = VocabularyBuilder::new();
        for features in batch {
            builder.observe(features);
        }
        let vocabulary = builder.freeze();
        log::info!(
            "Vectorizer fitted: {} distinct features over {} records",
            vocabulary.len(),
            batch.len()
        );
        self.vocabulary = Some(vocabulary);
        self.transform(batch)
    }

    /// Vectorize `batch` with the fitted vocabulary. Unknown names are dropped.
    pub fn transform(&self, batch: &[FeatureSet]) -> Result<SparseMatrix> {
        let vocabulary = self
            .vocabulary
            .as_ref()
            .ok_or(ClassifierError::VectorizerNotFitted)?;
        let rows = batch.iter().map(|f| vocabulary.vectorize(f)).collect();
        SparseMatrix::from_rows(rows, vocabulary.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> FeatureSet {
        names.iter().copied().collect()
    }

    #[test]
    fn test_fit_assigns_lexical_indices() {
        let mut v = DictVectorizer::new();
        let x = v
            .fit_transform(&[set(&["moon", "to"]), set(&["bear", "to"])])
            .unwrap();
        let vocab = v.vocabulary().unwrap();
        assert_eq!(vocab.names(), &["bear", "moon", "to"]);
        assert_eq!(x.shape(), (2, 3));
        assert_eq!(x.row(0).indices(), &[1, 2]);
        assert_eq!(x.row(1).indices(), &[0, 2]);
    }

    #[test]
    fn test_fit_is_independent_of_record_order() {
        let mut a = DictVectorizer::new();
        let mut b = DictVectorizer::new();
        a.fit_transform(&[set(&["x", "y"]), set(&["z"])]).unwrap();
        b.fit_transform(&[set(&["z"]), set(&["y", "x"])]).unwrap();
        assert_eq!(a.vocabulary(), b.vocabulary());
    }

    #[test]
    fn test_transform_drops_unseen_features() {
        let mut v = DictVectorizer::new();
        v.fit_transform(&[set(&["a", "b"])]).unwrap();
        let x = v.transform(&[set(&["b", "never_seen"]), set(&["unknown"])]).unwrap();
        assert_eq!(x.ncols(), 2);
        assert_eq!(x.row(0).indices(), &[1]);
        assert!(x.row(1).is_empty());
        assert_eq!(v.vocabulary().unwrap().len(), 2);
    }

    #[test]
    fn test_false_flags_are_not_indexed() {
        let mut features = set(&["a"]);
        features.set("b", false);
        let mut v = DictVectorizer::new();
        v.fit_transform(&[features]).unwrap();
        assert_eq!(v.vocabulary().unwrap().names(), &["a"]);
    }

    #[test]
    fn test_transform_before_fit_errors() {
        let v = DictVectorizer::new();
        assert!(matches!(
            v.transform(&[set(&["a"])]),
            Err(ClassifierError::VectorizerNotFitted)
        ));
    }

    #[test]
    fn test_vocabulary_serde_round_trip() {
        let mut builder = VocabularyBuilder::new();
        builder.observe(&set(&["handle=alice", "moon"]));
        let vocab = builder.freeze();
        let json = serde_json::to_string(&vocab).unwrap();
        assert_eq!(json, r#"["handle=alice","moon"]"#);
        let back: Vocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.index_of("moon"), Some(1));
        assert!(serde_json::from_str::<Vocabulary>(r#"["a","a"]"#).is_err());
    }
}
