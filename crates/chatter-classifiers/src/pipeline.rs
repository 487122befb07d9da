//! End-to-end tweet classifier: extraction, vectorization, chi-squared
//! selection and a linear classifier behind one type.
use std::path::Path;

use ndarray::Array2;

use crate::artifact::{ModelArtifact, RunInfo};
use crate::config::{ExtractorConfig, ModelConfig};
use crate::data_handling::{labelled_records, log_input_data_summary, Record};
use crate::error::{ClassifierError, Result};
use crate::feature_selection::SelectKBest;
use crate::features::{FeatureExtractor, FeatureSet};
use crate::models::factory::{build_model, restore_model};
use crate::models::ClassifierModel;
use crate::vectorizer::{DictVectorizer, Vocabulary};

/// Number of top-scoring features reported after training.
const REPORTED_FEATURES: usize = 20;

/// Outcome of [`TweetClassificationModel::train`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSummary {
    pub run_id: String,
    pub n_records: usize,
    pub n_features: usize,
    pub n_selected: usize,
    pub classes: Vec<String>,
    /// Best selected features by chi-squared score, highest first.
    pub top_features: Vec<(String, f64)>,
}

/// The whole classification pipeline.
///
/// A fresh instance is untrained; [`train`](Self::train) or
/// [`load`](Self::load) freezes the vocabulary, selection mask and weights.
/// Afterwards the model is only read, so a shared reference can serve
/// concurrent `predict` calls.
pub struct TweetClassificationModel {
    extractor: FeatureExtractor,
    config: ModelConfig,
    vectorizer: DictVectorizer,
    selector: SelectKBest,
    classifier: Box<dyn ClassifierModel>,
    run: Option<RunInfo>,
}

impl TweetClassificationModel {
    pub fn new(config: ModelConfig, extractor_config: ExtractorConfig) -> Result<Self> {
        config.model_type.validate()?;
        Ok(TweetClassificationModel {
            extractor: FeatureExtractor::new(extractor_config)?,
            vectorizer: DictVectorizer::new(),
            selector: SelectKBest::new(config.k),
            classifier: build_model(config.model_type.clone()),
            config,
            run: None,
        })
    }

    /// Fit every stage on the labelled records of `records`.
    ///
    /// Unlabelled records are ignored. The previous state, if any, is only
    /// replaced once the whole run succeeds. Account ages are pinned to the
    /// training year, which is stored with the model.
    pub fn train(&mut self, records: &[Record]) -> Result<TrainingSummary> {
        log_input_data_summary(records);
        let (labelled, labels) = labelled_records(records);
        if labelled.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }

        let extractor = self.extractor.with_pinned_year();
        let features = extractor.extract_batch(&labelled);

        let mut vectorizer = DictVectorizer::new();
        let x = vectorizer.fit_transform(&features)?;
        log::info!("Vocabulary holds {} features", x.ncols());

        let mut selector = SelectKBest::new(self.config.k);
        selector.fit(&x, &labels)?;
        let reduced = selector.apply(&x)?;

        let mut classifier = build_model(self.config.model_type.clone());
        classifier.fit(&reduced, &labels)?;

        let run = RunInfo::generate();
        let classes = classifier.weights()?.classes().to_vec();
        let top_features = top_feature_names(&selector, &vectorizer, REPORTED_FEATURES);
        for (name, score) in &top_features {
            log::debug!("  {:<30} chi2={:.3}", name, score);
        }
        log::info!(
            "Trained {} ({}) over {} classes: {}",
            classifier.name(),
            run.run_id,
            classes.len(),
            classes.join(", ")
        );

        let summary = TrainingSummary {
            run_id: run.run_id.clone(),
            n_records: labelled.len(),
            n_features: x.ncols(),
            n_selected: reduced.ncols(),
            classes,
            top_features,
        };

        self.extractor = extractor;
        self.vectorizer = vectorizer;
        self.selector = selector;
        self.classifier = classifier;
        self.run = Some(run);
        Ok(summary)
    }

    /// Predict one label per record, in input order.
    pub fn predict(&self, records: &[Record]) -> Result<Vec<String>> {
        self.ensure_ready()?;
        let x = self.selector.apply(&self.vectorizer.transform(&self.extractor.extract_batch(records))?)?;
        self.classifier.predict(&x)
    }

    /// Per-class margins, one row per record, columns in [`classes`](Self::classes) order.
    pub fn decision_function(&self, records: &[Record]) -> Result<Array2<f64>> {
        self.ensure_ready()?;
        let x = self.selector.apply(&self.vectorizer.transform(&self.extractor.extract_batch(records))?)?;
        self.classifier.decision_function(&x)
    }

    /// Classify a single record without any batching.
    pub fn predict_one(&self, record: &Record) -> Result<String> {
        let weights = self.classifier.weights()?;
        let vocabulary = self.vocabulary()?;
        let mask = self.selector.mask()?;
        let v = vocabulary.vectorize(&self.extractor.extract(record));
        Ok(weights.predict_label(&mask.apply_vector(&v)).to_string())
    }

    /// Symbolic features of one record, as seen by the model.
    pub fn features_for(&self, record: &Record) -> FeatureSet {
        self.extractor.extract(record)
    }

    pub fn is_ready(&self) -> bool {
        self.ensure_ready().is_ok()
    }

    pub fn classes(&self) -> Result<&[String]> {
        Ok(self.classifier.weights()?.classes())
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    pub fn vocabulary(&self) -> Result<&Vocabulary> {
        self.vectorizer.vocabulary().ok_or(ClassifierError::NotReady)
    }

    /// Id of the training run the current state comes from.
    pub fn run_id(&self) -> Option<&str> {
        self.run.as_ref().map(|r| r.run_id.as_str())
    }

    /// Names of the selected features, in reduced-space order.
    pub fn selected_feature_names(&self) -> Result<Vec<&str>> {
        let vocabulary = self.vocabulary()?;
        let mask = self.selector.mask()?;
        Ok(mask
            .indices()
            .iter()
            .filter_map(|&i| vocabulary.name_of(i))
            .collect())
    }

    /// Snapshot the frozen state as an artifact.
    pub fn to_artifact(&self) -> Result<ModelArtifact> {
        self.ensure_ready()?;
        let run = self.run.clone().ok_or(ClassifierError::NotReady)?;
        ModelArtifact::new(
            run,
            self.config.clone(),
            self.extractor.config().clone(),
            self.vocabulary()?.clone(),
            self.selector.mask()?.clone(),
            self.classifier.weights()?.clone(),
        )
    }

    /// Rebuild a ready-to-predict model from an artifact.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        let (manifest, vocabulary, mask, weights) = artifact.into_parts();
        Ok(TweetClassificationModel {
            extractor: FeatureExtractor::new(manifest.extractor)?,
            vectorizer: DictVectorizer::from_vocabulary(vocabulary),
            selector: SelectKBest::from_mask(mask),
            classifier: restore_model(manifest.model.model_type.clone(), weights),
            config: manifest.model,
            run: Some(manifest.run),
        })
    }

    pub fn dump<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        self.to_artifact()?.dump(dir)
    }

    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        Self::from_artifact(ModelArtifact::load(dir)?)
    }

    fn ensure_ready(&self) -> Result<()> {
        if !self.classifier.is_ready() || !self.vectorizer.is_fitted() {
            return Err(ClassifierError::NotReady);
        }
        self.selector.mask().map(|_| ()).map_err(|_| ClassifierError::NotReady)
    }
}

fn top_feature_names(selector: &SelectKBest, vectorizer: &DictVectorizer, n: usize) -> Vec<(String, f64)> {
    let Some(vocabulary) = vectorizer.vocabulary() else {
        return Vec::new();
    };
    selector
        .top_features(n)
        .into_iter()
        .filter_map(|(i, score)| vocabulary.name_of(i).map(|name| (name.to_string(), score)))
        .collect()
}
