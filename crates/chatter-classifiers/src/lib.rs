//! chatter-classifiers: short-post classification.
//!
//! The crate turns tweets into hand-engineered symbolic features, maps them
//! onto a frozen vocabulary, keeps the most label-discriminative dimensions by
//! chi-squared score and classifies with a one-vs-rest linear SVM. A trained
//! model is persisted as a versioned artifact directory and reloaded for
//! deterministic inference.
//!
//! ```no_run
//! use chatter_classifiers::{ExtractorConfig, ModelConfig, Record, TweetClassificationModel};
//!
//! # fn main() -> chatter_classifiers::Result<()> {
//! let mut model = TweetClassificationModel::new(ModelConfig::default(), ExtractorConfig::default())?;
//! model.train(&[
//!     Record::new("alice", "to the moon #btc").with_label("bull"),
//!     Record::new("bob", "selling everything").with_label("bear"),
//! ])?;
//! model.dump("model")?;
//!
//! let restored = TweetClassificationModel::load("model")?;
//! let label = restored.predict_one(&Record::new("carol", "to the moon"))?;
//! # Ok(())
//! # }
//! ```
pub mod artifact;
pub mod config;
pub mod data_handling;
pub mod error;
pub mod feature_selection;
pub mod features;
pub mod io;
pub mod math;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod vectorizer;

pub use artifact::ModelArtifact;
pub use config::{ExtractorConfig, ModelConfig, ModelType};
pub use data_handling::Record;
pub use error::{ClassifierError, Result};
pub use features::{FeatureExtractor, FeatureSet};
pub use pipeline::{TrainingSummary, TweetClassificationModel};
