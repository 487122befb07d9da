//! Data structures for the posts flowing through the classifier.
//!
//! A [`Record`] is one post with its author metadata and an optional gold
//! label. Records are created by a loader (CSV, stdin JSON lines, tests) and
//! are never mutated by the pipeline.
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One social-media post with author metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Author handle (screen name)
    pub handle: String,
    /// Post body
    #[serde(default)]
    pub text: String,
    /// Free-text author bio
    #[serde(default)]
    pub description: Option<String>,
    /// Author follower count
    #[serde(default)]
    pub followers: Option<u64>,
    /// Author account creation timestamp
    #[serde(default)]
    pub user_created: Option<DateTime<Utc>>,
    /// Source identifier of the post, carried through to the result sink
    #[serde(default)]
    pub id: Option<String>,
    /// Gold label, when annotated
    #[serde(default)]
    pub label: Option<String>,
}

impl Record {
    pub fn new(handle: impl Into<String>, text: impl Into<String>) -> Self {
        Record {
            handle: handle.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_followers(mut self, followers: u64) -> Self {
        self.followers = Some(followers);
        self
    }

    pub fn with_user_created(mut self, user_created: DateTime<Utc>) -> Self {
        self.user_created = Some(user_created);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn is_labelled(&self) -> bool {
        self.label.is_some()
    }
}

/// Split a batch into the labelled records and their labels.
///
/// Records without a gold label are skipped; they can still be scored but
/// never take part in training.
pub fn labelled_records(records: &[Record]) -> (Vec<&Record>, Vec<String>) {
    records
        .iter()
        .filter_map(|r| r.label.as_ref().map(|label| (r, label.clone())))
        .unzip()
}

/// Map string labels to dense class indices.
///
/// Classes are sorted, so the same label set always produces the same
/// numbering. Returns the class table and one index per input label.
pub fn encode_labels<S: AsRef<str>>(labels: &[S]) -> (Vec<String>, Vec<usize>) {
    let mut classes: Vec<String> = labels.iter().map(|l| l.as_ref().to_string()).collect();
    classes.sort();
    classes.dedup();
    let encoded = labels
        .iter()
        .map(|l| {
            classes
                .binary_search_by(|c| c.as_str().cmp(l.as_ref()))
                .unwrap_or_default()
        })
        .collect();
    (classes, encoded)
}

/// Count records per gold label, in label order.
pub fn label_counts(records: &[Record]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for label in records.iter().filter_map(|r| r.label.as_ref()) {
        *counts.entry(label.clone()).or_insert(0) += 1;
    }
    counts
}

pub fn log_input_data_summary(records: &[Record]) {
    let counts = label_counts(records);
    let labelled: usize = counts.values().sum();
    log::info!(
        "{} records ({} labelled, {} unlabelled)",
        records.len(),
        labelled,
        records.len() - labelled
    );
    for (label, count) in &counts {
        log::info!("  {}: {}", label, count);
    }
}
