use anyhow::{Context, Result};

use chatter_classifiers::io::{read_tweets_csv_with_config, write_predictions};
use chatter_classifiers::metrics::{classification_report, ClassificationReport};
use chatter_classifiers::TweetClassificationModel;

use crate::predict::input::PredictConfig;
use crate::util::open_output;

#[derive(Debug)]
pub struct InferenceOutcome {
    pub n_predicted: usize,
    /// Evaluation on the rows that carry a gold label, if any.
    pub report: Option<ClassificationReport>,
}

/// Load the artifact, classify the input CSV and write the TSV results.
pub fn run_inference(config: &PredictConfig) -> Result<InferenceOutcome> {
    let model = TweetClassificationModel::load(&config.model_dir)
        .with_context(|| format!("Failed to load model from {}", config.model_dir))?;
    let data = read_tweets_csv_with_config(&config.input_data, &config.reader)?;

    let predicted = model.predict(&data.records)?;
    let writer = open_output(config.output_file.as_deref())?;
    write_predictions(writer, &data.records, &predicted, config.output_file.is_some())?;

    let (gold, scored): (Vec<String>, Vec<String>) = data
        .records
        .iter()
        .zip(&predicted)
        .filter_map(|(r, p)| r.label.clone().map(|g| (g, p.clone())))
        .unzip();
    let report = if gold.is_empty() {
        None
    } else {
        Some(classification_report(&gold, &scored)?)
    };

    Ok(InferenceOutcome {
        n_predicted: predicted.len(),
        report,
    })
}
