use anyhow::{Context, Result};

use chatter_classifiers::io::read_tweets_csv_with_config;
use chatter_classifiers::metrics::{classification_report, ClassificationReport};
use chatter_classifiers::{TrainingSummary, TweetClassificationModel};

use crate::train::input::TrainConfig;

/// What a training run produced.
#[derive(Debug)]
pub struct TrainingOutcome {
    pub summary: TrainingSummary,
    /// Fit of the model on its own training data.
    pub training_report: ClassificationReport,
    pub ambiguous_rows: Vec<usize>,
}

/// Read the training CSV, fit the pipeline and write the artifact.
pub fn run_training(config: &TrainConfig) -> Result<TrainingOutcome> {
    let data = read_tweets_csv_with_config(&config.train_data, &config.reader)?;

    let mut model = TweetClassificationModel::new(config.model.clone(), config.extractor.clone())
        .context("Invalid model configuration")?;
    let summary = model
        .train(&data.records)
        .with_context(|| format!("Training on {} failed", config.train_data))?;

    let labelled: Vec<_> = data.records.iter().filter(|r| r.is_labelled()).cloned().collect();
    let gold: Vec<String> = labelled.iter().filter_map(|r| r.label.clone()).collect();
    let predicted = model.predict(&labelled)?;
    let training_report = classification_report(&gold, &predicted)?;
    log::info!("Training accuracy: {:.3}", training_report.accuracy);

    model
        .dump(&config.output_dir)
        .with_context(|| format!("Failed to write model to {}", config.output_dir))?;

    Ok(TrainingOutcome {
        summary,
        training_report,
        ambiguous_rows: data.ambiguous_rows,
    })
}
