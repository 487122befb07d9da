use anyhow::Result;
use clap::ArgMatches;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use chatter_classifiers::config::{ExtractorConfig, ModelConfig, ModelType};
use chatter_classifiers::io::TweetReaderConfig;

use crate::util::{load_json_config, validate_tsv_or_csv_file};

/// Settings of a `chatter train` run.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct TrainConfig {
    pub version: String,
    /// Labelled tweet CSV.
    pub train_data: String,
    /// Directory the model artifact is written to.
    pub output_dir: String,
    pub model: ModelConfig,
    pub extractor: ExtractorConfig,
    pub reader: TweetReaderConfig,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            version: clap::crate_version!().to_string(),
            train_data: String::new(),
            output_dir: String::from("chatter_model"),
            model: ModelConfig::default(),
            extractor: ExtractorConfig::default(),
            reader: TweetReaderConfig::default(),
        }
    }
}

impl TrainConfig {
    /// Load the config file (or defaults) and apply command-line overrides.
    pub fn from_arguments(config_path: Option<&PathBuf>, matches: &ArgMatches) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => load_json_config(path)?,
            None => TrainConfig::default(),
        };

        if let Some(train_data) = matches.get_one::<String>("train_data") {
            config.train_data = train_data.clone();
        }
        if let Some(output_dir) = matches.get_one::<String>("output_dir") {
            config.output_dir = output_dir.clone();
        }
        if let Some(k) = matches.get_one::<usize>("k") {
            config.model.k = *k;
        }
        if let Some(model_type) = matches.get_one::<String>("model_type") {
            config.model.model_type = ModelType::from_str(model_type).map_err(anyhow::Error::msg)?;
        }
        if let Some(c) = matches.get_one::<f64>("c") {
            let ModelType::LinearSvc { c: current, .. } = &mut config.model.model_type;
            *current = *c;
        }

        validate_tsv_or_csv_file(&config.train_data)?;
        config.model.model_type.validate()?;
        Ok(config)
    }
}
