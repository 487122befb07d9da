use anyhow::Result;
use clap::ArgMatches;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use chatter_classifiers::io::TweetReaderConfig;

use crate::util::{load_json_config, validate_tsv_or_csv_file};

/// Settings of a `chatter predict` run.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PredictConfig {
    pub version: String,
    /// Directory holding a model artifact.
    pub model_dir: String,
    /// Tweet CSV to classify.
    pub input_data: String,
    /// TSV output; stdout when absent.
    pub output_file: Option<String>,
    pub reader: TweetReaderConfig,
}

impl Default for PredictConfig {
    fn default() -> Self {
        PredictConfig {
            version: clap::crate_version!().to_string(),
            model_dir: String::from("chatter_model"),
            input_data: String::new(),
            output_file: None,
            reader: TweetReaderConfig::for_prediction(),
        }
    }
}

impl PredictConfig {
    pub fn from_arguments(config_path: Option<&PathBuf>, matches: &ArgMatches) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => load_json_config(path)?,
            None => PredictConfig::default(),
        };

        if let Some(model_dir) = matches.get_one::<String>("model_dir") {
            config.model_dir = model_dir.clone();
        }
        if let Some(input_data) = matches.get_one::<String>("input_data") {
            config.input_data = input_data.clone();
        }
        if let Some(output_file) = matches.get_one::<String>("output_file") {
            config.output_file = Some(output_file.clone());
        }

        validate_tsv_or_csv_file(&config.input_data)?;
        Ok(config)
    }
}
