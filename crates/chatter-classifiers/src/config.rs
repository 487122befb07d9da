use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ClassifierError, Result};

/// Number of chi-square-selected dimensions kept when no value is configured.
pub const DEFAULT_SELECTED_FEATURES: usize = 400;

/// Central configuration for the classification model.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Number of dimensions kept by chi-square selection. Clipped to the
    /// vocabulary size when larger.
    pub k: usize,

    #[serde(flatten)]
    pub model_type: ModelType,
}

/// Supported model types and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum ModelType {
    LinearSvc {
        /// Penalty on margin violations, applied to both sides of every
        /// one-vs-rest split.
        c: f64,
        /// Stopping tolerance of the SMO solver.
        eps: f64,
        /// Let the solver drop bounded variables from the working set.
        shrinking: bool,
    },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::LinearSvc {
            c: 1.0,
            eps: 1e-3,
            shrinking: false,
        }
    }
}

impl ModelType {
    pub fn name(&self) -> &'static str {
        match self {
            ModelType::LinearSvc { .. } => "linear_svc",
        }
    }

    /// Reject hyper-parameters the solvers cannot work with.
    pub fn validate(&self) -> Result<()> {
        match self {
            ModelType::LinearSvc { c, eps, .. } => {
                if !(c.is_finite() && *c > 0.0) {
                    return Err(ClassifierError::InvalidParameter(format!(
                        "c must be a positive finite number, got {}",
                        c
                    )));
                }
                if !(eps.is_finite() && *eps > 0.0) {
                    return Err(ClassifierError::InvalidParameter(format!(
                        "eps must be a positive finite number, got {}",
                        eps
                    )));
                }
                Ok(())
            }
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear_svc" | "linearsvc" | "svc" | "svm" => Ok(ModelType::default()),
            _ => Err(format!(
                "Unknown model type: {}. Supported model types: linear_svc",
                s
            )),
        }
    }
}

impl ModelConfig {
    pub fn new(k: usize, model_type: ModelType) -> Self {
        Self { k, model_type }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_SELECTED_FEATURES,
            model_type: ModelType::default(),
        }
    }
}

/// Settings of the feature extractor.
///
/// These are stored in the model artifact so that inference extracts
/// features exactly the way training did.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Keywords whose presence in an author bio sets `bio_contains_coin_lex`.
    pub coin_lexicon: Vec<String>,
    /// Year account ages are measured against. `None` uses the current
    /// calendar year; training pins it so a saved model keeps its year.
    pub reference_year: Option<i32>,
    /// Lowercase post text before tokenizing.
    pub lowercase: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            coin_lexicon: [
                "coin", "coins", "crypto", "bitcoin", "btc", "eth", "ethereum", "blockchain",
                "token", "tokens", "hodl", "altcoin", "altcoins", "$",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            reference_year: None,
            lowercase: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_config_flattens_model_type() {
        let cfg = ModelConfig::default();
        let json = serde_json::to_value(&cfg).unwrap();
        assert_eq!(json["k"], 400);
        assert!(json.get("LinearSvc").is_some());

        let back: ModelConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_model_type_from_str() {
        assert_eq!("LinearSVC".parse::<ModelType>().unwrap(), ModelType::default());
        assert!("gbdt".parse::<ModelType>().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_c() {
        let mt = ModelType::LinearSvc {
            c: 0.0,
            eps: 0.1,
            shrinking: true,
        };
        assert!(matches!(mt.validate(), Err(ClassifierError::InvalidParameter(_))));
        let mt = ModelType::LinearSvc {
            c: 1.0,
            eps: f64::NAN,
            shrinking: false,
        };
        assert!(mt.validate().is_err());
        assert!(ModelType::default().validate().is_ok());
    }

    #[test]
    fn test_extractor_config_partial_json_uses_defaults() {
        let cfg: ExtractorConfig = serde_json::from_str(r#"{"reference_year": 2018}"#).unwrap();
        assert_eq!(cfg.reference_year, Some(2018));
        assert!(cfg.coin_lexicon.contains(&"bitcoin".to_string()));
        assert!(cfg.lowercase);
    }
}
