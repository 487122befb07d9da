use crate::config::ModelType;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::linear_svc::LinearSvc;
use crate::models::weights::Weights;

/// Build an untrained boxed classifier from a `ModelType`.
/// Currently this is a thin factory implemented as a single function.
pub fn build_model(model_type: ModelType) -> Box<dyn ClassifierModel> {
    match model_type {
        ModelType::LinearSvc { .. } => Box::new(LinearSvc::new(model_type)),
    }
}

/// Rebuild a ready-to-predict classifier around weights restored from an artifact.
pub fn restore_model(model_type: ModelType, weights: Weights) -> Box<dyn ClassifierModel> {
    match model_type {
        ModelType::LinearSvc { .. } => Box::new(LinearSvc::from_weights(model_type, weights)),
    }
}
