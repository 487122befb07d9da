use thiserror::Error;

/// Errors raised by the classification pipeline.
///
/// Misuse of the pipeline (predicting before training, applying an unfitted
/// selector) is always reported through a dedicated variant so callers can
/// tell it apart from I/O or data problems.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("model not ready: train a model or load an artifact before calling predict")]
    NotReady,

    #[error("feature selector has not been fitted")]
    SelectionNotFitted,

    #[error("vectorizer has not been fitted")]
    VectorizerNotFitted,

    #[error("training requires at least one labelled record")]
    EmptyTrainingSet,

    #[error("feature matrix has {rows} rows but {labels} labels were supplied")]
    LengthMismatch { rows: usize, labels: usize },

    #[error("expected vectors with {expected} dimensions, got {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("invalid model parameter: {0}")]
    InvalidParameter(String),

    #[error("unsupported artifact version {found} (this build reads version {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("artifact component '{component}' belongs to training run {found}, manifest expects {expected}")]
    ArtifactMismatch {
        component: &'static str,
        expected: String,
        found: String,
    },

    #[error("inconsistent model artifact: {0}")]
    InconsistentArtifact(String),

    #[error("SVM training failed: {0}")]
    Svm(#[from] linfa_svm::SvmError),

    #[error("invalid normalization pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClassifierError>;
