//! Integration tests for CLI config parsing and util helpers.

use chatter_cli::predict::input::PredictConfig;
use chatter_cli::train::input::TrainConfig;
use chatter_cli::util::{load_json_config, validate_tsv_or_csv_file};

// ---------------------------------------------------------------------------
// validate_tsv_or_csv_file
// ---------------------------------------------------------------------------

#[test]
fn validate_tsv_file_exists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.tsv");
    std::fs::File::create(&path).unwrap();
    assert!(validate_tsv_or_csv_file(path.to_str().unwrap()).is_ok());
}

#[test]
fn validate_csv_file_exists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.csv");
    std::fs::File::create(&path).unwrap();
    assert!(validate_tsv_or_csv_file(path.to_str().unwrap()).is_ok());
}

#[test]
fn validate_wrong_extension_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.txt");
    std::fs::File::create(&path).unwrap();
    assert!(validate_tsv_or_csv_file(path.to_str().unwrap()).is_err());
}

#[test]
fn validate_nonexistent_file_errors() {
    assert!(validate_tsv_or_csv_file("/nonexistent/path/data.tsv").is_err());
}

// ---------------------------------------------------------------------------
// TrainConfig / PredictConfig
// ---------------------------------------------------------------------------

#[test]
fn train_config_default_values() {
    let cfg = TrainConfig::default();
    assert_eq!(cfg.model.k, 400);
    assert_eq!(cfg.output_dir, "chatter_model");
    assert_eq!(cfg.reader.label_start, 5);
    assert!(!cfg.reader.keep_unlabelled);
}

#[test]
fn predict_config_keeps_unlabelled_rows() {
    let cfg = PredictConfig::default();
    assert!(cfg.reader.keep_unlabelled);
    assert!(cfg.output_file.is_none());
}

#[test]
fn train_config_round_trips_json() {
    let cfg = TrainConfig::default();
    let json = serde_json::to_string(&cfg).unwrap();
    let cfg2: TrainConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(cfg, cfg2);
}

#[test]
fn partial_config_file_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("train.json");
    std::fs::write(
        &path,
        r#"{"train_data": "tweets.csv", "model": {"k": 25, "LinearSvc": {"c": 0.5, "eps": 0.001, "shrinking": true}}}"#,
    )
    .unwrap();

    let cfg: TrainConfig = load_json_config(&path).unwrap();
    assert_eq!(cfg.train_data, "tweets.csv");
    assert_eq!(cfg.model.k, 25);
    assert_eq!(cfg.output_dir, "chatter_model");
    assert_eq!(cfg.extractor, Default::default());
}

#[test]
fn malformed_config_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = load_json_config::<PredictConfig, _>(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse config"));
}
