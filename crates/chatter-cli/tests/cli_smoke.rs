//! CLI binary smoke tests using assert_cmd.
//!
//! These tests exercise the compiled `chatter` binary to verify that
//! argument parsing, config templates, the train/predict round trip and the
//! stdin stream work end-to-end.

use assert_cmd::Command;
use predicates::prelude::*;

const TWEETS: &str = "\
handle,text,time,name,id,bull,bear
alice,To the moon #btc,t,Alice,1,x,
amber,Moon soon,t,Amber,2,x,
bob,Selling everything,t,Bob,3,,x
brad,Selling it all,t,Brad,4,,x
";

fn cmd() -> Command {
    Command::cargo_bin("chatter").unwrap()
}

// ---------------------------------------------------------------------------
// Top-level
// ---------------------------------------------------------------------------

#[test]
fn no_args_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("train"))
        .stdout(predicate::str::contains("predict"))
        .stdout(predicate::str::contains("stream"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("chatter"));
}

// ---------------------------------------------------------------------------
// Templates and argument errors
// ---------------------------------------------------------------------------

#[test]
fn train_no_config_prints_template() {
    cmd()
        .arg("train")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"train_data\""))
        .stdout(predicate::str::contains("\"coin_lexicon\""))
        .stderr(predicate::str::contains("No config file provided"));
}

#[test]
fn predict_no_config_prints_template() {
    cmd()
        .arg("predict")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"model_dir\""))
        .stdout(predicate::str::contains("\"input_data\""))
        .stderr(predicate::str::contains("No config file provided"));
}

#[test]
fn train_nonexistent_config_errors() {
    cmd()
        .args(["train", "/nonexistent/config.json"])
        .assert()
        .failure();
}

#[test]
fn stream_requires_model() {
    cmd().arg("stream").assert().failure();
}

#[test]
fn stream_missing_model_dir_errors() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .args(["stream", "--model"])
        .arg(dir.path().join("missing"))
        .write_stdin("{\"handle\":\"x\",\"text\":\"y\"}\n")
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// Train -> predict -> stream
// ---------------------------------------------------------------------------

#[test]
fn train_then_predict_and_stream() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("tweets.csv");
    std::fs::write(&data, TWEETS).unwrap();
    let model_dir = dir.path().join("model");

    cmd()
        .args(["train", "--train_data"])
        .arg(&data)
        .arg("--output_dir")
        .arg(&model_dir)
        .args(["-k", "50", "-c", "2.0"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Model written to"));
    assert!(model_dir.join("manifest.json").exists());

    cmd()
        .args(["predict", "--model"])
        .arg(&model_dir)
        .arg("--input_data")
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("bull\talice\tTo the moon #btc"))
        .stdout(predicate::str::contains("bear\tbob\tSelling everything"))
        .stderr(predicate::str::contains("Classified 4 tweets"));

    let results = dir.path().join("out.tsv");
    cmd()
        .args(["predict", "--model"])
        .arg(&model_dir)
        .arg("--input_data")
        .arg(&data)
        .arg("--output_file")
        .arg(&results)
        .assert()
        .success();
    let written = std::fs::read_to_string(&results).unwrap();
    assert!(written.starts_with("predicted\thandle\ttext\n"));
    assert_eq!(written.lines().count(), 5);

    cmd()
        .args(["stream", "--model"])
        .arg(&model_dir)
        .write_stdin(
            "{\"handle\":\"alice\",\"text\":\"TO THE MOON #btc\"}\n\
             {\"handle\":\"bob\",\"text\":\"selling everything\"}\n",
        )
        .assert()
        .success()
        .stdout("bull\nbear\n");
}
