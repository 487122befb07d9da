use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::io;
use std::path::PathBuf;

use chatter_classifiers::TweetClassificationModel;
use chatter_cli::predict::inference;
use chatter_cli::predict::input::PredictConfig;
use chatter_cli::stream::run_stream;
use chatter_cli::train::input::TrainConfig;
use chatter_cli::train::trainer;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("CHATTER_LOG", "error,chatter=info"))
        .init();

    let matches = Command::new("chatter")
        .version(clap::crate_version!())
        .author("Justin Sing <justincsing@gmail.com>")
        .about("chatter CLI - train and run short-post classifiers")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("train")
                .about("Train a classifier from a labelled tweet CSV and write the model artifact")
                .arg(
                    Arg::new("config")
                        .help("Path to training configuration file. Prints a template when omitted.")
                        .required(false)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("train_data")
                        .short('d')
                        .long("train_data")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help(
                            "Path to the labelled tweet CSV. Overrides the training data file \
                             specified in the configuration file.",
                        )
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_dir")
                        .short('o')
                        .long("output_dir")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help("Directory the model artifact is written to.")
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("k")
                        .short('k')
                        .long("k")
                        .help("Number of chi-squared selected features to keep.")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("model_type")
                        .long("model-type")
                        .help("Override the model type from the JSON config.")
                        .value_parser(["linear_svc"])
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("c")
                        .short('c')
                        .long("c")
                        .help("Penalty on margin violations of the linear SVM.")
                        .value_parser(clap::value_parser!(f64)),
                ),
        )
        .subcommand(
            Command::new("predict")
                .about("Classify a tweet CSV with a trained model and write TSV results")
                .arg(
                    Arg::new("config")
                        .help("Path to prediction configuration file. Prints a template when omitted.")
                        .required(false)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("model_dir")
                        .short('m')
                        .long("model")
                        .help("Directory holding the model artifact")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("input_data")
                        .short('d')
                        .long("input_data")
                        .help("Path to the tweet CSV to classify")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output_file")
                        .help("Path to the TSV output file. Defaults to stdout.")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("stream")
                .about("Classify JSON-lines records from stdin, one label per line")
                .arg(
                    Arg::new("model_dir")
                        .short('m')
                        .long("model")
                        .help("Directory holding the model artifact")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::DirPath),
                ),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Written by {author-with-newline}Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    match matches.subcommand() {
        Some(("train", sub_m)) => handle_train(sub_m),
        Some(("predict", sub_m)) => handle_predict(sub_m),
        Some(("stream", sub_m)) => handle_stream(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_train(matches: &ArgMatches) -> Result<()> {
    let config_path: Option<&PathBuf> = matches.get_one("config");
    if config_path.is_none() && matches.get_one::<String>("train_data").is_none() {
        eprintln!("[chatter::train] No config file provided; default config template:");
        println!("{}", serde_json::to_string_pretty(&TrainConfig::default())?);
        return Ok(());
    }

    let params = TrainConfig::from_arguments(config_path, matches)?;
    log::info!("[chatter::train] Training from {}", params.train_data);

    match trainer::run_training(&params) {
        Ok(outcome) => {
            eprintln!(
                "[chatter::train] Trained run {} on {} tweets ({} features, {} selected, classes: {})",
                outcome.summary.run_id,
                outcome.summary.n_records,
                outcome.summary.n_features,
                outcome.summary.n_selected,
                outcome.summary.classes.join(", ")
            );
            if !outcome.ambiguous_rows.is_empty() {
                eprintln!(
                    "[chatter::train] {} rows carried several labels: {:?}",
                    outcome.ambiguous_rows.len(),
                    outcome.ambiguous_rows
                );
            }
            eprintln!("[chatter::train] Training fit:\n{}", outcome.training_report);
            eprintln!("[chatter::train] Model written to {}", params.output_dir);
            Ok(())
        }
        Err(e) => {
            log::error!("Training failed: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn handle_predict(matches: &ArgMatches) -> Result<()> {
    let config_path: Option<&PathBuf> = matches.get_one("config");
    if config_path.is_none() && matches.get_one::<String>("input_data").is_none() {
        eprintln!("[chatter::predict] No config file provided; default config template:");
        println!("{}", serde_json::to_string_pretty(&PredictConfig::default())?);
        return Ok(());
    }

    let params = PredictConfig::from_arguments(config_path, matches)?;
    match inference::run_inference(&params) {
        Ok(outcome) => {
            eprintln!("[chatter::predict] Classified {} tweets.", outcome.n_predicted);
            if let Some(report) = outcome.report {
                eprintln!("[chatter::predict] Evaluation against gold labels:\n{}", report);
            }
            Ok(())
        }
        Err(e) => {
            log::error!("Prediction failed: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn handle_stream(matches: &ArgMatches) -> Result<()> {
    let model_dir: &PathBuf = matches
        .get_one("model_dir")
        .context("--model is required")?;
    let model = TweetClassificationModel::load(model_dir)
        .with_context(|| format!("Failed to load model from {}", model_dir.display()))?;

    let stats = run_stream(&model, io::stdin().lock(), io::stdout().lock())?;
    log::info!(
        "[chatter::stream] Classified {} records, skipped {} malformed lines",
        stats.classified,
        stats.skipped
    );
    Ok(())
}
