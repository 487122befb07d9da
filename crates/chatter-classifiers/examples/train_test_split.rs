//! Train on a random share of a labelled tweet CSV and evaluate on the rest.
//!
//! ```text
//! cargo run -p chatter-classifiers --example train_test_split -- tweets.csv [test_fraction]
//! ```
use anyhow::{anyhow, Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use chatter_classifiers::io::read_tweets_csv;
use chatter_classifiers::metrics::classification_report;
use chatter_classifiers::{ExtractorConfig, ModelConfig, TweetClassificationModel};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .ok_or_else(|| anyhow!("usage: train_test_split <tweets.csv> [test_fraction]"))?;
    let test_fraction: f64 = match args.next() {
        Some(v) => v.parse().context("test_fraction must be a number")?,
        None => 0.2,
    };

    let mut data = read_tweets_csv(&path)?;
    data.records.shuffle(&mut StdRng::seed_from_u64(42));
    let n_test = ((data.records.len() as f64) * test_fraction).round() as usize;
    let (test, train) = data.records.split_at(n_test);

    let mut model = TweetClassificationModel::new(ModelConfig::default(), ExtractorConfig::default())?;
    let summary = model.train(train)?;
    println!(
        "Trained on {} tweets: {} features, {} selected",
        summary.n_records, summary.n_features, summary.n_selected
    );
    for (name, score) in summary.top_features.iter().take(10) {
        println!("  {:<30} {:.3}", name, score);
    }

    let gold: Vec<String> = test.iter().filter_map(|r| r.label.clone()).collect();
    let predicted = model.predict(test)?;
    println!("{}", classification_report(&gold, &predicted)?);
    Ok(())
}
