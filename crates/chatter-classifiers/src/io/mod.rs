//! IO adapters around the pipeline: tweet CSV input and TSV result output.

pub mod results;
pub mod tweet_csv;

pub use results::{write_predictions, write_predictions_file};
pub use tweet_csv::{read_tweets_csv, read_tweets_csv_with_config, TweetData, TweetReaderConfig};
