//! Live classification of JSON-lines records.
use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use chatter_classifiers::{Record, TweetClassificationModel};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StreamStats {
    pub classified: usize,
    pub skipped: usize,
}

/// Classify one JSON record per input line, writing one label per line.
///
/// Blank lines are ignored. Lines that are not a valid record are logged and
/// skipped without stopping the stream.
pub fn run_stream<R: BufRead, W: Write>(
    model: &TweetClassificationModel,
    input: R,
    mut output: W,
) -> Result<StreamStats> {
    let mut stats = StreamStats::default();
    for (line_idx, line) in input.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read input line {}", line_idx + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: Record = match serde_json::from_str(&line) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Skipping line {}: {}", line_idx + 1, e);
                stats.skipped += 1;
                continue;
            }
        };
        let label = model.predict_one(&record)?;
        writeln!(output, "{}", label).context("Failed to write label")?;
        output.flush().context("Failed to flush output")?;
        stats.classified += 1;
    }
    Ok(stats)
}
