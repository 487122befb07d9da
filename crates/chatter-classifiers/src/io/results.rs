//! Tab-separated prediction output: `label, handle, text` per record.
use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::data_handling::Record;

/// Write one `(predicted label, handle, text)` row per record.
///
/// When `with_header` is set a `predicted, handle, text` header row comes
/// first. Embedded tabs and newlines in the text are replaced by spaces so
/// every prediction stays on one line.
pub fn write_predictions<W: Write>(
    writer: W,
    records: &[Record],
    labels: &[String],
    with_header: bool,
) -> Result<()> {
    if records.len() != labels.len() {
        bail!("{} records but {} predicted labels", records.len(), labels.len());
    }
    let mut tsv = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);

    if with_header {
        tsv.write_record(["predicted", "handle", "text"])
            .context("Failed to write result header")?;
    }
    for (record, label) in records.iter().zip(labels) {
        tsv.write_record([label.as_str(), single_line(&record.handle).as_str(), single_line(&record.text).as_str()])
            .with_context(|| format!("Failed to write prediction for '{}'", record.handle))?;
    }
    tsv.flush().context("Failed to flush results")?;
    Ok(())
}

/// Write predictions to a file, replacing it if present.
pub fn write_predictions_file<P: AsRef<Path>>(path: P, records: &[Record], labels: &[String]) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create result file: {}", path.display()))?;
    write_predictions(std::io::BufWriter::new(file), records, labels, true)?;
    log::info!("Wrote {} predictions to {}", labels.len(), path.display());
    Ok(())
}

fn single_line(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}
