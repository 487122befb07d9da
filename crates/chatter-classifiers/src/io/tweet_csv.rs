//! Labelled tweet CSV reader.
//!
//! The expected layout is a header row followed by one tweet per row:
//!
//! ```text
//! handle,text,time,name,id,bull,bear,neutral
//! alice,To the moon,Mon Jan 01 00:00:00 +0000 2018,Alice,1,x,,
//! ```
//!
//! Every column from `label_start` to the end of the row is a one-hot label
//! indicator named by its header. Author metadata columns are looked up by
//! name and are never part of the label block.
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use csv::StringRecord;
use serde::{Deserialize, Serialize};

use crate::data_handling::Record;

const TIMESTAMP_FORMATS: [&str; 2] = ["%a %b %d %H:%M:%S %z %Y", "%Y-%m-%d %H:%M:%S"];

/// Parsed CSV content.
#[derive(Debug, Clone, Default)]
pub struct TweetData {
    pub records: Vec<Record>,
    /// Label column headers, in file order.
    pub classes: Vec<String>,
    /// 1-based data row numbers holding more than one label marker.
    pub ambiguous_rows: Vec<usize>,
}

/// Configuration for reading tweet CSV files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweetReaderConfig {
    pub handle_column: String,
    pub text_column: String,
    pub id_column: String,
    pub description_column: String,
    pub followers_column: String,
    pub user_created_column: String,
    /// Index of the first label indicator column.
    pub label_start: usize,
    pub delimiter: char,
    /// Keep rows without any label marker. Training reads drop them.
    pub keep_unlabelled: bool,
}

impl Default for TweetReaderConfig {
    fn default() -> Self {
        Self {
            handle_column: "handle".to_string(),
            text_column: "text".to_string(),
            id_column: "id".to_string(),
            description_column: "description".to_string(),
            followers_column: "followers".to_string(),
            user_created_column: "user_created".to_string(),
            label_start: 5,
            delimiter: ',',
            keep_unlabelled: false,
        }
    }
}

impl TweetReaderConfig {
    /// Reader settings for scoring: unlabelled rows are kept.
    pub fn for_prediction() -> Self {
        Self {
            keep_unlabelled: true,
            ..Self::default()
        }
    }
}

struct Columns {
    handle: usize,
    text: usize,
    id: Option<usize>,
    description: Option<usize>,
    followers: Option<usize>,
    user_created: Option<usize>,
    labels: Vec<usize>,
}

/// Read a tweet CSV file with the default (training) configuration.
pub fn read_tweets_csv<P: AsRef<Path>>(path: P) -> Result<TweetData> {
    read_tweets_csv_with_config(path, &TweetReaderConfig::default())
}

/// Read a tweet CSV file using a custom configuration.
pub fn read_tweets_csv_with_config<P: AsRef<Path>>(path: P, config: &TweetReaderConfig) -> Result<TweetData> {
    let path = path.as_ref();
    if !config.delimiter.is_ascii() {
        bail!("Delimiter must be a single ASCII character, got '{}'", config.delimiter);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open tweet file: {}", path.display()))?;

    let headers = reader
        .headers()
        .context("Failed to read tweet header row")?
        .clone();
    let columns = resolve_columns(&headers, config)?;
    let classes: Vec<String> = columns
        .labels
        .iter()
        .map(|&idx| headers.get(idx).unwrap_or_default().trim().to_string())
        .collect();
    if classes.is_empty() {
        log::warn!(
            "No label columns at or after column {} in {}",
            config.label_start,
            path.display()
        );
    }

    let mut data = TweetData {
        classes,
        ..TweetData::default()
    };
    let mut dropped = 0;

    for (row_idx, result) in reader.records().enumerate() {
        let row_number = row_idx + 1;
        let row = result.with_context(|| format!("Failed to read row {}", row_number))?;

        let handle = row
            .get(columns.handle)
            .ok_or_else(|| anyhow!("Missing handle at row {}", row_number))?
            .trim()
            .to_string();
        let text = row
            .get(columns.text)
            .ok_or_else(|| anyhow!("Missing text at row {}", row_number))?
            .to_string();

        let markers: Vec<usize> = columns
            .labels
            .iter()
            .enumerate()
            .filter(|(_, &idx)| is_marker(row.get(idx).unwrap_or_default()))
            .map(|(class, _)| class)
            .collect();
        if markers.len() > 1 {
            log::warn!(
                "Row {} is marked for {} labels; keeping '{}'",
                row_number,
                markers.len(),
                data.classes[markers[0]]
            );
            data.ambiguous_rows.push(row_number);
        }
        let label = markers.first().map(|&class| data.classes[class].clone());

        if label.is_none() && !config.keep_unlabelled {
            dropped += 1;
            continue;
        }

        let mut record = Record::new(handle, text);
        record.label = label;
        record.id = non_empty(&row, columns.id).map(str::to_string);
        record.description = non_empty(&row, columns.description).map(str::to_string);
        record.followers = non_empty(&row, columns.followers).and_then(|v| parse_followers(v, row_number));
        record.user_created = non_empty(&row, columns.user_created).and_then(|v| {
            let parsed = parse_timestamp(v);
            if parsed.is_none() {
                log::warn!("Unparseable account creation time '{}' at row {}", v, row_number);
            }
            parsed
        });
        data.records.push(record);
    }

    log::info!(
        "Read {} tweets from {} ({} classes, {} ambiguous rows, {} unlabelled rows dropped)",
        data.records.len(),
        path.display(),
        data.classes.len(),
        data.ambiguous_rows.len(),
        dropped
    );
    Ok(data)
}

/// Parse the timestamp formats seen in tweet exports.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_str(value, TIMESTAMP_FORMATS[0]) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMATS[1]) {
        return Some(ts.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
}

fn parse_followers(value: &str, row_number: usize) -> Option<u64> {
    match value.replace(',', "").parse::<u64>() {
        Ok(count) => Some(count),
        Err(_) => {
            log::warn!("Non-numeric follower count '{}' at row {}", value, row_number);
            None
        }
    }
}

fn is_marker(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != "0"
}

fn non_empty(row: &StringRecord, idx: Option<usize>) -> Option<&str> {
    idx.and_then(|i| row.get(i))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn resolve_columns(headers: &StringRecord, config: &TweetReaderConfig) -> Result<Columns> {
    // Named lookup first, then the positional layout of plain exports
    let handle = find_column(headers, &config.handle_column).unwrap_or(0);
    let text = find_column(headers, &config.text_column).unwrap_or(1);
    if headers.len() <= text.max(handle) {
        bail!(
            "Tweet header has {} columns; expected at least handle and text",
            headers.len()
        );
    }

    let id = find_column(headers, &config.id_column);
    let description = find_column(headers, &config.description_column);
    let followers = find_column(headers, &config.followers_column);
    let user_created = find_column(headers, &config.user_created_column);

    let reserved = [Some(handle), Some(text), id, description, followers, user_created];
    let labels = (config.label_start..headers.len())
        .filter(|idx| !reserved.contains(&Some(*idx)))
        .collect();

    Ok(Columns {
        handle,
        text,
        id,
        description,
        followers,
        user_created,
        labels,
    })
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
}
