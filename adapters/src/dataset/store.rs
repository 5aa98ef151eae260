use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use corelib::{Bar, TIMESTAMP_FORMAT};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::errors::DatasetError;

pub const REQUIRED_COLUMNS: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

/// Some writers emit ISO `T` separators; accepted on read, never written.
const ISO_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Volume")]
    volume: f64,
}

impl From<&Bar> for CsvRow {
    fn from(b: &Bar) -> Self {
        Self {
            date: b.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            open: b.open,
            high: b.high,
            low: b.low,
            close: b.close,
            volume: b.volume,
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, ISO_TIMESTAMP_FORMAT))
        .ok()
}

/// The on-disk rolling dataset.
#[derive(Debug, Clone)]
pub struct CsvDataset {
    path: PathBuf,
}

impl CsvDataset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads every row, sorted oldest first (stable for equal timestamps).
    ///
    /// Any malformed row fails the load; nothing is skipped.
    #[instrument(skip(self), fields(path = %self.path.display()), level = "debug")]
    pub fn load(&self) -> Result<Vec<Bar>, DatasetError> {
        if !self.exists() {
            return Err(DatasetError::NotFound(self.path.clone()));
        }

        let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_path(&self.path)?;
        let headers = reader.headers()?.clone();
        check_columns(&headers)?;

        let mut bars = Vec::new();
        for result in reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            let row: CsvRow = record
                .deserialize(Some(&headers))
                .map_err(|e| DatasetError::InvalidRow {
                    line,
                    reason: e.to_string(),
                })?;

            let timestamp = parse_timestamp(&row.date).ok_or_else(|| DatasetError::InvalidRow {
                line,
                reason: format!("unparseable Date '{}'", row.date),
            })?;

            bars.push(Bar {
                timestamp,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            });
        }

        bars.sort_by_key(|b| b.timestamp);

        debug!(rows = bars.len(), "dataset loaded");
        Ok(bars)
    }

    /// Replaces the file with `bars`, creating parent directories as needed.
    #[instrument(skip(self, bars), fields(path = %self.path.display(), rows = bars.len()))]
    pub fn save(&self, bars: &[Bar]) -> Result<(), DatasetError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = WriterBuilder::new().from_path(&self.path)?;

        if bars.is_empty() {
            writer.write_record(REQUIRED_COLUMNS)?;
        }
        for b in bars {
            writer.serialize(CsvRow::from(b))?;
        }
        writer.flush()?;

        info!(rows = bars.len(), "dataset written");
        Ok(())
    }
}

fn check_columns(headers: &StringRecord) -> Result<(), DatasetError> {
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(DatasetError::MissingColumn(required));
        }
    }
    Ok(())
}
