//! Dataset bootstrap and incremental update jobs.
//!
//! Both jobs make exactly one request and never retry; a failed request
//! leaves the file as it was.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::dataset::{CsvDataset, DatasetError, merge_rolling};
use crate::fmp::{DateRange, FmpError, PriceSource};

/// Rows kept by the initial load: two days of minute bars.
pub const BOOTSTRAP_ROWS: usize = 2880;

/// Rows kept by each update: one day of minute bars.
pub const ROLLING_ROWS: usize = 1440;

/// Calendar days requested by the initial load.
pub const BOOTSTRAP_LOOKBACK_DAYS: i64 = 2;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Source(#[from] FmpError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The source returned nothing; the dataset was not touched.
    NoData,

    /// The dataset was rewritten.
    Written {
        rows: usize,
        oldest: Option<NaiveDateTime>,
        newest: Option<NaiveDateTime>,
    },
}

fn written(bars: &[corelib::Bar]) -> SyncOutcome {
    SyncOutcome::Written {
        rows: bars.len(),
        oldest: bars.first().map(|b| b.timestamp),
        newest: bars.last().map(|b| b.timestamp),
    }
}

/// Creates (or overwrites) the dataset from the last
/// [`BOOTSTRAP_LOOKBACK_DAYS`] days, keeping the newest `keep` rows.
#[instrument(skip(source, dataset), fields(path = %dataset.path().display()))]
pub async fn bootstrap<S>(
    source: &S,
    dataset: &CsvDataset,
    symbol: &str,
    today: NaiveDate,
    keep: usize,
) -> Result<SyncOutcome, SyncError>
where
    S: PriceSource + ?Sized,
{
    let range = DateRange {
        from: today - TimeDelta::days(BOOTSTRAP_LOOKBACK_DAYS),
        to: today,
    };

    let fetched = source.minute_bars(symbol, Some(range)).await?;
    if fetched.is_empty() {
        warn!(symbol, "source returned no bars for initial load");
        return Ok(SyncOutcome::NoData);
    }

    let bars = merge_rolling(Vec::new(), fetched, keep);
    dataset.save(&bars)?;

    let outcome = written(&bars);
    info!(?outcome, "dataset bootstrapped");
    Ok(outcome)
}

/// Merges the latest page into an existing dataset, dropping duplicate
/// minutes (newest fetch wins) and trimming to the newest `keep` rows.
#[instrument(skip(source, dataset), fields(path = %dataset.path().display()))]
pub async fn update<S>(
    source: &S,
    dataset: &CsvDataset,
    symbol: &str,
    keep: usize,
) -> Result<SyncOutcome, SyncError>
where
    S: PriceSource + ?Sized,
{
    // fail before spending a request
    let existing = dataset.load()?;

    let fetched = source.minute_bars(symbol, None).await?;
    if fetched.is_empty() {
        warn!(symbol, "source returned no new bars");
        return Ok(SyncOutcome::NoData);
    }

    let before = existing.len();
    let bars = merge_rolling(existing, fetched, keep);
    dataset.save(&bars)?;

    let outcome = written(&bars);
    info!(before, ?outcome, "dataset updated");
    Ok(outcome)
}
