use chrono::NaiveDateTime;
use corelib::Bar;
use serde::Serialize;

use crate::aggregator::MultiWindowAggregator;
use crate::extrema::ExtremaScan;

/// Statistics of one window that is currently full.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WindowReport {
    pub name: String,
    pub capacity: usize,
    pub mean: f64,
    pub total_pushes: u64,
    pub history_length: usize,
}

/// Counts and range of the detected extrema.
///
/// Prices and amplitude fall back to `0.0` when the relevant side is empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ExtremaReport {
    pub total_peaks: usize,
    pub total_valleys: usize,
    pub max_peak_price: f64,
    pub min_valley_price: f64,
    pub amplitude: f64,
}

/// First and last timestamp of a series.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Period {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Descriptive statistics of the raw bars.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub total_records: usize,
    pub min_price: f64,
    pub max_price: f64,
    pub mean_price: f64,
    pub total_volume: f64,
    pub period: Option<Period>,
}

/// Everything a presentation layer needs in one value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub samples_processed: u64,
    pub windows_configured: usize,
    pub windows: Vec<WindowReport>,
    pub extrema: ExtremaReport,
    pub summary: SeriesSummary,
}

/// Read-only views over aggregator and scanner outputs.
pub struct ReportAssembler;

impl ReportAssembler {
    /// One entry per full window, in configuration order. Windows that never
    /// reached capacity are omitted.
    pub fn windows_report(aggregator: &MultiWindowAggregator) -> Vec<WindowReport> {
        aggregator
            .windows()
            .iter()
            .filter(|w| w.queue.is_full())
            .map(|w| WindowReport {
                name: w.queue.name().to_string(),
                capacity: w.queue.capacity(),
                mean: w.queue.mean(),
                total_pushes: w.queue.total_pushes(),
                history_length: w.history.len(),
            })
            .collect()
    }

    pub fn extrema_report(scan: &ExtremaScan) -> ExtremaReport {
        let max_peak = scan.peaks.iter().map(|e| e.price).reduce(f64::max);
        let min_valley = scan.valleys.iter().map(|e| e.price).reduce(f64::min);

        let amplitude = match (max_peak, min_valley) {
            (Some(hi), Some(lo)) => hi - lo,
            _ => 0.0,
        };

        ExtremaReport {
            total_peaks: scan.peaks.len(),
            total_valleys: scan.valleys.len(),
            max_peak_price: max_peak.unwrap_or(0.0),
            min_valley_price: min_valley.unwrap_or(0.0),
            amplitude,
        }
    }

    /// Close-price range, mean and total volume of the bars.
    pub fn series_summary(bars: &[Bar]) -> SeriesSummary {
        let (Some(first), Some(last)) = (bars.first(), bars.last()) else {
            return SeriesSummary::default();
        };

        let mut min_price = f64::INFINITY;
        let mut max_price = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut total_volume = 0.0;

        for b in bars {
            min_price = min_price.min(b.close);
            max_price = max_price.max(b.close);
            sum += b.close;
            total_volume += b.volume;
        }

        SeriesSummary {
            total_records: bars.len(),
            min_price,
            max_price,
            mean_price: sum / bars.len() as f64,
            total_volume,
            period: Some(Period {
                start: first.timestamp,
                end: last.timestamp,
            }),
        }
    }

    pub fn analysis_report(
        aggregator: &MultiWindowAggregator,
        scan: &ExtremaScan,
        bars: &[Bar],
    ) -> AnalysisReport {
        AnalysisReport {
            samples_processed: aggregator.samples_ingested(),
            windows_configured: aggregator.windows().len(),
            windows: Self::windows_report(aggregator),
            extrema: Self::extrema_report(scan),
            summary: Self::series_summary(bars),
        }
    }
}
