//! One-shot analysis of a whole dataset.
//!
//! Data flow:
//! bars → samples → MultiWindowAggregator (per sample)
//!               → ExtremaScanner (whole array)
//!               → ReportAssembler

use corelib::{Bar, Sample};
use serde::Serialize;
use tracing::{Span, field, info, instrument};

use crate::aggregator::{MultiWindowAggregator, WindowSnapshot};
use crate::error::EngineResult;
use crate::extrema::{ExtremaScanner, Extremum};
use crate::report::{AnalysisReport, ReportAssembler};

/// Snapshot history of one configured window, for charting.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WindowHistory {
    pub name: String,
    pub capacity: usize,
    pub snapshots: Vec<WindowSnapshot>,
}

/// The three read-only views produced by a run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    pub report: AnalysisReport,
    pub histories: Vec<WindowHistory>,
    pub events: Vec<Extremum>,
}

/// Validated window set + scanner, reusable across datasets.
///
/// Every run starts from empty windows.
#[derive(Clone, Debug)]
pub struct AnalysisPipeline {
    template: MultiWindowAggregator,
    scanner: ExtremaScanner,
}

impl AnalysisPipeline {
    pub fn new<I, K>(windows: I, radius: usize) -> EngineResult<Self>
    where
        I: IntoIterator<Item = (K, usize)>,
        K: Into<String>,
    {
        Ok(Self {
            template: MultiWindowAggregator::with_windows(windows)?,
            scanner: ExtremaScanner::new(radius)?,
        })
    }

    pub fn radius(&self) -> usize {
        self.scanner.radius()
    }

    #[instrument(
        target = "analysis",
        skip(self, bars),
        fields(
            bars = bars.len(),
            radius = self.scanner.radius(),
            full_windows = field::Empty,
            extrema = field::Empty
        )
    )]
    pub fn run(&self, bars: &[Bar]) -> AnalysisOutcome {
        let samples: Vec<Sample> = bars.iter().map(Bar::sample).collect();

        let mut aggregator = self.template.clone();
        aggregator.ingest_all(&samples);

        let scan = self.scanner.scan_samples(&samples);
        let report = ReportAssembler::analysis_report(&aggregator, &scan, bars);

        let histories = aggregator
            .windows()
            .iter()
            .map(|w| WindowHistory {
                name: w.queue.name().to_string(),
                capacity: w.queue.capacity(),
                snapshots: w.history.clone(),
            })
            .collect();

        Span::current().record("full_windows", report.windows.len());
        Span::current().record("extrema", scan.events.len());

        info!(
            samples = report.samples_processed,
            peaks = report.extrema.total_peaks,
            valleys = report.extrema.total_valleys,
            amplitude = report.extrema.amplitude,
            "analysis complete"
        );

        AnalysisOutcome {
            report,
            histories,
            events: scan.events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::rolling_window::test_support::minute;
    use tracing_test::traced_test;

    fn bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar {
                timestamp: minute(i as i64),
                open: c,
                high: c,
                low: c,
                close: c,
                volume: 1.0,
            })
            .collect()
    }

    #[test]
    fn rejects_bad_radius_or_capacity() {
        assert!(matches!(
            AnalysisPipeline::new([("a", 3)], 0),
            Err(EngineError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            AnalysisPipeline::new([("a", 0)], 2),
            Err(EngineError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn run_combines_windows_and_extrema() {
        let pipeline = AnalysisPipeline::new([("w3", 3), ("w50", 50)], 2).unwrap();
        let input = bars(&[1.0, 2.0, 3.0, 2.0, 1.0, 0.0, 1.0, 2.0, 3.0, 2.0, 1.0]);

        let out = pipeline.run(&input);

        assert_eq!(out.report.samples_processed, 11);
        assert_eq!(out.report.windows_configured, 2);
        assert_eq!(out.report.windows.len(), 1);
        assert_eq!(out.report.windows[0].name, "w3");
        assert_eq!(out.report.windows[0].mean, 2.0); // 3, 2, 1

        assert_eq!(out.histories.len(), 2);
        assert_eq!(out.histories[0].snapshots.len(), 9);
        assert!(out.histories[1].snapshots.is_empty());

        let idx: Vec<_> = out.events.iter().map(|e| e.index).collect();
        assert_eq!(idx, vec![2, 5, 8]);
        assert_eq!(out.report.summary.total_records, 11);
    }

    #[test]
    fn extreme_configuration_runs_without_panicking() {
        let pipeline = AnalysisPipeline::new([("huge", usize::MAX)], usize::MAX).unwrap();

        let out = pipeline.run(&bars(&[1.0, 2.0, 3.0]));

        assert!(out.report.windows.is_empty());
        assert!(out.events.is_empty());
        assert_eq!(out.histories[0].snapshots.len(), 0);
        assert!(format!("{pipeline:?}").contains("radius"));
    }

    #[test]
    fn runs_are_independent() {
        let pipeline = AnalysisPipeline::new([("w2", 2)], 1).unwrap();
        let input = bars(&[1.0, 2.0, 3.0]);

        let first = pipeline.run(&input);
        let second = pipeline.run(&input);

        assert_eq!(first, second);
        assert_eq!(second.report.windows[0].total_pushes, 3);
    }

    #[test]
    #[traced_test]
    fn run_logs_a_completion_event() {
        let pipeline = AnalysisPipeline::new([("w2", 2)], 1).unwrap();

        pipeline.run(&bars(&[1.0, 3.0, 2.0]));

        assert!(logs_contain("analysis complete"));
        assert!(logs_contain("peaks=1"));
    }

    #[test]
    fn empty_dataset_degrades_to_empty_report() {
        let pipeline = AnalysisPipeline::new([("w2", 2)], 1).unwrap();

        let out = pipeline.run(&[]);

        assert_eq!(out.report.samples_processed, 0);
        assert!(out.report.windows.is_empty());
        assert!(out.events.is_empty());
        assert_eq!(out.report.summary.period, None);
    }
}
