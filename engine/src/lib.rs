//! Sliding-window aggregation and local-extrema detection over a price series.

pub mod aggregator;
pub mod error;
pub mod extrema;
pub mod pipeline;
pub mod report;
pub mod rolling_window;

pub use aggregator::{MultiWindowAggregator, WindowSnapshot};
pub use error::{EngineError, EngineResult};
pub use extrema::{ExtremaScan, ExtremaScanner, Extremum};
pub use pipeline::{AnalysisOutcome, AnalysisPipeline};
pub use report::{
    AnalysisReport, ExtremaReport, Period, ReportAssembler, SeriesSummary, WindowReport,
};
pub use rolling_window::{BoundedSeriesQueue, PushOutcome};
