use chrono::NaiveDateTime;
use corelib::Sample;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::rolling_window::BoundedSeriesQueue;

/// Mean of a full window at the instant of the push that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WindowSnapshot {
    pub timestamp: NaiveDateTime,
    pub mean: f64,
}

/// A configured window together with its append-only snapshot history.
#[derive(Clone, Debug)]
pub struct TrackedWindow {
    pub queue: BoundedSeriesQueue,
    pub history: Vec<WindowSnapshot>,
}

/// Feeds every incoming sample to a named set of independent windows.
///
/// Windows are kept in configuration order so reports and charts
/// list them the way they were declared.
#[derive(Clone, Debug, Default)]
pub struct MultiWindowAggregator {
    windows: Vec<TrackedWindow>,
    samples_ingested: u64,
}

impl MultiWindowAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an aggregator and configures it in one step.
    pub fn with_windows<I, K>(windows: I) -> EngineResult<Self>
    where
        I: IntoIterator<Item = (K, usize)>,
        K: Into<String>,
    {
        let mut agg = Self::new();
        agg.configure(windows)?;
        Ok(agg)
    }

    /// Replaces the whole window set.
    ///
    /// Names are unique: a repeated name overrides the earlier capacity and
    /// keeps the earlier position. On error the current set is left untouched.
    pub fn configure<I, K>(&mut self, windows: I) -> EngineResult<()>
    where
        I: IntoIterator<Item = (K, usize)>,
        K: Into<String>,
    {
        let mut requested: Vec<(String, usize)> = Vec::new();

        for (name, capacity) in windows {
            let name = name.into();
            match requested.iter_mut().find(|(n, _)| *n == name) {
                Some(entry) => entry.1 = capacity,
                None => requested.push((name, capacity)),
            }
        }

        let built = requested
            .into_iter()
            .map(|(name, capacity)| {
                BoundedSeriesQueue::new(name, capacity).map(|queue| TrackedWindow {
                    queue,
                    history: Vec::new(),
                })
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        let capacities: Vec<usize> = built.iter().map(|w| w.queue.capacity()).collect();
        info!(windows = built.len(), ?capacities, "sliding windows configured");

        self.windows = built;
        self.samples_ingested = 0;
        Ok(())
    }

    /// Pushes one sample into every window and records snapshots for full ones.
    pub fn ingest(&mut self, sample: Sample) {
        for w in self.windows.iter_mut() {
            let outcome = w.queue.push(sample);

            if outcome.is_full {
                w.history.push(WindowSnapshot {
                    timestamp: sample.timestamp,
                    mean: outcome.current_mean,
                });
            }
        }

        self.samples_ingested += 1;
    }

    /// Sequentially ingests a chronologically ordered batch.
    pub fn ingest_all(&mut self, samples: &[Sample]) {
        for s in samples {
            self.ingest(*s);
        }

        debug!(
            batch = samples.len(),
            total = self.samples_ingested,
            "batch ingested"
        );
    }

    /// Chronological snapshot history of one window.
    ///
    /// Empty when the window never filled or the name is not configured.
    pub fn snapshot_history(&self, name: &str) -> &[WindowSnapshot] {
        self.find(name).map(|w| w.history.as_slice()).unwrap_or(&[])
    }

    pub fn window(&self, name: &str) -> Option<&BoundedSeriesQueue> {
        self.find(name).map(|w| &w.queue)
    }

    /// All configured windows, in configuration order.
    pub fn windows(&self) -> &[TrackedWindow] {
        &self.windows
    }

    pub fn samples_ingested(&self) -> u64 {
        self.samples_ingested
    }

    fn find(&self, name: &str) -> Option<&TrackedWindow> {
        self.windows.iter().find(|w| w.queue.name() == name)
    }
}
