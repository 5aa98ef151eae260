//! Fixed-radius local extrema detection.
//!
//! An interior point is a Peak when it equals the maximum of the `2r + 1`
//! values centred on it, otherwise a Valley when it equals their minimum.
//! The peak test runs first, so a flat neighbourhood is always a Peak.
//! The first and last `r` points are never classified.

use corelib::{ExtremumKind, Sample};
use serde::Serialize;
use tracing::debug;

use crate::error::{EngineError, EngineResult};

/// A classified point of the scanned series.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Extremum {
    pub index: usize,
    pub price: f64,
    pub kind: ExtremumKind,
}

/// Output of one full scan.
///
/// `peaks` and `valleys` are append-only and ordered by ascending index;
/// `events` holds both kinds in scan order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ExtremaScan {
    pub peaks: Vec<Extremum>,
    pub valleys: Vec<Extremum>,
    pub events: Vec<Extremum>,
}

impl ExtremaScan {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn record(&mut self, e: Extremum) {
        match e.kind {
            ExtremumKind::Peak => self.peaks.push(e),
            ExtremumKind::Valley => self.valleys.push(e),
        }
        self.events.push(e);
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ExtremaScanner {
    radius: usize,
}

impl ExtremaScanner {
    pub fn new(radius: usize) -> EngineResult<Self> {
        if radius < 1 {
            return Err(EngineError::InvalidConfiguration(
                "extrema radius must be >= 1".to_string(),
            ));
        }

        Ok(Self { radius })
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Classifies every index in `[r, n - r)`.
    ///
    /// Series with `n <= 2r` yield an empty scan.
    pub fn scan(&self, prices: &[f64]) -> ExtremaScan {
        let r = self.radius;
        let n = prices.len();
        let mut out = ExtremaScan::default();

        // 2r may not fit in usize
        if r.checked_mul(2).is_none_or(|span| n <= span) {
            debug!(n, radius = r, "series too short for extrema scan");
            return out;
        }

        for i in r..n - r {
            let current = prices[i];
            let neighbourhood = &prices[i - r..=i + r];

            // f64::max/min skip NaN, and a NaN centre never compares equal
            let hi = neighbourhood.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let lo = neighbourhood.iter().copied().fold(f64::INFINITY, f64::min);

            let kind = if current == hi {
                ExtremumKind::Peak
            } else if current == lo {
                ExtremumKind::Valley
            } else {
                continue;
            };

            out.record(Extremum {
                index: i,
                price: current,
                kind,
            });
        }

        debug!(
            n,
            radius = r,
            peaks = out.peaks.len(),
            valleys = out.valleys.len(),
            "extrema scan complete"
        );

        out
    }

    /// Scans the prices of a sample series; indices refer to `samples`.
    pub fn scan_samples(&self, samples: &[Sample]) -> ExtremaScan {
        let prices: Vec<f64> = samples.iter().map(|s| s.price).collect();
        self.scan(&prices)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]
        #[test]
        fn classification_respects_boundary_and_neighbourhood(
            radius in 1usize..=6,
            // small integer range forces plenty of ties
            raw in prop::collection::vec(0i32..6, 0..80)
        ) {
            let prices: Vec<f64> = raw.iter().map(|&v| v as f64).collect();
            let n = prices.len();
            let scan = ExtremaScanner::new(radius).unwrap().scan(&prices);

            // --- INVARIANT 1: boundary indices never appear ---
            for e in &scan.events {
                prop_assert!(e.index >= radius && e.index + radius < n);
            }

            // --- INVARIANT 2: partitions are consistent with the combined list ---
            prop_assert_eq!(scan.peaks.len() + scan.valleys.len(), scan.events.len());
            prop_assert!(scan.events.windows(2).all(|w| w[0].index < w[1].index));
            prop_assert!(scan.peaks.iter().all(|e| e.kind == ExtremumKind::Peak));
            prop_assert!(scan.valleys.iter().all(|e| e.kind == ExtremumKind::Valley));

            // --- INVARIANT 3: membership matches the peak-first rule exactly ---
            if n > 2 * radius {
                for i in radius..n - radius {
                    let nb = &prices[i - radius..=i + radius];
                    let is_max = nb.iter().all(|&v| v <= prices[i]);
                    let is_min = nb.iter().all(|&v| v >= prices[i]);

                    let found = scan.events.iter().find(|e| e.index == i).map(|e| e.kind);
                    let expected = if is_max {
                        Some(ExtremumKind::Peak)
                    } else if is_min {
                        Some(ExtremumKind::Valley)
                    } else {
                        None
                    };
                    prop_assert_eq!(found, expected);
                }
            }
        }
    }
}
