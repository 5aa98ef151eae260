use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp layout shared by the market-data API and the on-disk dataset.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One price observation fed to the analysis core.
///
/// Callers hand samples over in non-decreasing timestamp order;
/// nothing downstream re-sorts them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: NaiveDateTime,
    pub price: f64,
}

impl Sample {
    pub fn new(timestamp: NaiveDateTime, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// A one-minute OHLCV bar as produced by the data source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Projects the bar onto the `(timestamp, close)` pair the core consumes.
    pub fn sample(&self) -> Sample {
        Sample {
            timestamp: self.timestamp,
            price: self.close,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExtremumKind;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap()
    }

    #[test]
    fn bar_projects_close_as_price() {
        let bar = Bar {
            timestamp: ts("2025-03-01 10:00:00"),
            open: 1.0,
            high: 3.0,
            low: 0.5,
            close: 2.5,
            volume: 42.0,
        };

        let s = bar.sample();
        assert_eq!(s.timestamp, bar.timestamp);
        assert_eq!(s.price, 2.5);
    }

    #[test]
    fn extremum_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ExtremumKind::Peak).unwrap(),
            "\"peak\""
        );
        assert_eq!(
            serde_json::to_string(&ExtremumKind::Valley).unwrap(),
            "\"valley\""
        );
    }
}
