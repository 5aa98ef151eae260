use chrono::NaiveDateTime;
use corelib::{Bar, TIMESTAMP_FORMAT};
use serde::Deserialize;

use super::errors::FmpError;

/// Raw entry of `historical-chart/1min/{symbol}`.
#[derive(Debug, Clone, Deserialize)]
pub struct FmpBar {
    pub date: String,
    pub open: f64,
    pub low: f64,
    pub high: f64,
    pub close: f64,
    pub volume: f64,
}

/// Body returned instead of an array when the request is refused.
#[derive(Debug, Deserialize)]
pub struct FmpErrorBody {
    #[serde(rename = "Error Message")]
    pub message: String,
}

impl TryFrom<FmpBar> for Bar {
    type Error = FmpError;

    fn try_from(raw: FmpBar) -> Result<Self, Self::Error> {
        let timestamp = NaiveDateTime::parse_from_str(&raw.date, TIMESTAMP_FORMAT).map_err(
            |source| FmpError::InvalidTimestamp {
                value: raw.date.clone(),
                source,
            },
        )?;

        Ok(Bar {
            timestamp,
            open: raw.open,
            high: raw.high,
            low: raw.low,
            close: raw.close,
            volume: raw.volume,
        })
    }
}

/// Decodes a response body into bars sorted oldest first.
///
/// The endpoint serves newest first; any unparseable entry fails the whole
/// page rather than being skipped.
pub fn parse_bars(body: &str) -> Result<Vec<Bar>, FmpError> {
    let raw: Vec<FmpBar> = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(decode_err) => {
            return Err(match serde_json::from_str::<FmpErrorBody>(body) {
                Ok(refused) => FmpError::Api(refused.message),
                Err(_) => FmpError::Decode(decode_err),
            });
        }
    };

    let mut bars = raw
        .into_iter()
        .map(Bar::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    bars.sort_by_key(|b| b.timestamp);
    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"[
        {"date": "2025-05-02 10:02:00", "open": 96010.5, "low": 95990.0, "high": 96050.0, "close": 96020.25, "volume": 12},
        {"date": "2025-05-02 10:01:00", "open": 95980.0, "low": 95970.0, "high": 96015.0, "close": 96010.5, "volume": 8.5}
    ]"#;

    #[test]
    fn page_is_sorted_oldest_first() {
        let bars = parse_bars(PAGE).unwrap();

        assert_eq!(bars.len(), 2);
        assert!(bars[0].timestamp < bars[1].timestamp);
        assert_eq!(bars[0].close, 96010.5);
        assert_eq!(bars[1].volume, 12.0);
    }

    #[test]
    fn empty_page_is_not_an_error() {
        assert!(parse_bars("[]").unwrap().is_empty());
    }

    #[test]
    fn refusal_body_surfaces_api_message() {
        let body = r#"{"Error Message": "Invalid API KEY."}"#;

        match parse_bars(body) {
            Err(FmpError::Api(msg)) => assert_eq!(msg, "Invalid API KEY."),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_timestamp_fails_the_page() {
        let body = r#"[{"date": "02/05/2025 10:01", "open": 1, "low": 1, "high": 1, "close": 1, "volume": 1}]"#;

        assert!(matches!(
            parse_bars(body),
            Err(FmpError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(parse_bars("<html>"), Err(FmpError::Decode(_))));
    }
}
