pub mod client;
pub mod errors;
pub mod types;

use async_trait::async_trait;
use chrono::NaiveDate;
use corelib::Bar;

pub use client::FmpClient;
pub use errors::FmpError;

/// Inclusive calendar-day range passed as `from` / `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Source of one-minute bars for a symbol.
///
/// Implementations return bars sorted by ascending timestamp.
/// `range = None` asks for the most recent page the source serves.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn minute_bars(
        &self,
        symbol: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<Bar>, FmpError>;
}
