use std::time::Duration;

use async_trait::async_trait;
use corelib::Bar;
use reqwest::Client;
use tracing::{debug, instrument};

use super::errors::FmpError;
use super::types::parse_bars;
use super::{DateRange, PriceSource};

pub const DEFAULT_BASE_URL: &str = "https://financialmodelingprep.com/api/v3";

/// HTTP client for the Financial Modeling Prep intraday chart endpoint.
#[derive(Clone)]
pub struct FmpClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl FmpClient {
    pub fn new(base_url: String, api_key: String) -> Result<Self, FmpError> {
        if api_key.trim().is_empty() {
            return Err(FmpError::MissingApiKey);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!("{}/historical-chart/1min/{}", self.base_url, symbol)
    }

    #[instrument(skip(self), fields(symbol = %symbol), level = "debug")]
    pub async fn fetch_minute_bars(
        &self,
        symbol: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<Bar>, FmpError> {
        let mut query = vec![("apikey", self.api_key.clone())];
        if let Some(r) = range {
            query.push(("from", r.from.format("%Y-%m-%d").to_string()));
            query.push(("to", r.to.format("%Y-%m-%d").to_string()));
        }

        let resp = self
            .http
            .get(self.chart_url(symbol))
            .query(&query)
            .send()
            .await?
            .error_for_status()?;

        let body = resp.text().await?;
        let bars = parse_bars(&body)?;

        debug!(
            bars = bars.len(),
            first = ?bars.first().map(|b| b.timestamp),
            last = ?bars.last().map(|b| b.timestamp),
            "fmp minute bars fetched"
        );

        Ok(bars)
    }
}

#[async_trait]
impl PriceSource for FmpClient {
    async fn minute_bars(
        &self,
        symbol: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<Bar>, FmpError> {
        self.fetch_minute_bars(symbol, range).await
    }
}
