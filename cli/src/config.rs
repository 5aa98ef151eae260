use std::path::PathBuf;

use adapters::fmp::client::DEFAULT_BASE_URL;
use adapters::sync::{BOOTSTRAP_ROWS, ROLLING_ROWS};

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Financial Modeling Prep key. Only the sync commands need it.
    pub api_key: Option<String>,

    /// Root of the FMP v3 API, without trailing slash.
    pub fmp_base_url: String,

    /// Rolling CSV dataset read by `analyze` and written by the sync jobs.
    pub dataset_path: PathBuf,

    /// Ticker requested from the API.
    pub symbol: String,

    // =========================
    // Dataset sizing
    // =========================
    /// Rows kept by `bootstrap` (two days of minute bars).
    pub bootstrap_rows: usize,

    /// Rows kept by every `update` (one day of minute bars).
    ///
    /// Smaller than `bootstrap_rows`: the first update after a bootstrap
    /// trims the file down to a single day.
    pub rolling_rows: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset or unparseable
    /// values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let usize_or = |key: &str, default: usize| {
            lookup(key)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        };

        Self {
            api_key: lookup("FMP_API_KEY").filter(|k| !k.trim().is_empty()),
            fmp_base_url: lookup("FMP_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            dataset_path: lookup("DATASET_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("dados/db_bitcoin_1dia.csv")),
            symbol: lookup("SYMBOL").unwrap_or_else(|| "BTCUSD".to_string()),
            bootstrap_rows: usize_or("BOOTSTRAP_ROWS", BOOTSTRAP_ROWS),
            rolling_rows: usize_or("ROLLING_ROWS", ROLLING_ROWS),
        }
    }
}
