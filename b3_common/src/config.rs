//! Runtime settings for the collector.
use std::time::Duration;

use crate::net::{
    BASE_URL, DEFAULT_MIN_INTERVAL_MS, DEFAULT_TIMEOUT_SECS, DIVIDEND_LOOKBACK_DAYS,
    DIVIDEND_WINDOW, PRICE_LOOKBACK_DAYS, PRICE_WINDOW,
};

/// Settings shared by the access layer and the collector.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    /// Chart endpoint base path; the market symbol is appended to it.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Minimum spacing between two consecutive requests to the host.
    pub min_interval: Duration,
    /// How far back the price-history query reaches, in days.
    pub price_lookback_days: i64,
    /// How far back the dividend query reaches, in days.
    pub dividend_lookback_days: i64,
    /// Max number of prices kept after normalization.
    pub price_window: usize,
    /// Max number of dividends kept after normalization.
    pub dividend_window: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            min_interval: Duration::from_millis(DEFAULT_MIN_INTERVAL_MS),
            price_lookback_days: PRICE_LOOKBACK_DAYS,
            dividend_lookback_days: DIVIDEND_LOOKBACK_DAYS,
            price_window: PRICE_WINDOW,
            dividend_window: DIVIDEND_WINDOW,
        }
    }
}
