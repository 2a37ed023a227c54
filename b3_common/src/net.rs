//! Upstream endpoint constants and request-header values.

/// Base path of the charting endpoint; the ticker is appended as a path segment.
pub const BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
/// Market suffix appended to every B3 symbol.
pub const MARKET_SUFFIX: &str = ".SA";
/// `Accept` header sent with every request.
pub const ACCEPT: &str = "application/json";
/// `Accept-Language` header sent with every request.
pub const ACCEPT_LANGUAGE: &str = "pt-BR,pt;q=0.9,en-US;q=0.8,en;q=0.7";

/// Default request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default minimum spacing between two requests to the host, in milliseconds.
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 1000;
/// Lookback for the price-history query. Wide enough to hold 30 trading days.
pub const PRICE_LOOKBACK_DAYS: i64 = 90;
/// Lookback for the dividend query (~5 years).
pub const DIVIDEND_LOOKBACK_DAYS: i64 = 1825;
/// Number of most recent prices kept.
pub const PRICE_WINDOW: usize = 30;
/// Number of most recent dividends kept.
pub const DIVIDEND_WINDOW: usize = 12;

/// Join the base path and a path segment with exactly one slash.
pub fn chart_url(base: &str, symbol: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), symbol)
}
