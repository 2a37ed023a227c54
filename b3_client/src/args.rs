//! Command-line arguments for the B3 quote client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use std::time::Duration;

use b3_common::net::{
    BASE_URL, DEFAULT_MIN_INTERVAL_MS, DEFAULT_TIMEOUT_SECS, DIVIDEND_WINDOW, PRICE_WINDOW,
};
use b3_common::{FetchConfig, Ticker};
use clap::Parser;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Tickers to query (e.g. PETR4 VALE3). With no tickers and no --file,
    /// tickers are read from an interactive prompt.
    pub tickers: Vec<Ticker>,

    /// Path to a text file with one ticker per line.
    #[clap(long)]
    pub file: Option<String>,

    /// Base path of the chart endpoint.
    #[clap(long, default_value = BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[clap(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Minimum spacing between two requests to the host, in milliseconds.
    #[clap(long, default_value_t = DEFAULT_MIN_INTERVAL_MS)]
    pub min_interval_ms: u64,

    /// Number of most recent trading days shown.
    #[clap(long, default_value_t = PRICE_WINDOW, value_parser = parse_window)]
    pub price_window: usize,

    /// Number of most recent dividends shown.
    #[clap(long, default_value_t = DIVIDEND_WINDOW, value_parser = parse_window)]
    pub dividend_window: usize,
}

impl Args {
    /// Collector settings derived from the flags.
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            base_url: self.base_url.trim().to_string(),
            timeout: Duration::from_secs(self.timeout_secs),
            min_interval: Duration::from_millis(self.min_interval_ms),
            price_window: self.price_window,
            dividend_window: self.dividend_window,
            ..FetchConfig::default()
        }
    }
}

fn parse_window(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err("window must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
