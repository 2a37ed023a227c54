//! Blocking access layer for the charting endpoint.
//!
//! `ChartClient` issues one GET per call, attaches the headers picked by an
//! `IdentitySource`, and classifies the outcome:
//! - 2xx: raw body bytes, unparsed.
//! - any other status: `FetchError::Request { status }`.
//! - no response at all: `FetchError::Transport`.
//!
//! Each request starts at least `FetchConfig::min_interval` after the previous
//! one finished.
//! No retries are attempted; the caller decides what a failure means.
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::identity::{IdentityHeaders, IdentitySource};
use crate::net::chart_url;
use crate::result::Result;
use crate::tickers::Ticker;

/// The three request shapes sent to the chart endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartQuery {
    /// Current quote; no time range.
    Quote,
    /// Daily closes over the last `lookback_days`.
    PriceHistory {
        /// Days before now covered by `period1`.
        lookback_days: i64,
    },
    /// Distribution events over the last `lookback_days`.
    Dividends {
        /// Days before now covered by `period1`.
        lookback_days: i64,
    },
}

impl ChartQuery {
    /// Query-string pairs for this shape, with `period2` pinned to `now`.
    pub fn params(&self, now: DateTime<Utc>) -> Vec<(&'static str, String)> {
        let range = |days: i64| {
            let start = now - chrono::Duration::days(days);
            vec![
                ("period1", start.timestamp().to_string()),
                ("period2", now.timestamp().to_string()),
                ("interval", "1d".to_string()),
            ]
        };
        match *self {
            ChartQuery::Quote => Vec::new(),
            ChartQuery::PriceHistory { lookback_days } => range(lookback_days),
            ChartQuery::Dividends { lookback_days } => {
                let mut params = range(lookback_days);
                params.push(("events", "div".to_string()));
                params
            }
        }
    }
}

/// HTTP access layer over a blocking `reqwest` client.
pub struct ChartClient {
    client: Client,
    identity: Box<dyn IdentitySource>,
    base_url: String,
    min_interval: Duration,
    last_request: Option<Instant>,
}

impl ChartClient {
    /// Build a client with the configured timeout and pacing.
    pub fn new(config: &FetchConfig, identity: Box<dyn IdentitySource>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            identity,
            base_url: config.base_url.clone(),
            min_interval: config.min_interval,
            last_request: None,
        })
    }

    /// Fetch one chart shape for `ticker`.
    pub fn fetch_chart(&mut self, ticker: &Ticker, query: ChartQuery) -> Result<Vec<u8>> {
        let url = chart_url(&self.base_url, &ticker.market_symbol());
        self.fetch(&url, &query.params(Utc::now()))
    }

    /// GET `url` with `params` and return the body of a successful response.
    ///
    /// The pacing clock restarts once the exchange is over, whatever its
    /// result, so a slow answer never eats into the next pause.
    pub fn fetch(&mut self, url: &str, params: &[(&str, String)]) -> Result<Vec<u8>> {
        self.wait_for_slot();

        let headers = self.identity.next();
        debug!("GET {} {:?} as {}", url, params, headers.user_agent);

        let result = self.exchange(url, params, &headers);
        self.last_request = Some(Instant::now());
        result
    }

    fn exchange(
        &self,
        url: &str,
        params: &[(&str, String)],
        headers: &IdentityHeaders,
    ) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .query(params)
            .header(USER_AGENT, headers.user_agent.as_str())
            .header(ACCEPT, headers.accept)
            .header(ACCEPT_LANGUAGE, headers.accept_language)
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Request {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(body.to_vec())
    }

    /// Sleep until `min_interval` has passed since the previous exchange ended.
    fn wait_for_slot(&self) {
        let Some(last) = self.last_request else {
            return;
        };
        let elapsed = last.elapsed();
        if elapsed < self.min_interval {
            let pause = self.min_interval - elapsed;
            debug!("Pacing: sleeping {:?} before next request", pause);
            thread::sleep(pause);
        }
    }
}
