//! Pipeline boundary: fetch, parse and normalize one ticker at a time.
//!
//! Every operation returns an `Outcome` and never an error. Failures from the
//! access layer or the parser are logged here, once, with their kind and the
//! running count for that kind, then folded into `Outcome::Failed`.
use std::collections::BTreeMap;

use chrono::{Local, TimeZone};
use log::{info, warn};

use crate::config::FetchConfig;
use crate::error::{FailureKind, FetchError};
use crate::http::{ChartClient, ChartQuery};
use crate::identity::{IdentitySource, RandomIdentityPool};
use crate::model::{Dated, DividendEvent, PricePoint, QuoteSnapshot, Series};
use crate::normalize::{normalize_dividends, normalize_prices};
use crate::parser::{parse_dividend_series, parse_price_series, parse_quote};
use crate::result::Result;
use crate::tickers::Ticker;

/// Result of one pipeline operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Data was found.
    Data(T),
    /// The response was well-formed but carried no rows.
    Empty,
    /// The request or the payload failed; already logged.
    Failed(FailureKind),
}

impl<T> Outcome<T> {
    /// Borrow the data, if any.
    pub fn data(&self) -> Option<&T> {
        match self {
            Outcome::Data(value) => Some(value),
            _ => None,
        }
    }

    /// Take the data, if any.
    pub fn into_data(self) -> Option<T> {
        match self {
            Outcome::Data(value) => Some(value),
            _ => None,
        }
    }

    /// `true` for `Outcome::Data`.
    pub fn is_data(&self) -> bool {
        matches!(self, Outcome::Data(_))
    }
}

/// Per-kind failure counters for one collector.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FailureStats {
    counts: BTreeMap<FailureKind, u64>,
}

impl FailureStats {
    /// Count one failure and return the new count for that kind.
    pub fn record(&mut self, kind: FailureKind) -> u64 {
        let count = self.counts.entry(kind).or_insert(0);
        *count += 1;
        *count
    }

    /// Failures recorded for `kind`.
    pub fn get(&self, kind: FailureKind) -> u64 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Failures recorded across all kinds.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Non-zero counters in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (FailureKind, u64)> + '_ {
        self.counts.iter().map(|(kind, count)| (*kind, *count))
    }
}

/// Fetches and normalizes quote, price history and dividends for tickers.
///
/// Dates are computed in `Tz`; the default is the local time zone.
pub struct Collector<Tz: TimeZone = Local> {
    client: ChartClient,
    config: FetchConfig,
    tz: Tz,
    stats: FailureStats,
}

impl Collector<Local> {
    /// Collector with a rotating identity pool and local dates.
    pub fn new(config: FetchConfig) -> Result<Self> {
        Self::with_parts(config, Box::new(RandomIdentityPool), Local)
    }
}

impl<Tz: TimeZone> Collector<Tz> {
    /// Collector with an explicit identity source and time zone.
    pub fn with_parts(
        config: FetchConfig,
        identity: Box<dyn IdentitySource>,
        tz: Tz,
    ) -> Result<Self> {
        let client = ChartClient::new(&config, identity)?;
        Ok(Self {
            client,
            config,
            tz,
            stats: FailureStats::default(),
        })
    }

    /// Settings in use.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Failures seen so far.
    pub fn stats(&self) -> &FailureStats {
        &self.stats
    }

    /// Current quote snapshot.
    pub fn quote(&mut self, ticker: &Ticker) -> Outcome<QuoteSnapshot> {
        let quote = self
            .client
            .fetch_chart(ticker, ChartQuery::Quote)
            .and_then(|body| parse_quote(&body));

        match quote {
            Ok(snapshot) => Outcome::Data(snapshot),
            Err(err) => self.fail(ticker, "quote", err),
        }
    }

    /// Most recent daily closes, capped at `price_window`.
    pub fn price_history(&mut self, ticker: &Ticker) -> Outcome<Series<PricePoint>> {
        let query = ChartQuery::PriceHistory {
            lookback_days: self.config.price_lookback_days,
        };
        let raw = match self
            .client
            .fetch_chart(ticker, query)
            .and_then(|body| parse_price_series(&body))
        {
            Ok(raw) => raw,
            Err(err) => return self.fail(ticker, "price history", err),
        };

        let series = normalize_prices(&raw, self.config.price_window, &self.tz);
        self.finish(ticker, "trading days", series)
    }

    /// Most recent dividends, capped at `dividend_window`.
    pub fn dividends(&mut self, ticker: &Ticker) -> Outcome<Series<DividendEvent>> {
        let query = ChartQuery::Dividends {
            lookback_days: self.config.dividend_lookback_days,
        };
        let raw = match self
            .client
            .fetch_chart(ticker, query)
            .and_then(|body| parse_dividend_series(&body))
        {
            Ok(raw) => raw,
            Err(err) => return self.fail(ticker, "dividends", err),
        };

        let series = normalize_dividends(&raw, self.config.dividend_window, &self.tz);
        self.finish(ticker, "dividends", series)
    }

    fn finish<T: Dated>(
        &mut self,
        ticker: &Ticker,
        label: &str,
        series: Series<T>,
    ) -> Outcome<Series<T>> {
        if series.is_empty() {
            let count = self.stats.record(FailureKind::NoDataFound);
            info!(
                "{}: no {} found ({} #{})",
                ticker,
                label,
                FailureKind::NoDataFound,
                count
            );
            return Outcome::Empty;
        }
        if series.shortfall().is_some() {
            info!(
                "{}: only {} of {} {} found",
                ticker,
                series.len(),
                series.window(),
                label
            );
        }
        Outcome::Data(series)
    }

    fn fail<T>(&mut self, ticker: &Ticker, what: &str, err: FetchError) -> Outcome<T> {
        let kind = err.kind();
        let count = self.stats.record(kind);
        warn!("{}: {} failed ({} #{}): {}", ticker, what, kind, count, err);
        Outcome::Failed(kind)
    }
}
