//! Tolerant decoding of the chart envelope.
//!
//! All three request shapes answer with the same JSON envelope:
//!
//! ```text
//! { "chart": { "result": [ { "meta": {...},
//!                            "timestamp": [...],
//!                            "indicators": { "quote": [ { "close": [...] } ] },
//!                            "events": { "dividends": { "<epoch>": { "amount": .. } } } } ],
//!              "error": null } }
//! ```
//!
//! Every container is optional. A container that is missing, `null`, or of the
//! wrong JSON type decodes to `None` instead of failing the whole payload, so a
//! schema drift upstream degrades to "no data" rather than an error. Only a
//! body that is not JSON at all, or one that carries an upstream `chart.error`
//! block, is reported as `FetchError::Schema`.
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::FetchError;
use crate::model::QuoteSnapshot;
use crate::result::Result;

/// Raw `(epoch seconds, value)` pair handed to the normalizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPoint {
    /// Unix timestamp in seconds.
    pub timestamp: i64,
    /// Unrounded close price or dividend amount.
    pub value: f64,
}

impl RawPoint {
    /// Pair a timestamp with its unrounded value.
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Decode a field, mapping any type mismatch to `None`.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default, deserialize_with = "lenient")]
    chart: Option<Chart>,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default, deserialize_with = "lenient")]
    result: Option<Vec<ChartResult>>,
    #[serde(default, deserialize_with = "lenient")]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default, deserialize_with = "lenient")]
    code: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default, deserialize_with = "lenient")]
    meta: Option<Meta>,
    #[serde(default, deserialize_with = "lenient")]
    timestamp: Option<Vec<Option<i64>>>,
    #[serde(default, deserialize_with = "lenient")]
    indicators: Option<Indicators>,
    #[serde(default, deserialize_with = "lenient")]
    events: Option<Events>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Meta {
    #[serde(default, deserialize_with = "lenient")]
    regular_market_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    short_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    regular_market_volume: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    regular_market_change_percent: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default, deserialize_with = "lenient")]
    quote: Option<Vec<QuoteIndicator>>,
}

#[derive(Debug, Deserialize)]
struct QuoteIndicator {
    #[serde(default, deserialize_with = "lenient")]
    close: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct Events {
    // Map keeps document order, which decides last-seen-wins on date clashes.
    #[serde(default, deserialize_with = "lenient")]
    dividends: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct DividendRecord {
    #[serde(default, deserialize_with = "lenient")]
    amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    date: Option<i64>,
}

/// Decode the envelope and return `chart.result[0]`, if any.
///
/// An upstream `chart.error` block with no result is a schema error.
fn first_result(payload: &[u8]) -> Result<Option<ChartResult>> {
    let envelope: Envelope = serde_json::from_slice(payload)?;
    let Some(chart) = envelope.chart else {
        return Ok(None);
    };

    let first = chart.result.and_then(|results| results.into_iter().next());
    if first.is_none() {
        if let Some(err) = chart.error {
            return Err(FetchError::Schema(format!(
                "{}: {}",
                err.code.unwrap_or_else(|| "unknown".into()),
                err.description.unwrap_or_default()
            )));
        }
    }
    Ok(first)
}

/// Extract the quote snapshot from `chart.result[0].meta`.
///
/// Fails with `AbsentData` when the result or its meta block is missing.
pub fn parse_quote(payload: &[u8]) -> Result<QuoteSnapshot> {
    let result = first_result(payload)?
        .ok_or_else(|| FetchError::AbsentData("chart.result".into()))?;
    let meta = result
        .meta
        .ok_or_else(|| FetchError::AbsentData("chart.result[0].meta".into()))?;

    Ok(QuoteSnapshot {
        price: meta.regular_market_price,
        company_name: meta.short_name,
        volume: meta.regular_market_volume,
        change_percent: meta.regular_market_change_percent,
    })
}

/// Extract `(timestamp, close)` pairs, dropping entries with a null close.
///
/// `timestamp` and `indicators.quote[0].close` are parallel arrays; if their
/// lengths differ only the common prefix is used.
pub fn parse_price_series(payload: &[u8]) -> Result<Vec<RawPoint>> {
    let Some(result) = first_result(payload)? else {
        return Ok(Vec::new());
    };
    let Some(timestamps) = result.timestamp else {
        return Ok(Vec::new());
    };
    let closes = result
        .indicators
        .and_then(|i| i.quote)
        .and_then(|quotes| quotes.into_iter().next())
        .and_then(|q| q.close)
        .unwrap_or_default();

    if timestamps.len() != closes.len() {
        debug!(
            "timestamp/close length mismatch: {} vs {}",
            timestamps.len(),
            closes.len()
        );
    }

    Ok(timestamps
        .into_iter()
        .zip(closes)
        .filter_map(|(ts, close)| Some(RawPoint::new(ts?, close?)))
        .collect())
}

/// Extract `(timestamp, amount)` pairs from `events.dividends`.
///
/// The map key is the event timestamp; when the key is not numeric the
/// record's own `date` is used, and the entry is skipped if neither is
/// usable. A missing amount is read as `0`.
pub fn parse_dividend_series(payload: &[u8]) -> Result<Vec<RawPoint>> {
    let Some(result) = first_result(payload)? else {
        return Ok(Vec::new());
    };
    let Some(dividends) = result.events.and_then(|e| e.dividends) else {
        return Ok(Vec::new());
    };

    let mut points = Vec::with_capacity(dividends.len());
    for (key, value) in dividends {
        let record: Option<DividendRecord> = serde_json::from_value(value).ok();
        let timestamp = key
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| record.as_ref().and_then(|r| r.date));

        match timestamp {
            Some(ts) => {
                let amount = record.and_then(|r| r.amount).unwrap_or(0.0);
                points.push(RawPoint::new(ts, amount));
            }
            None => debug!("Skipping dividend entry with unusable key {:?}", key),
        }
    }
    Ok(points)
}
