//! Raw `(timestamp, value)` pairs to canonical dated series.
//!
//! Both normalizers follow the same steps:
//! 1. epoch seconds to a calendar date in the given time zone;
//! 2. round the value (2 digits for prices, 4 for dividends);
//! 3. deduplicate by date, the entry processed last wins;
//! 4. order most recent first;
//! 5. keep at most `window` records.
//!
//! When fewer dates than `window` are available the series is returned as is;
//! `Series::shortfall` tells the caller by how much.
use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeZone};
use log::debug;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::{Dated, DividendEvent, DividendKind, PricePoint, Series};
use crate::parser::RawPoint;

/// Decimal places kept for close prices.
pub const PRICE_DECIMALS: u32 = 2;
/// Decimal places kept for dividend amounts.
pub const DIVIDEND_DECIMALS: u32 = 4;

/// Round the exact binary value of `value` to `decimals` fraction digits,
/// ties to even.
///
/// `0.28335` is stored as `0.28334999...`, so it rounds to `0.2833` at four
/// digits. Non-finite input is returned unchanged.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let Some(exact) = Decimal::from_f64_retain(value) else {
        return value;
    };
    let rounded = exact.round_dp_with_strategy(decimals, RoundingStrategy::MidpointNearestEven);
    rounded.mantissa() as f64 / 10f64.powi(rounded.scale() as i32)
}

/// Calendar date of an epoch-seconds timestamp in `tz`.
pub fn to_calendar_date<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|utc| utc.with_timezone(tz).date_naive())
}

/// Normalize daily closes into a price series of at most `window` days.
pub fn normalize_prices<Tz: TimeZone>(
    raw: &[RawPoint],
    window: usize,
    tz: &Tz,
) -> Series<PricePoint> {
    normalize(raw, window, tz, |date, value| PricePoint {
        date,
        close_price: round_to(value, PRICE_DECIMALS),
    })
}

/// Normalize dividend amounts into a series of at most `window` events.
pub fn normalize_dividends<Tz: TimeZone>(
    raw: &[RawPoint],
    window: usize,
    tz: &Tz,
) -> Series<DividendEvent> {
    normalize(raw, window, tz, |date, value| DividendEvent {
        date,
        amount: round_to(value, DIVIDEND_DECIMALS),
        kind: DividendKind::Dividend,
    })
}

fn normalize<T, Tz, F>(raw: &[RawPoint], window: usize, tz: &Tz, build: F) -> Series<T>
where
    T: Dated,
    Tz: TimeZone,
    F: Fn(NaiveDate, f64) -> T,
{
    let mut by_date: BTreeMap<NaiveDate, T> = BTreeMap::new();
    for point in raw {
        match to_calendar_date(point.timestamp, tz) {
            Some(date) => {
                by_date.insert(date, build(date, point.value));
            }
            None => debug!("Dropping out-of-range timestamp {}", point.timestamp),
        }
    }

    let available = by_date.len();
    let items: Vec<T> = by_date.into_values().rev().take(window).collect();
    Series::new(items, window, available)
}
