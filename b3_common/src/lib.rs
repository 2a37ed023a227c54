//!
//! Market-data collector for B3 equities.
//!
//! This crate aggregates:
//! - `error` — unified error type `FetchError` and the `FailureKind` classes.
//! - `result` — handy `Result<T, FetchError>` alias.
//! - `tickers` — B3 ticker symbols and ticker-file parsing.
//! - `net` — endpoint constants and defaults.
//! - `config` — `FetchConfig`, the runtime settings.
//! - `identity` — rotating outbound client identities.
//! - `http` — blocking access layer for the charting endpoint.
//! - `parser` — tolerant decoding of the chart envelope.
//! - `normalize` — raw pairs to deduplicated, date-ordered, capped series.
//! - `model` — quote snapshot and series record types.
//! - `collector` — pipeline boundary returning `Outcome` values.
#![warn(missing_docs)]
pub mod error;
pub mod result;
pub mod tickers;
pub mod net;
pub mod config;
pub mod identity;
pub mod http;
pub mod parser;
pub mod normalize;
pub mod model;
pub mod collector;

pub use error::{FailureKind, FetchError};
pub use result::Result;
pub use config::FetchConfig;
pub use collector::{Collector, FailureStats, Outcome};
pub use tickers::Ticker;
