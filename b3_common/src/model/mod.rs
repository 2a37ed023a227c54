//! Normalized records produced by the collector.
//!
//! - `quote` — point-in-time quote snapshot and its display helpers.
//! - `series` — dated price and dividend records and the capped `Series` container.
pub mod quote;
pub mod series;

pub use quote::QuoteSnapshot;
pub use series::{Dated, DividendEvent, DividendKind, PricePoint, Series};
