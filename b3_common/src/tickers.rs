//! B3 ticker symbols and helpers for reading them from files and prompts.

use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use crate::error::FetchError;
use crate::net::MARKET_SUFFIX;

/// Trait providing file parsing for tickers.
pub trait TickerParser {
    /// Parses tickers from a buffered reader.
    ///
    /// Each non-empty line is parsed as a single `Ticker` value using `FromStr`.
    /// Lines starting with `#` are comments. Returns an error if any line
    /// cannot be parsed.
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Ticker>, FetchError>;
}

impl TickerParser for Ticker {
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Self>, FetchError> {
        let mut tickers = Vec::new();

        for line_result in reader.lines() {
            let line = line_result.map_err(FetchError::Io)?;
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                continue;
            }

            match trimmed_line.parse::<Self>() {
                Ok(ticker) => tickers.push(ticker),
                Err(e) => return Err(FetchError::ParseTickersFile(e.to_string())),
            }
        }
        Ok(tickers)
    }
}

/// A B3 equity symbol, stored uppercase and without the market suffix.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct Ticker(String);

impl Ticker {
    /// Bare symbol, e.g. `PETR4`.
    pub fn symbol(&self) -> &str {
        &self.0
    }

    /// Symbol as sent upstream, e.g. `PETR4.SA`.
    pub fn market_symbol(&self) -> String {
        format!("{}{}", self.0, MARKET_SUFFIX)
    }
}

impl FromStr for Ticker {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbol = s.trim().to_ascii_uppercase();
        if symbol.is_empty() || !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(FetchError::InvalidTicker(s.trim().to_string()));
        }
        Ok(Ticker(symbol))
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
