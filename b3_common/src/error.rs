//! Error types shared by the collector library and the client binary.
//!
//! `FetchError` covers every way a single chart query can fail: the request
//! never reaching the host, a non-success status, a payload that is not the
//! expected chart envelope, or a well-formed response that carries no rows.
//! The pipeline boundary (`collector`) folds these into `Outcome` values, so
//! callers of the collector never see them directly.
use std::io;

use strum::Display;
use thiserror::Error;

/// Unified error type shared by the library and the client.
#[derive(Error, Debug)]
pub enum FetchError {
    /// No response reached us (DNS, timeout, connection reset, ...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The host answered with a non-success status code.
    #[error("Request failed with status {status}")]
    Request {
        /// HTTP status code returned by the host.
        status: u16,
    },

    /// The body is not valid JSON or carries an upstream `chart.error` block.
    #[error("Schema error: {0}")]
    Schema(String),

    /// The body parsed, but an expected container is missing or malformed.
    #[error("Absent data: {0}")]
    AbsentData(String),

    /// The body is well-formed but the requested series is empty.
    #[error("No data found")]
    NoDataFound,

    /// The HTTP client could not be constructed.
    #[error("HTTP client build error: {0}")]
    ClientBuild(String),

    /// I/O error while reading ticker files or stdin.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error while parsing the ticker file into `Ticker` values.
    #[error("Parse tickers file error: {0}")]
    ParseTickersFile(String),

    /// A symbol that cannot be sent upstream.
    #[error(
        "Invalid ticker {0:?}: use letters and digits only, without the market suffix (e.g. PETR4, not PETR4.SA)"
    )]
    InvalidTicker(String),
}

impl FetchError {
    /// Classify the error for failure accounting.
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::Transport(_) | FetchError::ClientBuild(_) | FetchError::Io(_) => {
                FailureKind::Transport
            }
            FetchError::Request { .. } => FailureKind::Request,
            FetchError::Schema(_) => FailureKind::Schema,
            FetchError::AbsentData(_) => FailureKind::AbsentData,
            FetchError::NoDataFound => FailureKind::NoDataFound,
            FetchError::ParseTickersFile(_) | FetchError::InvalidTicker(_) => FailureKind::Input,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Schema(err.to_string())
    }
}

/// Coarse failure class, used as a counter key and in log lines.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    Transport,
    Request,
    Schema,
    AbsentData,
    NoDataFound,
    Input,
}
