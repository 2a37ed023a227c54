//! B3 quote client: current quote, last trading days and recent dividends for
//! Brazilian equities, printed as console tables.
//!
//! Usage example (CLI):
//! ```bash
//! b3quote PETR4 VALE3
//! b3quote --file ./carteira.txt --min-interval-ms 1500
//! b3quote            # interactive prompt
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).
#![warn(missing_docs)]
mod args;
mod presenter;
mod prompt;

use crate::args::Args;
use b3_common::tickers::TickerParser;
use b3_common::{Collector, FailureStats, FetchError, Result, Ticker};
use chrono::TimeZone;
use clap::Parser;
use log::{info, warn};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

fn main() -> Result<(), FetchError> {
    init_logger();
    let args = Args::parse();
    let config = args.fetch_config();
    let (price_window, dividend_window) = (config.price_window, config.dividend_window);
    let mut collector = Collector::new(config)?;

    let mut tickers = args.tickers.clone();
    if let Some(raw_path) = &args.file {
        let file = File::open(normalize_path(raw_path))?;
        tickers.extend(Ticker::parse_from_file(BufReader::new(file))?);
        info!("Tickers: {:?}", tickers);
    }

    let mut show =
        |ticker: &Ticker| show_ticker(&mut collector, ticker, price_window, dividend_window);

    if tickers.is_empty() {
        let stdin = io::stdin();
        prompt::run_prompt(stdin.lock(), &mut io::stdout(), &mut show)?;
    } else {
        let shutdown = Arc::new(AtomicBool::new(false));
        {
            let shutdown = shutdown.clone();
            if let Err(e) = ctrlc::set_handler(move || {
                info!("Ctrl+C received. Stopping after the current ticker...");
                shutdown.store(true, Ordering::SeqCst);
            }) {
                warn!("Could not install Ctrl+C handler: {}", e);
            }
        }
        for ticker in &tickers {
            if shutdown.load(Ordering::SeqCst) {
                break;
            }
            show(ticker);
        }
    }

    log_summary(collector.stats());
    Ok(())
}

/// Fetch and print one ticker. The quote gates the rest of the report.
fn show_ticker<Tz: TimeZone>(
    collector: &mut Collector<Tz>,
    ticker: &Ticker,
    price_window: usize,
    dividend_window: usize,
) {
    println!("\nConsultando informações para {}...", ticker);

    let quote = collector.quote(ticker);
    let Some(quote) = quote.data() else {
        println!("Não foi possível obter informações para o ticker {}.", ticker);
        return;
    };

    let prices = collector.price_history(ticker);
    let dividends = collector.dividends(ticker);
    print!(
        "{}",
        presenter::render_report(
            ticker,
            quote,
            &prices,
            &dividends,
            price_window,
            dividend_window
        )
    );
}

fn log_summary(stats: &FailureStats) {
    if stats.total() == 0 {
        return;
    }
    for (kind, count) in stats.iter() {
        warn!("{} failure(s) of kind {}", count, kind);
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Normalize a CLI-provided path string by trimming whitespace and matching quotes.
///
/// This allows passing Windows paths in quotes without breaking parsing.
fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    PathBuf::from(no_quotes)
}
