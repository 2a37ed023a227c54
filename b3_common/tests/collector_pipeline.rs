//! End-to-end tests for the collector against a canned local HTTP responder.
//!
//! The responder accepts one connection per queued response, records the
//! request head and arrival time, optionally stalls, and answers with
//! `Connection: close`.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use b3_common::identity::FixedIdentity;
use b3_common::model::Dated;
use b3_common::{Collector, FailureKind, FetchConfig, Outcome, Ticker};
use chrono::Utc;
use serde_json::json;

const AGENT: &str = "b3-test-agent/1.0";
const DAY: i64 = 86_400;
const T0: i64 = 1_700_000_000;

struct Recorded {
    head: String,
    at: Instant,
    answered: Option<Instant>,
}

struct CannedServer {
    base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl CannedServer {
    fn start(responses: Vec<(u16, String)>) -> Self {
        Self::start_stalling(
            responses
                .into_iter()
                .map(|(status, body)| (status, body, Duration::ZERO))
                .collect(),
        )
    }

    /// Like `start`, but holds each answer for the paired duration.
    fn start_stalling(responses: Vec<(u16, String, Duration)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);

        thread::spawn(move || {
            for (status, body, stall) in responses {
                let Ok((mut stream, _)) = listener.accept() else {
                    return;
                };
                let head = read_head(&mut stream);
                log.lock().unwrap().push(Recorded {
                    head,
                    at: Instant::now(),
                    answered: None,
                });
                thread::sleep(stall);
                let reason = match status {
                    200 => "OK",
                    404 => "Not Found",
                    429 => "Too Many Requests",
                    _ => "Error",
                };
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
                if let Some(last) = log.lock().unwrap().last_mut() {
                    last.answered = Some(Instant::now());
                }
            }
        });

        Self {
            base_url: format!("http://{addr}/v8/finance/chart"),
            requests,
        }
    }

    fn heads(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.head.clone())
            .collect()
    }

    fn arrivals(&self) -> Vec<Instant> {
        self.requests.lock().unwrap().iter().map(|r| r.at).collect()
    }

    fn answers(&self) -> Vec<Option<Instant>> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.answered)
            .collect()
    }
}

fn read_head(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn config(base_url: &str, min_interval: Duration) -> FetchConfig {
    FetchConfig {
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(5),
        min_interval,
        ..FetchConfig::default()
    }
}

fn collector(base_url: &str, min_interval: Duration) -> Collector<Utc> {
    Collector::with_parts(
        config(base_url, min_interval),
        Box::new(FixedIdentity(AGENT.into())),
        Utc,
    )
    .unwrap()
}

fn quote_body() -> String {
    json!({"chart": {"result": [{"meta": {
        "regularMarketPrice": 32.55,
        "shortName": "PETROBRAS PN",
        "regularMarketVolume": 41_234_500u64,
        "regularMarketChangePercent": 1.23
    }}], "error": null}})
    .to_string()
}

fn price_body(days: i64) -> String {
    let timestamps: Vec<i64> = (0..days).map(|i| T0 + i * DAY).collect();
    let closes: Vec<Option<f64>> = (0..days)
        .map(|i| if i == 3 { None } else { Some(30.0 + i as f64 * 0.111) })
        .collect();
    json!({"chart": {"result": [{
        "timestamp": timestamps,
        "indicators": {"quote": [{"close": closes}]}
    }]}})
    .to_string()
}

fn dividend_body() -> String {
    json!({"chart": {"result": [{"events": {"dividends": {
        "1700000000": {"amount": 0.5321, "date": 1_700_000_000},
        "1690000000": {"amount": 1.23456789, "date": 1_690_000_000},
        "1680000000": {"date": 1_680_000_000}
    }}}]}})
    .to_string()
}

#[test]
fn full_ticker_run_fetches_three_shapes_in_order() {
    let server = CannedServer::start(vec![
        (200, quote_body()),
        (200, price_body(45)),
        (200, dividend_body()),
    ]);
    let min_interval = Duration::from_millis(120);
    let mut collector = collector(&server.base_url, min_interval);
    let ticker: Ticker = "petr4".parse().unwrap();

    let quote = collector.quote(&ticker).into_data().unwrap();
    assert_eq!(quote.price_line(), "Preço Atual: R$ 32.55 (+1.23%)");
    assert_eq!(quote.company_name.as_deref(), Some("PETROBRAS PN"));

    let prices = collector.price_history(&ticker).into_data().unwrap();
    assert_eq!(prices.len(), 30);
    assert_eq!(prices.shortfall(), None);
    assert_eq!(prices.items()[0].close_price, 34.88);
    for pair in prices.items().windows(2) {
        assert!(pair[0].date > pair[1].date);
    }

    let dividends = collector.dividends(&ticker).into_data().unwrap();
    let amounts: Vec<f64> = dividends.iter().map(|d| d.amount).collect();
    assert_eq!(amounts, vec![0.5321, 1.2346, 0.0]);
    assert_eq!(dividends.items()[0].date_display(), "14/11/2023");

    let heads = server.heads();
    assert_eq!(heads.len(), 3);
    assert!(heads[0].starts_with("GET /v8/finance/chart/PETR4.SA HTTP/1.1"));
    assert!(heads[1].contains("interval=1d"));
    assert!(heads[1].contains("period1="));
    assert!(!heads[1].contains("events="));
    assert!(heads[2].contains("events=div"));
    for head in &heads {
        let lower = head.to_ascii_lowercase();
        assert!(lower.contains(&format!("user-agent: {}", AGENT)));
        assert!(lower.contains("accept: application/json"));
        assert!(lower.contains("accept-language: pt-br"));
    }

    let arrivals = server.arrivals();
    for pair in arrivals.windows(2) {
        assert!(pair[1].duration_since(pair[0]) >= min_interval - Duration::from_millis(20));
    }
    assert_eq!(collector.stats().total(), 0);
}

#[test]
fn slow_answer_still_gets_full_pause_before_dividends() {
    let min_interval = Duration::from_millis(300);
    let server = CannedServer::start_stalling(vec![
        (200, price_body(5), Duration::from_millis(500)),
        (200, dividend_body(), Duration::ZERO),
    ]);
    let mut collector = collector(&server.base_url, min_interval);
    let ticker: Ticker = "PETR4".parse().unwrap();

    assert!(collector.price_history(&ticker).is_data());
    assert!(collector.dividends(&ticker).is_data());

    let answers = server.answers();
    let arrivals = server.arrivals();
    assert_eq!(arrivals.len(), 2);
    let gap = arrivals[1].duration_since(answers[0].unwrap());
    assert!(
        gap >= min_interval - Duration::from_millis(20),
        "dividend request sent {gap:?} after the price answer"
    );
}

#[test]
fn later_dividend_on_same_date_wins() {
    // Both keys fall on 2023-11-14 UTC; the one written last is kept even
    // though its timestamp is earlier.
    let body = r#"{"chart": {"result": [{"events": {"dividends": {
        "1700003600": {"amount": 0.55, "date": 1700003600},
        "1690000000": {"amount": 0.30, "date": 1690000000},
        "1700000000": {"amount": 0.40, "date": 1700000000}
    }}}]}}"#;
    let server = CannedServer::start(vec![(200, body.to_string())]);
    let mut collector = collector(&server.base_url, Duration::ZERO);
    let ticker: Ticker = "TAEE11".parse().unwrap();

    let dividends = collector.dividends(&ticker).into_data().unwrap();
    let rows: Vec<(String, f64)> = dividends
        .iter()
        .map(|d| (d.date_display(), d.amount))
        .collect();
    assert_eq!(
        rows,
        vec![("14/11/2023".to_string(), 0.40), ("22/07/2023".to_string(), 0.30)]
    );
    assert_eq!(dividends.available(), 2);
}

#[test]
fn non_success_status_degrades_to_failed() {
    let server = CannedServer::start(vec![
        (404, "{}".to_string()),
        (429, "Too Many Requests".to_string()),
    ]);
    let mut collector = collector(&server.base_url, Duration::ZERO);
    let ticker: Ticker = "XXXX3".parse().unwrap();

    assert_eq!(collector.quote(&ticker), Outcome::Failed(FailureKind::Request));
    assert_eq!(
        collector.dividends(&ticker),
        Outcome::Failed(FailureKind::Request)
    );
    assert_eq!(collector.stats().get(FailureKind::Request), 2);
}

#[test]
fn unreachable_host_is_transport_failure() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let mut collector = collector(&format!("http://{addr}/chart"), Duration::ZERO);
    let ticker: Ticker = "VALE3".parse().unwrap();

    assert_eq!(
        collector.price_history(&ticker),
        Outcome::Failed(FailureKind::Transport)
    );
    assert_eq!(collector.stats().get(FailureKind::Transport), 1);
}

#[test]
fn malformed_and_empty_payloads_never_escape() {
    let server = CannedServer::start(vec![
        (200, "<html>blocked</html>".to_string()),
        (200, json!({"chart": {"result": null}}).to_string()),
        (200, json!({"chart": {"result": [{"meta": {}}]}}).to_string()),
        (
            200,
            json!({"chart": {"result": null, "error": {"code": "Not Found", "description": "delisted"}}})
                .to_string(),
        ),
    ]);
    let mut collector = collector(&server.base_url, Duration::ZERO);
    let ticker: Ticker = "ITUB4".parse().unwrap();

    assert_eq!(collector.quote(&ticker), Outcome::Failed(FailureKind::Schema));
    assert_eq!(collector.price_history(&ticker), Outcome::Empty);
    assert_eq!(collector.dividends(&ticker), Outcome::Empty);
    assert_eq!(collector.quote(&ticker), Outcome::Failed(FailureKind::Schema));

    let stats = collector.stats();
    assert_eq!(stats.get(FailureKind::Schema), 2);
    assert_eq!(stats.get(FailureKind::NoDataFound), 2);
    assert_eq!(stats.total(), 4);
}

#[test]
fn short_history_is_returned_whole_with_shortfall() {
    let server = CannedServer::start(vec![(200, price_body(19))]);
    let mut collector = collector(&server.base_url, Duration::ZERO);
    let ticker: Ticker = "BBAS3".parse().unwrap();

    let prices = collector.price_history(&ticker).into_data().unwrap();
    // 19 timestamps, one null close
    assert_eq!(prices.len(), 18);
    assert_eq!(prices.shortfall(), Some(12));
    assert_eq!(collector.stats().total(), 0);
}
