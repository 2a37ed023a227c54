//! Console rendering of a ticker report.
//!
//! Everything here builds `String`s; `main` decides where they go.
use b3_common::model::{Dated, DividendEvent, PricePoint, QuoteSnapshot, Series};
use b3_common::{Outcome, Ticker};

/// Width of the `=` rules around the report header.
const RULE_WIDTH: usize = 60;

/// Render a bordered table with centered cells.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let border = {
        let parts: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
        format!("+{}+\n", parts.join("+"))
    };
    let line = |cells: Vec<&str>| {
        let parts: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!(" {:^width$} ", cell, width = *w))
            .collect();
        format!("|{}|\n", parts.join("|"))
    };

    let mut out = String::new();
    out.push_str(&border);
    out.push_str(&line(headers.to_vec()));
    out.push_str(&border);
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    out.push_str(&border);
    out
}

/// `Data | Preço (R$)` table.
pub fn price_table(series: &Series<PricePoint>) -> String {
    let rows: Vec<Vec<String>> = series
        .iter()
        .map(|p| vec![p.date_display(), format!("{:.2}", p.close_price)])
        .collect();
    render_table(&["Data", "Preço (R$)"], &rows)
}

/// `Data | Valor (R$) | Tipo` table.
pub fn dividend_table(series: &Series<DividendEvent>) -> String {
    let rows: Vec<Vec<String>> = series
        .iter()
        .map(|d| {
            vec![
                d.date_display(),
                format!("{:.4}", d.amount),
                d.kind.to_string(),
            ]
        })
        .collect();
    render_table(&["Data", "Valor (R$)", "Tipo"], &rows)
}

/// Header block with title and current price line.
pub fn render_header(ticker: &Ticker, quote: &QuoteSnapshot) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let company = quote.company_name.as_deref().unwrap_or(ticker.symbol());
    let title = format!("ANÁLISE DA AÇÃO {} - {}", ticker, company);
    format!(
        "\n{rule}\n{:^width$}\n{rule}\n{}\n{rule}\n",
        title,
        quote.price_line(),
        width = RULE_WIDTH
    )
}

/// Full report for one ticker whose quote was found.
pub fn render_report(
    ticker: &Ticker,
    quote: &QuoteSnapshot,
    prices: &Outcome<Series<PricePoint>>,
    dividends: &Outcome<Series<DividendEvent>>,
    price_window: usize,
    dividend_window: usize,
) -> String {
    let mut out = render_header(ticker, quote);

    out.push_str(&format!(
        "\nPREÇOS DOS ÚLTIMOS {} DIAS DE NEGOCIAÇÃO:\n",
        price_window
    ));
    match prices.data() {
        Some(series) if !series.is_empty() => out.push_str(&price_table(series)),
        _ => out.push_str("Não foram encontrados dados de preços para esta ação.\n"),
    }

    out.push_str(&format!(
        "\n\nÚLTIMOS {} PROVENTOS DISTRIBUÍDOS:\n",
        dividend_window
    ));
    match dividends.data() {
        Some(series) if !series.is_empty() => out.push_str(&dividend_table(series)),
        _ => out.push_str("Não foram encontrados dados de proventos para esta ação.\n"),
    }

    out.push_str(&format!("\n{}\n", "=".repeat(RULE_WIDTH)));
    out
}
