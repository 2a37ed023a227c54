//! Interactive ticker prompt.
//!
//! Reads one ticker per line until `sair` or end of input. Blank and invalid
//! lines are answered with a notice and the prompt is shown again.
use std::io::{self, BufRead, Write};

use b3_common::Ticker;

/// Word that ends the prompt loop (case-insensitive).
pub const EXIT_WORD: &str = "sair";

const PROMPT: &str = "\nDigite o ticker da ação (ex: PETR4) ou 'sair' para encerrar: ";

/// Run the prompt, calling `on_ticker` for every valid ticker entered.
pub fn run_prompt<R, W, F>(mut input: R, output: &mut W, mut on_ticker: F) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    F: FnMut(&Ticker),
{
    writeln!(output, "\nConsulta de dados de ações brasileiras")?;
    writeln!(output, "--------------------------------------")?;

    let mut line = String::new();
    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let entry = line.trim();

        if entry.eq_ignore_ascii_case(EXIT_WORD) {
            break;
        }
        if entry.is_empty() {
            writeln!(output, "Por favor, digite um ticker válido.")?;
            continue;
        }
        match entry.parse::<Ticker>() {
            Ok(ticker) => on_ticker(&ticker),
            Err(e) => writeln!(output, "Ticker inválido: {}", e)?,
        }
    }
    writeln!(output, "\nEncerrando o programa...")?;
    Ok(())
}
