//! Interactive terminal loop for the `session` command.

use crate::app::App;
use crate::console::Console;
use crate::finder::SupermarketFinder;
use crate::ledger::PriceLedger;
use crate::location::Locator;
use crate::scanner::BarcodeReader;
use crate::view;

/// One line of user input, interpreted against the current view.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Command {
    /// Zero-based index; the user types the 1-based number shown.
    Pick(usize),
    Manual,
    Scan,
    Price(String),
    Quit,
    Unknown(String),
}

pub(crate) fn parse_command(line: &str, awaiting_price: bool) -> Command {
    let input = line.trim();
    match input.to_lowercase().as_str() {
        "q" | "quit" | "esci" => return Command::Quit,
        "s" | "scan" | "scansiona" => return Command::Scan,
        "m" | "manuale" => return Command::Manual,
        _ => {}
    }
    if awaiting_price {
        return Command::Price(input.to_string());
    }
    match input.parse::<usize>() {
        Ok(n) if n >= 1 => Command::Pick(n - 1),
        _ => Command::Unknown(input.to_string()),
    }
}

/// Runs the session until the user quits or input ends.
///
/// # Errors
///
/// Returns an error only when terminal I/O fails.
pub(crate) async fn run_session<L, F, R, P>(
    app: &mut App<L, F, R, P>,
    console: &Console,
) -> std::io::Result<()>
where
    L: Locator,
    F: SupermarketFinder,
    R: BarcodeReader,
    P: PriceLedger,
{
    app.start().await;

    loop {
        print!("\n{}", app.view().render());
        for alert in app.take_alerts() {
            println!("⚠ {alert}");
        }

        let Some(line) = console.prompt("> ").await? else {
            break;
        };

        match parse_command(&line, app.awaiting_price()) {
            Command::Quit => break,
            Command::Scan => {
                if app.begin_scan() {
                    println!("── {}", app.view().status);
                    app.capture_scan().await;
                }
            }
            Command::Price(input) => app.save_price(&input),
            Command::Pick(index) => app.pick(index),
            Command::Manual => {
                if !app.view().manual_form_visible {
                    println!("⚠ {}", view::ALERT_MANUAL_HIDDEN);
                    continue;
                }
                let Some(name) = console.prompt("Nome supermercato: ").await? else {
                    break;
                };
                let Some(city) = console.prompt("Città: ").await? else {
                    break;
                };
                app.submit_manual(&name, &city);
            }
            Command::Unknown(text) => println!("⚠ {}: {text}", view::ALERT_UNKNOWN_COMMAND),
        }
    }

    Ok(())
}
