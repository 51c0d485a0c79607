mod app;
mod console;
mod finder;
mod ledger;
mod location;
mod nearby;
mod scanner;
mod session;
mod view;

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use scanprice_core::{AppConfig, Barcode, Coordinate, Price};
use scanprice_overpass::OverpassClient;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::console::Console;
use crate::ledger::SessionLedger;
use crate::location::DeviceLocator;
use crate::scanner::KeyboardWedge;

#[derive(Debug, Parser)]
#[command(name = "scanprice-cli")]
#[command(about = "Find nearby supermarkets, scan a barcode, record its price")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Interactive session (default)
    Session(SessionArgs),
    /// List supermarkets within 500 m of a position
    Nearby {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Validate a price the way the session does
    CheckPrice { input: String },
    /// Validate a barcode and show its symbology
    CheckBarcode { code: String },
}

#[derive(Debug, Default, Args)]
struct SessionArgs {
    /// Device latitude; overrides SCANPRICE_LATITUDE
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Device longitude; overrides SCANPRICE_LONGITUDE
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Ask for the position in the terminal even if one is configured
    #[arg(long, conflicts_with_all = ["lat", "no_location"])]
    ask_location: bool,

    /// Behave as a device without geolocation
    #[arg(long, conflicts_with = "lat")]
    no_location: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    let config = scanprice_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        None => run_session_command(&config, &SessionArgs::default()).await?,
        Some(Commands::Session(args)) => run_session_command(&config, &args).await?,
        Some(Commands::Nearby { lat, lon, json }) => {
            let at = Coordinate::new(lat, lon)?;
            let client = overpass_client(&config)?;
            nearby::run_nearby(&client, at, json).await?;
        }
        Some(Commands::CheckPrice { input }) => {
            let price = input.parse::<Price>()?;
            println!("€{price}");
        }
        Some(Commands::CheckBarcode { code }) => {
            let barcode = code.parse::<Barcode>()?;
            println!("{barcode} ({})", barcode.symbology());
        }
    }

    Ok(())
}

fn overpass_client(config: &AppConfig) -> anyhow::Result<OverpassClient> {
    Ok(OverpassClient::with_base_url(
        &config.overpass_base_url,
        config.http_timeout_secs,
        &config.user_agent,
    )?)
}

/// Picks the position source: flags, then `--ask-location`, then config,
/// then the terminal prompt.
fn device_locator(
    config: &AppConfig,
    args: &SessionArgs,
    console: &Console,
) -> anyhow::Result<DeviceLocator> {
    if args.no_location {
        return Ok(DeviceLocator::Disabled);
    }
    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        return Ok(DeviceLocator::Fixed(Coordinate::new(lat, lon)?));
    }
    if args.ask_location {
        return Ok(DeviceLocator::Prompt(console.clone()));
    }
    Ok(match config.device_position()? {
        Some(at) => DeviceLocator::Fixed(at),
        None => DeviceLocator::Prompt(console.clone()),
    })
}

async fn run_session_command(config: &AppConfig, args: &SessionArgs) -> anyhow::Result<()> {
    let console = Console::stdin();
    let locator = device_locator(config, args, &console)?;
    let client = overpass_client(config)?;
    tracing::debug!(?locator, overpass = %config.overpass_base_url, "starting session");

    let mut app = App::new(
        locator,
        client,
        KeyboardWedge::new(console.clone()),
        SessionLedger::default(),
        Duration::from_secs(config.location_timeout_secs),
    );
    session::run_session(&mut app, &console).await?;

    let entries = app.ledger().entries();
    if !entries.is_empty() {
        println!("\nPrezzi registrati in questa sessione (non salvati su disco):");
        if let Some(label) = &app.state().selection {
            println!("  ultimo supermercato: {label}");
        }
        for entry in entries {
            println!(
                "  {}  €{}  {}  {}",
                entry.recorded_at.format("%H:%M:%S"),
                entry.price,
                entry.barcode,
                entry.supermarket
            );
        }
    }
    Ok(())
}
