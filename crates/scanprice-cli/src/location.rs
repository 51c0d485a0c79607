//! Device position capability.

use std::time::Duration;

use scanprice_core::Coordinate;
use thiserror::Error;

use crate::console::Console;

const POSITION_PROMPT: &str =
    "Consenti l'accesso alla posizione? Inserisci \"lat, lon\" (vuoto per negare): ";

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("geolocation is not supported on this device")]
    Unsupported,

    #[error("geolocation permission denied")]
    Denied,

    #[error("position unavailable: {0}")]
    Unavailable(String),

    #[error("no position within {0:?}")]
    TimedOut(Duration),
}

/// Yields the current device position once per call.
pub trait Locator {
    async fn current_position(&self) -> Result<Coordinate, LocationError>;
}

/// Where the session takes its position from.
#[derive(Debug)]
pub enum DeviceLocator {
    /// From `--lat/--lon` or `SCANPRICE_LATITUDE`/`SCANPRICE_LONGITUDE`.
    Fixed(Coordinate),
    /// Asks the user; a blank answer denies permission.
    Prompt(Console),
    /// `--no-location`.
    Disabled,
}

impl Locator for DeviceLocator {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        match self {
            DeviceLocator::Fixed(at) => Ok(*at),
            DeviceLocator::Disabled => Err(LocationError::Unsupported),
            DeviceLocator::Prompt(console) => {
                let answer = console
                    .prompt(POSITION_PROMPT)
                    .await
                    .map_err(|e| LocationError::Unavailable(e.to_string()))?;
                match answer.as_deref().map(str::trim) {
                    None | Some("") => Err(LocationError::Denied),
                    Some(raw) => raw
                        .parse::<Coordinate>()
                        .map_err(|e| LocationError::Unavailable(e.to_string())),
                }
            }
        }
    }
}
