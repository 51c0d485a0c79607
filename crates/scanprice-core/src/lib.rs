//! Domain types and configuration shared by the `scanprice` crates.
//!
//! Nothing here performs I/O apart from reading environment variables in
//! [`load_app_config`].

pub mod app_config;
pub mod barcode;
pub mod config;
pub mod geo;
pub mod price;
pub mod supermarket;

pub use app_config::AppConfig;
pub use barcode::{Barcode, Symbology};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::Coordinate;
pub use price::{Price, PriceEntry};
pub use supermarket::{SelectionLabel, SupermarketCandidate, UNNAMED_SUPERMARKET};

use thiserror::Error;

/// Radius, in metres, of the nearby-supermarket search.
pub const SEARCH_RADIUS_METERS: u32 = 500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("could not parse coordinate \"{0}\"")]
    Unparseable(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BarcodeError {
    #[error("barcode is empty")]
    Empty,

    #[error("barcode contains whitespace or control characters")]
    InvalidCharacters,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    #[error("\"{0}\" is not a number")]
    NotANumber(String),

    #[error("price must be greater than zero, got {0}")]
    NotPositive(String),

    #[error("price {0} exceeds the accepted maximum")]
    TooLarge(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("supermarket name is required")]
    MissingName,

    #[error("city is required")]
    MissingCity,
}
