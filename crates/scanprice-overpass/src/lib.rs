//! HTTP client for the Overpass geodata API, limited to the nearby
//! supermarket query.

pub mod client;
pub mod error;
pub mod types;

pub use client::{supermarket_query, OverpassClient};
pub use error::OverpassError;
pub use types::{Element, OverpassResponse};
