//! Overpass API response types.
//!
//! Only the fields the supermarket search reads are modelled; everything
//! else in the payload is ignored.

use std::collections::HashMap;

use scanprice_core::{Coordinate, SupermarketCandidate};
use serde::Deserialize;

/// Top-level `[out:json]` response.
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    /// Present when the server hit a runtime error (timeout, memory limit).
    #[serde(default)]
    pub remark: Option<String>,
    pub elements: Vec<Element>,
}

/// One OSM element. Nodes carry `lat`/`lon` directly.
#[derive(Debug, Deserialize)]
pub struct Element {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl Element {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.tags.get("name").map(String::as_str)
    }

    #[must_use]
    pub fn into_candidate(self) -> SupermarketCandidate {
        let position = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Coordinate::new(lat, lon).ok(),
            _ => None,
        };
        SupermarketCandidate {
            osm_id: self.id,
            name: self.name().map(str::to_string),
            position,
        }
    }
}
