//! Supermarket candidates and the selection label.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::SelectionError;

/// Label shown for supermarkets the geodata service returns without a name.
pub const UNNAMED_SUPERMARKET: &str = "Supermercato senza nome";

/// A supermarket returned by a nearby search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupermarketCandidate {
    /// OpenStreetMap node id, when the service includes it.
    pub osm_id: Option<i64>,
    pub name: Option<String>,
    pub position: Option<Coordinate>,
}

impl SupermarketCandidate {
    /// Display label: the name, or [`UNNAMED_SUPERMARKET`] when missing or empty.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(UNNAMED_SUPERMARKET)
    }

    /// Distance in metres from `origin`, if the candidate has a position.
    #[must_use]
    pub fn distance_from(&self, origin: &Coordinate) -> Option<f64> {
        self.position.map(|p| origin.distance_to(&p))
    }
}

/// The label identifying the currently chosen supermarket.
///
/// Either a discovered candidate's label or a manually composed
/// `"{name}, {city}"`. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct SelectionLabel(String);

impl TryFrom<String> for SelectionLabel {
    type Error = SelectionError;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        if label.trim().is_empty() {
            return Err(SelectionError::MissingName);
        }
        Ok(Self(label))
    }
}

impl SelectionLabel {
    #[must_use]
    pub fn from_candidate(candidate: &SupermarketCandidate) -> Self {
        Self(candidate.label().to_string())
    }

    /// Composes `"{name}, {city}"` from trimmed manual input.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError`] when either field is empty after trimming.
    pub fn manual(name: &str, city: &str) -> Result<Self, SelectionError> {
        let name = name.trim();
        let city = city.trim();
        if name.is_empty() {
            return Err(SelectionError::MissingName);
        }
        if city.is_empty() {
            return Err(SelectionError::MissingCity);
        }
        Ok(Self(format!("{name}, {city}")))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SelectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
