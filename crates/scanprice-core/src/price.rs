//! Prices and the in-memory price entry.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::barcode::Barcode;
use crate::supermarket::SelectionLabel;
use crate::PriceError;

/// Largest accepted price, in whole euros.
const MAX_PRICE_EUROS: u32 = 1_000_000;

/// Most fractional digits a `Decimal` holds without rounding.
const MAX_DECIMALS: usize = 28;

/// A strictly positive shelf price in euros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// # Errors
    ///
    /// Returns [`PriceError::NotPositive`] for zero or negative amounts and
    /// [`PriceError::TooLarge`] above one million euros.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive(amount.to_string()));
        }
        if amount > Decimal::from(MAX_PRICE_EUROS) {
            return Err(PriceError::TooLarge(amount.to_string()));
        }
        Ok(Self(amount))
    }

    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Price::new(amount)
    }
}

/// Accepts `.` or `,` as decimal separator (`"2.50"`, `"2,50"`), with
/// surrounding whitespace.
impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let normalized = raw.replace(',', ".");
        if raw.is_empty() || normalized.matches('.').count() > 1 {
            return Err(PriceError::NotANumber(raw.to_string()));
        }
        let decimals = normalized.split_once('.').map_or(0, |(_, frac)| frac.len());
        if decimals > MAX_DECIMALS {
            return Err(PriceError::NotANumber(raw.to_string()));
        }
        let amount =
            Decimal::from_str(&normalized).map_err(|_| PriceError::NotANumber(raw.to_string()))?;
        Price::new(amount)
    }
}

/// Always two decimals, half away from zero.
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);
        write!(f, "{rounded}")
    }
}

/// A price observed for one product at one supermarket.
///
/// Exists only in memory; see `PriceLedger` in the CLI for the persistence
/// boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub barcode: Barcode,
    pub price: Price,
    pub supermarket: SelectionLabel,
    pub recorded_at: DateTime<Utc>,
}

impl PriceEntry {
    #[must_use]
    pub fn new(barcode: Barcode, price: Price, supermarket: SelectionLabel) -> Self {
        Self {
            barcode,
            price,
            supermarket,
            recorded_at: Utc::now(),
        }
    }
}
