//! Decoded barcode text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::BarcodeError;

/// Retail symbology inferred from the decoded text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symbology {
    Ean8,
    UpcA,
    Ean13,
    Gtin14,
    /// Anything else, including numeric codes with a GTIN length whose check
    /// digit does not match.
    Other,
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Symbology::Ean8 => "EAN-8",
            Symbology::UpcA => "UPC-A",
            Symbology::Ean13 => "EAN-13",
            Symbology::Gtin14 => "GTIN-14",
            Symbology::Other => "other",
        };
        f.write_str(name)
    }
}

/// The text of one decoded barcode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct Barcode(String);

impl Barcode {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` when the code is all digits with a GTIN length (8, 12, 13, 14).
    #[must_use]
    pub fn is_gtin_shaped(&self) -> bool {
        matches!(self.0.len(), 8 | 12 | 13 | 14) && self.0.bytes().all(|b| b.is_ascii_digit())
    }

    #[must_use]
    pub fn symbology(&self) -> Symbology {
        if !self.is_gtin_shaped() || !gtin_check_digit_matches(&self.0) {
            return Symbology::Other;
        }
        match self.0.len() {
            8 => Symbology::Ean8,
            12 => Symbology::UpcA,
            13 => Symbology::Ean13,
            _ => Symbology::Gtin14,
        }
    }
}

/// Trims surrounding whitespace; rejects empty input and embedded
/// whitespace or control characters.
impl FromStr for Barcode {
    type Err = BarcodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.is_empty() {
            return Err(BarcodeError::Empty);
        }
        if code.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(BarcodeError::InvalidCharacters);
        }
        Ok(Self(code.to_string()))
    }
}

impl TryFrom<String> for Barcode {
    type Error = BarcodeError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        code.parse()
    }
}

impl fmt::Display for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mod-10 GTIN check: weights alternate 3, 1 starting from the digit left of
/// the check digit.
fn gtin_check_digit_matches(digits: &str) -> bool {
    let values: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();
    let Some((check, body)) = values.split_last() else {
        return false;
    };
    let sum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d * 3 } else { *d })
        .sum();
    (10 - sum % 10) % 10 == *check
}
