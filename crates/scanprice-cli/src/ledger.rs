//! Persistence boundary for recorded prices.
//!
//! Only [`SessionLedger`] exists: entries live in memory for the lifetime of
//! the session and are never written, sent, or aggregated.

use scanprice_core::PriceEntry;

pub trait PriceLedger {
    fn record(&mut self, entry: PriceEntry);
}

#[derive(Debug, Default)]
pub struct SessionLedger {
    entries: Vec<PriceEntry>,
}

impl SessionLedger {
    #[must_use]
    pub fn entries(&self) -> &[PriceEntry] {
        &self.entries
    }
}

impl PriceLedger for SessionLedger {
    fn record(&mut self, entry: PriceEntry) {
        tracing::debug!(
            barcode = %entry.barcode,
            price = %entry.price,
            supermarket = %entry.supermarket,
            "price kept in session memory only"
        );
        self.entries.push(entry);
    }
}
