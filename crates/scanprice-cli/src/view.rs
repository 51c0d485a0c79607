//! Presentation model for the interactive session.
//!
//! Handlers in [`crate::app`] mutate a [`View`]; the terminal renders it after
//! every step. The status line is overwritten each time, no history is kept.

use std::fmt::Write as _;

use scanprice_core::{Barcode, Coordinate, Price, SelectionLabel, SupermarketCandidate};

pub const GEOLOCATION_UNSUPPORTED: &str = "Geolocalizzazione non supportata.";
pub const GEOLOCATION_DENIED: &str = "Permesso geolocalizzazione negato o errore.";
pub const NONE_FOUND: &str =
    "Nessun supermercato trovato nel raggio di 500m. Inserisci manualmente.";
pub const FINDER_FAILED: &str = "Errore nel recupero supermercati. Inserisci manualmente.";
pub const OPENING_CAMERA: &str = "Apro la fotocamera per la scansione barcode...";
pub const NO_BARCODE: &str = "Nessun barcode rilevato, riprova.";

pub const ALERT_MANUAL_FIELDS: &str = "Inserisci nome e città";
pub const ALERT_SELECT_FIRST: &str = "Seleziona prima un supermercato";
pub const ALERT_INVALID_PRICE: &str = "Inserisci un prezzo valido";
pub const ALERT_SCAN_FIRST: &str = "Scansiona prima un prodotto";
pub const ALERT_INVALID_CHOICE: &str = "Scelta non valida";
pub const ALERT_MANUAL_HIDDEN: &str = "Inserimento manuale non disponibile";
pub const ALERT_UNKNOWN_COMMAND: &str = "Comando non riconosciuto";

#[must_use]
pub fn locating(at: &Coordinate) -> String {
    format!("Posizione: {at}. Cerco supermercati...")
}

#[must_use]
pub fn found(count: usize) -> String {
    format!("Trovati {count} supermercati. Selezionane uno.")
}

#[must_use]
pub fn selected(label: &SelectionLabel) -> String {
    format!("Supermercato selezionato: {label}")
}

#[must_use]
pub fn entered(label: &SelectionLabel) -> String {
    format!("Supermercato inserito: {label}")
}

#[must_use]
pub fn detected(barcode: &Barcode) -> String {
    format!("Barcode rilevato: {barcode}")
}

#[must_use]
pub fn saved(price: &Price, barcode: &Barcode, label: &SelectionLabel) -> String {
    format!("Prezzo €{price} salvato per barcode {barcode} al supermercato {label}.")
}

/// Everything the user currently sees.
#[derive(Debug, Default)]
pub struct View {
    pub status: String,
    pub origin: Option<Coordinate>,
    pub candidates: Vec<SupermarketCandidate>,
    pub manual_form_visible: bool,
    pub scan_enabled: bool,
    pub price_input_visible: bool,
    alerts: Vec<String>,
}

impl View {
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn alert(&mut self, message: impl Into<String>) {
        self.alerts.push(message.into());
    }

    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    /// Renders the view as terminal text, one item per line.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "── {}", self.status);

        if !self.candidates.is_empty() {
            let _ = writeln!(out, "Supermercati vicini:");
            for (i, candidate) in self.candidates.iter().enumerate() {
                let distance = self
                    .origin
                    .as_ref()
                    .and_then(|o| candidate.distance_from(o))
                    .map(|d| format!(" ({d:.0} m)"))
                    .unwrap_or_default();
                let _ = writeln!(out, "  [{}] {}{distance}", i + 1, candidate.label());
            }
        }

        let mut commands = Vec::new();
        if self.price_input_visible {
            commands.push("<prezzo> salva (es. 2.50)");
        }
        if !self.candidates.is_empty() {
            commands.push("<numero> scegli");
        }
        if self.manual_form_visible {
            commands.push("m inserisci a mano");
        }
        if self.scan_enabled {
            commands.push("s scansiona");
        }
        commands.push("q esci");
        let _ = writeln!(out, "Comandi: {}", commands.join(" · "));
        out
    }
}
