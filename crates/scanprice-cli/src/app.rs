//! Session state and the handlers that drive it.
//!
//! Every handler catches its own failures and turns them into a status
//! message or an alert on the [`View`]; nothing propagates to the caller.

use std::time::Duration;

use scanprice_core::{
    Barcode, Coordinate, Price, PriceEntry, SelectionLabel, SEARCH_RADIUS_METERS,
};

use crate::finder::SupermarketFinder;
use crate::ledger::PriceLedger;
use crate::location::{LocationError, Locator};
use crate::scanner::{BarcodeReader, CaptureSession};
use crate::view::{self, View};

/// Mutable session state owned by [`App`].
#[derive(Debug, Default)]
pub struct AppState {
    /// The one active supermarket; overwritten by each new selection.
    pub selection: Option<SelectionLabel>,
    /// Last decoded barcode still waiting for a price.
    pub pending_scan: Option<Barcode>,
}

pub struct App<L, F, R, P> {
    locator: L,
    finder: F,
    reader: R,
    ledger: P,
    location_timeout: Duration,
    state: AppState,
    view: View,
}

impl<L, F, R, P> App<L, F, R, P>
where
    L: Locator,
    F: SupermarketFinder,
    R: BarcodeReader,
    P: PriceLedger,
{
    pub fn new(locator: L, finder: F, reader: R, ledger: P, location_timeout: Duration) -> Self {
        Self {
            locator,
            finder,
            reader,
            ledger,
            location_timeout,
            state: AppState::default(),
            view: View::default(),
        }
    }

    #[must_use]
    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn take_alerts(&mut self) -> Vec<String> {
        self.view.take_alerts()
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn ledger(&self) -> &P {
        &self.ledger
    }

    #[must_use]
    pub fn awaiting_price(&self) -> bool {
        self.state.pending_scan.is_some()
    }

    /// Acquires the position once and, on success, searches around it.
    pub async fn start(&mut self) {
        if let Some(at) = self.acquire_location().await {
            self.find_supermarkets(at).await;
        }
    }

    /// One bounded attempt to read the device position.
    pub async fn acquire_location(&mut self) -> Option<Coordinate> {
        let attempt =
            tokio::time::timeout(self.location_timeout, self.locator.current_position()).await;
        let result = attempt.unwrap_or(Err(LocationError::TimedOut(self.location_timeout)));

        match result {
            Ok(at) => {
                tracing::info!(
                    latitude = at.latitude(),
                    longitude = at.longitude(),
                    "position acquired"
                );
                self.view.set_status(view::locating(&at));
                Some(at)
            }
            Err(LocationError::Unsupported) => {
                tracing::warn!("geolocation unsupported");
                self.view.set_status(view::GEOLOCATION_UNSUPPORTED);
                self.view.manual_form_visible = true;
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "geolocation failed");
                self.view.set_status(view::GEOLOCATION_DENIED);
                self.view.manual_form_visible = true;
                None
            }
        }
    }

    /// Searches supermarkets around `at` and renders the result.
    pub async fn find_supermarkets(&mut self, at: Coordinate) {
        match self.finder.find_nearby(at, SEARCH_RADIUS_METERS).await {
            Ok(candidates) if !candidates.is_empty() => {
                tracing::info!(count = candidates.len(), "supermarkets found");
                self.view.set_status(view::found(candidates.len()));
                self.view.origin = Some(at);
                self.view.candidates = candidates;
                self.view.manual_form_visible = false;
            }
            Ok(_) => {
                tracing::info!("no supermarkets within radius");
                self.view.set_status(view::NONE_FOUND);
                self.view.candidates.clear();
                self.view.manual_form_visible = true;
            }
            Err(e) => {
                tracing::warn!(error = %e, "supermarket search failed");
                self.view.set_status(view::FINDER_FAILED);
                self.view.candidates.clear();
                self.view.manual_form_visible = true;
            }
        }
    }

    /// Picks the rendered candidate at `index` (zero-based).
    pub fn pick(&mut self, index: usize) {
        let Some(candidate) = self.view.candidates.get(index) else {
            self.view.alert(view::ALERT_INVALID_CHOICE);
            return;
        };
        let label = SelectionLabel::from_candidate(candidate);
        self.view.set_status(view::selected(&label));
        self.apply_selection(label);
    }

    /// Submits the manual-entry form.
    pub fn submit_manual(&mut self, name: &str, city: &str) {
        match SelectionLabel::manual(name, city) {
            Ok(label) => {
                self.view.set_status(view::entered(&label));
                self.apply_selection(label);
            }
            Err(e) => {
                tracing::debug!(error = %e, "manual entry rejected");
                self.view.alert(view::ALERT_MANUAL_FIELDS);
            }
        }
    }

    fn apply_selection(&mut self, label: SelectionLabel) {
        tracing::info!(supermarket = %label, "supermarket selected");
        self.state.selection = Some(label);
        self.view.scan_enabled = true;
        self.view.manual_form_visible = false;
        self.view.candidates.clear();
    }

    /// Checks that a supermarket is selected and announces the capture.
    ///
    /// Returns `false`, with an alert queued, when no selection exists. The
    /// caller shows the status before [`App::capture_scan`] takes over the
    /// input.
    pub fn begin_scan(&mut self) -> bool {
        if self.state.selection.is_none() {
            self.view.alert(view::ALERT_SELECT_FIRST);
            return false;
        }
        self.view.set_status(view::OPENING_CAMERA);
        true
    }

    /// Reads one barcode after [`App::begin_scan`] succeeded.
    pub async fn capture_scan(&mut self) {
        let result = match CaptureSession::open(&mut self.reader) {
            Ok(mut session) => session.decode_once().await,
            Err(e) => Err(e),
        };

        match result {
            Ok(barcode) => {
                tracing::info!(%barcode, symbology = %barcode.symbology(), "barcode decoded");
                self.view.set_status(view::detected(&barcode));
                self.view.price_input_visible = true;
                self.state.pending_scan = Some(barcode);
            }
            Err(e) => {
                tracing::warn!(error = %e, "scan failed");
                self.view.set_status(view::NO_BARCODE);
                self.view.price_input_visible = false;
                self.state.pending_scan = None;
            }
        }
    }

    /// Validates `input` and records a price for the pending scan.
    pub fn save_price(&mut self, input: &str) {
        let (Some(barcode), Some(label)) = (&self.state.pending_scan, &self.state.selection)
        else {
            self.view.alert(view::ALERT_SCAN_FIRST);
            return;
        };

        let price = match input.parse::<Price>() {
            Ok(price) => price,
            Err(e) => {
                tracing::debug!(error = %e, "price rejected");
                self.view.alert(view::ALERT_INVALID_PRICE);
                return;
            }
        };

        self.view.set_status(view::saved(&price, barcode, label));
        let entry = PriceEntry::new(barcode.clone(), price, label.clone());
        tracing::info!(
            barcode = %entry.barcode,
            price = %entry.price,
            supermarket = %entry.supermarket,
            "price recorded"
        );
        self.ledger.record(entry);
        self.state.pending_scan = None;
        self.view.price_input_visible = false;
    }
}

#[cfg(test)]
#[path = "app_test.rs"]
mod tests;
