use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use scanprice_core::{SupermarketCandidate, UNNAMED_SUPERMARKET};

use super::*;
use crate::ledger::SessionLedger;
use crate::scanner::ScanError;

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

enum FakeLocator {
    At(Coordinate),
    Fails(fn() -> LocationError),
    Hangs,
}

impl Locator for FakeLocator {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        match self {
            FakeLocator::At(at) => Ok(*at),
            FakeLocator::Fails(make) => Err(make()),
            FakeLocator::Hangs => std::future::pending().await,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("fake finder failure")]
struct FakeFinderError;

#[derive(Default)]
struct FakeFinder {
    response: Option<Vec<SupermarketCandidate>>,
    calls: Arc<Mutex<Vec<(Coordinate, u32)>>>,
}

impl SupermarketFinder for FakeFinder {
    type Error = FakeFinderError;

    async fn find_nearby(
        &self,
        at: Coordinate,
        radius_m: u32,
    ) -> Result<Vec<SupermarketCandidate>, FakeFinderError> {
        self.calls.lock().unwrap().push((at, radius_m));
        self.response.clone().ok_or(FakeFinderError)
    }
}

#[derive(Default)]
struct ReaderLog {
    opens: u32,
    releases: u32,
}

/// Returns queued decode results in order; an empty queue means nothing decoded.
#[derive(Default)]
struct FakeReader {
    results: VecDeque<Result<&'static str, ScanError>>,
    fail_open: bool,
    log: Arc<Mutex<ReaderLog>>,
}

impl BarcodeReader for FakeReader {
    fn open(&mut self) -> Result<(), ScanError> {
        self.log.lock().unwrap().opens += 1;
        if self.fail_open {
            return Err(ScanError::Device("no camera".into()));
        }
        Ok(())
    }

    async fn decode_once(&mut self) -> Result<Barcode, ScanError> {
        match self.results.pop_front() {
            Some(Ok(code)) => Ok(code.parse().expect("test barcode should be valid")),
            Some(Err(e)) => Err(e),
            None => Err(ScanError::NothingDecoded),
        }
    }

    fn release(&mut self) {
        self.log.lock().unwrap().releases += 1;
    }
}

type TestApp = App<FakeLocator, FakeFinder, FakeReader, SessionLedger>;

fn coord(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).unwrap()
}

fn named(name: &str) -> SupermarketCandidate {
    SupermarketCandidate {
        osm_id: None,
        name: Some(name.to_string()),
        position: None,
    }
}

fn app_with(locator: FakeLocator, finder: FakeFinder, reader: FakeReader) -> TestApp {
    App::new(
        locator,
        finder,
        reader,
        SessionLedger::default(),
        Duration::from_secs(5),
    )
}

fn idle_app() -> TestApp {
    app_with(
        FakeLocator::Fails(|| LocationError::Unsupported),
        FakeFinder::default(),
        FakeReader::default(),
    )
}

fn app_with_codes(codes: &[&'static str]) -> (TestApp, Arc<Mutex<ReaderLog>>) {
    let reader = FakeReader {
        results: codes.iter().map(|c| Ok(*c)).collect(),
        ..FakeReader::default()
    };
    let log = Arc::clone(&reader.log);
    (
        app_with(
            FakeLocator::Fails(|| LocationError::Unsupported),
            FakeFinder::default(),
            reader,
        ),
        log,
    )
}

// ---------------------------------------------------------------------------
// Location and search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn finder_receives_exact_position() {
    let finder = FakeFinder {
        response: Some(vec![named("Conad")]),
        ..FakeFinder::default()
    };
    let calls = Arc::clone(&finder.calls);
    let mut app = app_with(
        FakeLocator::At(coord(45.123_456, 9.654_321)),
        finder,
        FakeReader::default(),
    );

    app.start().await;

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, coord(45.123_456, 9.654_321));
    assert_eq!(calls[0].1, 500);
}

#[tokio::test]
async fn one_entry_per_element_and_manual_form_hidden() {
    let finder = FakeFinder {
        response: Some(vec![named("Conad")]),
        ..FakeFinder::default()
    };
    let mut app = app_with(FakeLocator::At(coord(45.0, 9.0)), finder, FakeReader::default());

    app.start().await;

    let view = app.view();
    assert_eq!(view.candidates.len(), 1);
    assert_eq!(view.candidates[0].label(), "Conad");
    assert!(!view.manual_form_visible);
    assert!(!view.scan_enabled);
}

#[tokio::test]
async fn unnamed_element_gets_placeholder_label() {
    let finder = FakeFinder {
        response: Some(vec![SupermarketCandidate {
            osm_id: Some(3),
            name: None,
            position: None,
        }]),
        ..FakeFinder::default()
    };
    let mut app = app_with(FakeLocator::At(coord(45.0, 9.0)), finder, FakeReader::default());

    app.start().await;
    app.pick(0);

    assert_eq!(
        app.state().selection.as_ref().map(SelectionLabel::as_str),
        Some(UNNAMED_SUPERMARKET)
    );
}

#[tokio::test]
async fn empty_result_shows_manual_form_and_message() {
    let finder = FakeFinder {
        response: Some(Vec::new()),
        ..FakeFinder::default()
    };
    let mut app = app_with(FakeLocator::At(coord(45.0, 9.0)), finder, FakeReader::default());

    app.start().await;

    assert_eq!(
        app.view().status,
        "Nessun supermercato trovato nel raggio di 500m. Inserisci manualmente."
    );
    assert!(app.view().manual_form_visible);
    assert!(app.view().candidates.is_empty());
}

#[tokio::test]
async fn finder_error_shows_manual_form_and_message() {
    let mut app = app_with(
        FakeLocator::At(coord(45.0, 9.0)),
        FakeFinder::default(),
        FakeReader::default(),
    );

    app.start().await;

    assert_eq!(app.view().status, view::FINDER_FAILED);
    assert!(!app.view().status.is_empty());
    assert!(app.view().manual_form_visible);
}

#[tokio::test]
async fn unsupported_location_reveals_manual_form_without_search() {
    let finder = FakeFinder::default();
    let calls = Arc::clone(&finder.calls);
    let mut app = app_with(
        FakeLocator::Fails(|| LocationError::Unsupported),
        finder,
        FakeReader::default(),
    );

    app.start().await;

    assert_eq!(app.view().status, view::GEOLOCATION_UNSUPPORTED);
    assert!(app.view().manual_form_visible);
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn denied_location_reveals_manual_form() {
    let mut app = app_with(
        FakeLocator::Fails(|| LocationError::Denied),
        FakeFinder::default(),
        FakeReader::default(),
    );

    app.start().await;

    assert_eq!(app.view().status, view::GEOLOCATION_DENIED);
    assert!(app.view().manual_form_visible);
}

#[tokio::test(start_paused = true)]
async fn hanging_location_times_out_into_denied_branch() {
    let finder = FakeFinder::default();
    let calls = Arc::clone(&finder.calls);
    let mut app = app_with(FakeLocator::Hangs, finder, FakeReader::default());

    app.start().await;

    assert_eq!(app.view().status, view::GEOLOCATION_DENIED);
    assert!(app.view().manual_form_visible);
    assert!(calls.lock().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn picking_candidate_sets_selection_and_enables_scan() {
    let finder = FakeFinder {
        response: Some(vec![named("Conad"), named("Lidl")]),
        ..FakeFinder::default()
    };
    let mut app = app_with(FakeLocator::At(coord(45.0, 9.0)), finder, FakeReader::default());
    app.start().await;

    app.pick(1);

    assert_eq!(
        app.state().selection.as_ref().map(SelectionLabel::as_str),
        Some("Lidl")
    );
    assert!(app.view().scan_enabled);
    assert!(app.view().candidates.is_empty());
    assert!(!app.view().manual_form_visible);
    assert_eq!(app.view().status, "Supermercato selezionato: Lidl");
}

#[test]
fn picking_out_of_range_alerts_and_changes_nothing() {
    let mut app = idle_app();

    app.pick(0);

    assert!(app.state().selection.is_none());
    assert_eq!(app.take_alerts(), vec![view::ALERT_INVALID_CHOICE]);
}

#[test]
fn manual_entry_composes_label_and_enables_scan() {
    let mut app = idle_app();

    app.submit_manual("  Esselunga ", " Milano ");

    assert_eq!(
        app.state().selection.as_ref().map(SelectionLabel::as_str),
        Some("Esselunga, Milano")
    );
    assert!(app.view().scan_enabled);
    assert!(!app.view().manual_form_visible);
    assert_eq!(app.view().status, "Supermercato inserito: Esselunga, Milano");
    assert!(app.take_alerts().is_empty());
}

#[test]
fn manual_entry_with_blank_field_alerts_and_keeps_selection() {
    let mut app = idle_app();
    app.submit_manual("Coop", "Torino");

    app.submit_manual("Esselunga", "   ");
    app.submit_manual("", "Milano");

    assert_eq!(
        app.state().selection.as_ref().map(SelectionLabel::as_str),
        Some("Coop, Torino")
    );
    assert_eq!(
        app.take_alerts(),
        vec![view::ALERT_MANUAL_FIELDS, view::ALERT_MANUAL_FIELDS]
    );
}

#[test]
fn new_selection_overwrites_previous() {
    let mut app = idle_app();
    app.submit_manual("Coop", "Torino");
    app.submit_manual("Conad", "Bologna");

    assert_eq!(
        app.state().selection.as_ref().map(SelectionLabel::as_str),
        Some("Conad, Bologna")
    );
}

// ---------------------------------------------------------------------------
// Scan
// ---------------------------------------------------------------------------

async fn scan<L, F, R, P>(app: &mut App<L, F, R, P>)
where
    L: Locator,
    F: SupermarketFinder,
    R: BarcodeReader,
    P: PriceLedger,
{
    if app.begin_scan() {
        app.capture_scan().await;
    }
}

#[test]
fn begin_scan_announces_capture_before_touching_device() {
    let (mut app, log) = app_with_codes(&["8001234567890"]);
    app.submit_manual("Conad", "Bologna");

    assert!(app.begin_scan());

    assert_eq!(app.view().status, view::OPENING_CAMERA);
    assert_eq!(log.lock().unwrap().opens, 0);
    assert!(!app.awaiting_price());
}

#[test]
fn begin_scan_without_selection_is_refused() {
    let (mut app, _log) = app_with_codes(&[]);

    assert!(!app.begin_scan());

    assert_eq!(app.take_alerts(), vec![view::ALERT_SELECT_FIRST]);
    assert_ne!(app.view().status, view::OPENING_CAMERA);
}

#[tokio::test]
async fn scan_without_selection_alerts_and_never_opens_device() {
    let (mut app, log) = app_with_codes(&["8001234567890"]);

    scan(&mut app).await;

    assert_eq!(app.take_alerts(), vec![view::ALERT_SELECT_FIRST]);
    assert_eq!(log.lock().unwrap().opens, 0);
    assert!(!app.awaiting_price());
}

#[tokio::test]
async fn successful_scan_releases_device_and_awaits_price() {
    let (mut app, log) = app_with_codes(&["8001234567890"]);
    app.submit_manual("Conad", "Bologna");

    scan(&mut app).await;

    assert_eq!(app.view().status, "Barcode rilevato: 8001234567890");
    assert!(app.view().price_input_visible);
    assert!(app.awaiting_price());
    let log = log.lock().unwrap();
    assert_eq!(log.opens, 1);
    assert_eq!(log.releases, 1);
}

#[tokio::test]
async fn failed_scan_releases_device_and_asks_retry() {
    let (mut app, log) = app_with_codes(&[]);
    app.submit_manual("Conad", "Bologna");

    scan(&mut app).await;

    assert_eq!(app.view().status, view::NO_BARCODE);
    assert!(!app.awaiting_price());
    assert_eq!(log.lock().unwrap().releases, 1);
}

#[tokio::test]
async fn device_open_failure_still_releases() {
    let reader = FakeReader {
        fail_open: true,
        ..FakeReader::default()
    };
    let log = Arc::clone(&reader.log);
    let mut app = app_with(
        FakeLocator::Fails(|| LocationError::Unsupported),
        FakeFinder::default(),
        reader,
    );
    app.submit_manual("Conad", "Bologna");

    scan(&mut app).await;

    assert_eq!(app.view().status, view::NO_BARCODE);
    assert_eq!(log.lock().unwrap().releases, 1);
}

#[tokio::test]
async fn cancelled_scan_releases_device() {
    struct StuckReader {
        log: Arc<Mutex<ReaderLog>>,
    }

    impl BarcodeReader for StuckReader {
        fn open(&mut self) -> Result<(), ScanError> {
            self.log.lock().unwrap().opens += 1;
            Ok(())
        }

        async fn decode_once(&mut self) -> Result<Barcode, ScanError> {
            std::future::pending().await
        }

        fn release(&mut self) {
            self.log.lock().unwrap().releases += 1;
        }
    }

    let log = Arc::new(Mutex::new(ReaderLog::default()));
    let mut app = App::new(
        FakeLocator::Fails(|| LocationError::Unsupported),
        FakeFinder::default(),
        StuckReader {
            log: Arc::clone(&log),
        },
        SessionLedger::default(),
        Duration::from_secs(5),
    );
    app.submit_manual("Conad", "Bologna");

    let cancelled = tokio::time::timeout(Duration::from_millis(20), scan(&mut app)).await;

    assert!(cancelled.is_err(), "scan should not finish on its own");
    let log = log.lock().unwrap();
    assert_eq!(log.opens, 1);
    assert_eq!(log.releases, 1);
}

// ---------------------------------------------------------------------------
// Price
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scan_and_save_scenario() {
    let finder = FakeFinder {
        response: Some(vec![named("Conad")]),
        ..FakeFinder::default()
    };
    let reader = FakeReader {
        results: VecDeque::from([Ok("8001234567890")]),
        ..FakeReader::default()
    };
    let mut app = app_with(FakeLocator::At(coord(45.0, 9.0)), finder, reader);

    app.start().await;
    app.pick(0);
    scan(&mut app).await;
    app.save_price("2.50");

    let status = &app.view().status;
    assert!(status.contains("€2.50"), "got: {status}");
    assert!(status.contains("8001234567890"), "got: {status}");
    assert!(status.contains("Conad"), "got: {status}");
    assert!(!app.awaiting_price());
    assert!(!app.view().price_input_visible);

    let entries = app.ledger().entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].barcode.as_str(), "8001234567890");
    assert_eq!(entries[0].supermarket.as_str(), "Conad");
    assert_eq!(entries[0].price.to_string(), "2.50");
}

#[tokio::test]
async fn invalid_prices_alert_and_leave_state_unchanged() {
    let (mut app, _log) = app_with_codes(&["8001234567890"]);
    app.submit_manual("Conad", "Bologna");
    scan(&mut app).await;
    let status_before = app.view().status.clone();

    app.save_price("-1");
    app.save_price("abc");
    app.save_price("0");

    assert_eq!(
        app.take_alerts(),
        vec![
            view::ALERT_INVALID_PRICE,
            view::ALERT_INVALID_PRICE,
            view::ALERT_INVALID_PRICE
        ]
    );
    assert_eq!(app.view().status, status_before);
    assert!(app.awaiting_price());
    assert!(app.ledger().entries().is_empty());

    app.save_price("1,99");
    assert!(app.view().status.contains("€1.99"));
    assert_eq!(app.ledger().entries().len(), 1);
}

#[test]
fn save_without_scan_alerts() {
    let mut app = idle_app();
    app.submit_manual("Conad", "Bologna");

    app.save_price("2.50");

    assert_eq!(app.take_alerts(), vec![view::ALERT_SCAN_FIRST]);
    assert!(app.ledger().entries().is_empty());
}

#[tokio::test]
async fn repeated_cycles_are_independent() {
    let (mut app, log) = app_with_codes(&["4006381333931", "96385074"]);
    app.submit_manual("Conad", "Bologna");

    scan(&mut app).await;
    app.save_price("1.20");
    scan(&mut app).await;
    app.save_price("3.40");

    let entries = app.ledger().entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].barcode.as_str(), "4006381333931");
    assert_eq!(entries[0].price.to_string(), "1.20");
    assert_eq!(entries[1].barcode.as_str(), "96385074");
    assert_eq!(entries[1].price.to_string(), "3.40");
    assert_eq!(log.lock().unwrap().releases, 2);
}
