//! Barcode capture capability and the scoped capture session.
//!
//! A [`BarcodeReader`] is opened, asked for exactly one code, and released.
//! [`CaptureSession`] owns the open device and releases it when dropped, so
//! the device is freed on success, on failure, and when the scan future is
//! cancelled.

use scanprice_core::Barcode;
use thiserror::Error;

use crate::console::Console;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("no barcode decoded")]
    NothingDecoded,

    #[error("capture device error: {0}")]
    Device(String),
}

pub trait BarcodeReader {
    /// Acquires the capture device.
    fn open(&mut self) -> Result<(), ScanError>;

    /// Decodes one barcode from the open device.
    async fn decode_once(&mut self) -> Result<Barcode, ScanError>;

    /// Releases the device. Must be safe to call when nothing is open.
    fn release(&mut self);
}

/// An open capture device; released on drop.
pub struct CaptureSession<'a, R: BarcodeReader> {
    reader: &'a mut R,
}

impl<'a, R: BarcodeReader> CaptureSession<'a, R> {
    /// # Errors
    ///
    /// Returns the reader's [`ScanError`] if the device cannot be acquired.
    /// The reader is released before returning.
    pub fn open(reader: &'a mut R) -> Result<Self, ScanError> {
        if let Err(e) = reader.open() {
            reader.release();
            return Err(e);
        }
        Ok(Self { reader })
    }

    /// # Errors
    ///
    /// Returns [`ScanError`] when nothing was decoded or the device failed.
    pub async fn decode_once(&mut self) -> Result<Barcode, ScanError> {
        self.reader.decode_once().await
    }
}

impl<R: BarcodeReader> Drop for CaptureSession<'_, R> {
    fn drop(&mut self) {
        self.reader.release();
    }
}

/// Handheld scanners in keyboard mode type the code and press Enter.
///
/// Anything that does not form a [`Barcode`] counts as nothing decoded.
#[derive(Debug)]
pub struct KeyboardWedge {
    console: Console,
    active: bool,
}

impl KeyboardWedge {
    #[must_use]
    pub fn new(console: Console) -> Self {
        Self {
            console,
            active: false,
        }
    }
}

impl BarcodeReader for KeyboardWedge {
    fn open(&mut self) -> Result<(), ScanError> {
        if self.active {
            return Err(ScanError::Device("reader already in use".into()));
        }
        self.active = true;
        Ok(())
    }

    async fn decode_once(&mut self) -> Result<Barcode, ScanError> {
        if !self.active {
            return Err(ScanError::Device("reader not open".into()));
        }
        let line = self
            .console
            .prompt("Scansiona o digita il barcode: ")
            .await
            .map_err(|e| ScanError::Device(e.to_string()))?
            .ok_or_else(|| ScanError::Device("input closed".into()))?;

        let barcode = line.parse::<Barcode>().map_err(|e| {
            tracing::debug!(error = %e, "scanner input rejected");
            ScanError::NothingDecoded
        })?;
        if barcode.is_gtin_shaped() && barcode.symbology() == scanprice_core::Symbology::Other {
            tracing::debug!(%barcode, "GTIN-length code with mismatching check digit");
        }
        Ok(barcode)
    }

    fn release(&mut self) {
        self.active = false;
    }
}
