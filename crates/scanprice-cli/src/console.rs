//! Line-oriented terminal input shared by the command loop and the
//! keyboard-wedge barcode reader.

use std::io::Write as _;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};
use tokio::sync::Mutex;

type LineSource = Lines<BufReader<Box<dyn AsyncRead + Unpin + Send>>>;

/// Cloneable handle to one input stream. Clones read from the same lines.
#[derive(Clone)]
pub struct Console {
    lines: Arc<Mutex<LineSource>>,
}

impl Console {
    #[must_use]
    pub fn stdin() -> Self {
        Self::from_reader(tokio::io::stdin())
    }

    pub fn from_reader(reader: impl AsyncRead + Unpin + Send + 'static) -> Self {
        let boxed: Box<dyn AsyncRead + Unpin + Send> = Box::new(reader);
        Self {
            lines: Arc::new(Mutex::new(BufReader::new(boxed).lines())),
        }
    }

    /// Prints `text` without a newline and waits for the next input line.
    ///
    /// Returns `Ok(None)` at end of input.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from flushing stdout or reading input.
    pub async fn prompt(&self, text: &str) -> std::io::Result<Option<String>> {
        print!("{text}");
        std::io::stdout().flush()?;
        self.lines.lock().await.next_line().await
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console").finish_non_exhaustive()
    }
}
