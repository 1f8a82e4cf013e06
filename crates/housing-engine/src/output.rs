//! Tick callback that writes one JSON line per tick summary.
//!
//! The runner callback cannot fail, so the first write error is kept and
//! later ticks are skipped. [`JsonLinesCallback::finish`] flushes the
//! writer and reports that error.

use std::io::{self, Write};

use housing_core::market::Market;
use housing_core::runner::TickCallback;
use housing_core::tick::TickSummary;
use tracing::{debug, warn};

/// Writes every [`TickSummary`] as a JSON line.
pub struct JsonLinesCallback<W: Write> {
    writer: W,
    lines: u64,
    error: Option<io::Error>,
}

impl<W: Write> JsonLinesCallback<W> {
    /// Callback writing into `writer`.
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            lines: 0,
            error: None,
        }
    }

    /// Number of summaries written so far.
    pub const fn lines(&self) -> u64 {
        self.lines
    }

    /// Flush the writer and hand it back.
    ///
    /// # Errors
    ///
    /// Returns the first error hit while writing, or the flush error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_line(&mut self, summary: &TickSummary) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, summary)?;
        self.writer.write_all(b"\n")
    }
}

impl<W: Write> TickCallback for JsonLinesCallback<W> {
    fn on_tick(&mut self, summary: &TickSummary, _market: &Market) {
        if self.error.is_some() {
            return;
        }
        match self.write_line(summary) {
            Ok(()) => {
                self.lines = self.lines.saturating_add(1);
                debug!(period = summary.period, "Tick summary written");
            }
            Err(err) => {
                warn!(period = summary.period, error = %err, "Failed to write tick summary");
                self.error = Some(err);
            }
        }
    }
}
