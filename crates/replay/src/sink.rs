//! Output CSV: `ts_event,rolling_vpin,trade_price,bid_px,ask_px`.
//!
//! `rolling_vpin` is an empty field until the first bucket completes;
//! `trade_price` is zero on rows that were not qualifying trades.

use std::io::Write;

use serde::Serialize;
use vpin_core::types::OutputRecord;

#[derive(Debug, Serialize)]
struct OutputRow {
    ts_event: u64,
    rolling_vpin: Option<f64>,
    trade_price: String,
    bid_px: String,
    ask_px: String,
}

impl From<&OutputRecord> for OutputRow {
    fn from(r: &OutputRecord) -> Self {
        Self {
            ts_event: r.ts_event.as_nanos(),
            rolling_vpin: r.rolling_vpin,
            trade_price: r.trade_price_or_zero().to_string(),
            bid_px: r.best_bid_price.to_string(),
            ask_px: r.best_ask_price.to_string(),
        }
    }
}

/// Serializes [`OutputRecord`]s as CSV with a header row.
pub struct OutputCsvWriter<W: Write> {
    inner: csv::Writer<W>,
    rows: u64,
}

impl<W: Write> OutputCsvWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: csv::WriterBuilder::new().has_headers(true).from_writer(writer),
            rows: 0,
        }
    }

    pub fn write(&mut self, record: &OutputRecord) -> Result<(), csv::Error> {
        self.inner.serialize(OutputRow::from(record))?;
        self.rows += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), csv::Error> {
        self.inner.flush()?;
        Ok(())
    }

    /// Rows written, excluding the header.
    pub fn rows_written(&self) -> u64 {
        self.rows
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W, csv::Error> {
        self.inner
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))
    }
}
