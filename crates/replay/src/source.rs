//! Databento MBP-1 CSV decoding.
//!
//! Columns are matched by header name; extra columns (`rtype`, `publisher_id`,
//! `bid_sz_00`, `symbol`, ...) are ignored. Required:
//! `ts_event, action, side, price, size, bid_px_00, ask_px_00`.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use serde::Deserialize;
use vpin_core::types::{Action, EventRecord, Price, Side, Timestamp};
use vpin_core::ParseError;

/// Encoding of price columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriceFormat {
    /// Decimal text, e.g. `240.510000000` (`pretty_px`).
    #[default]
    Decimal,
    /// Integer count of `1e-9` units, e.g. `240510000000`.
    Raw,
}

impl PriceFormat {
    /// Empty fields decode to zero, the "unavailable" price.
    fn parse(self, field: &str) -> Result<Price, ParseError> {
        if field.trim().is_empty() {
            return Ok(Price::ZERO);
        }
        match self {
            PriceFormat::Decimal => Price::parse_decimal(field),
            PriceFormat::Raw => Price::parse_raw(field),
        }
    }
}

/// Failure to read an input record. `record` is the 1-based data row.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("record {record}: {source}")]
    Csv {
        record: u64,
        #[source]
        source: csv::Error,
    },
    #[error("record {record}: {source}")]
    Field {
        record: u64,
        #[source]
        source: ParseError,
    },
}

#[derive(Debug, Deserialize)]
struct RawMbpRow {
    ts_event: String,
    action: String,
    side: String,
    price: String,
    size: u32,
    bid_px_00: String,
    ask_px_00: String,
}

impl RawMbpRow {
    fn into_event(self, format: PriceFormat) -> Result<EventRecord, ParseError> {
        Ok(EventRecord {
            ts_event: Timestamp::parse(&self.ts_event)?,
            action: self.action.parse::<Action>()?,
            side: self.side.parse::<Side>()?,
            price: format.parse(&self.price)?,
            size: self.size,
            best_bid_price: format.parse(&self.bid_px_00)?,
            best_ask_price: format.parse(&self.ask_px_00)?,
        })
    }
}

/// Streaming reader yielding one [`EventRecord`] per CSV row.
pub struct MbpCsvReader {
    rows: csv::DeserializeRecordsIntoIter<Box<dyn Read + Send>, RawMbpRow>,
    format: PriceFormat,
    record: u64,
}

impl MbpCsvReader {
    /// Open a CSV file, gunzipping it when the name ends in `.gz`.
    pub fn open(path: &Path, format: PriceFormat) -> Result<Self, DecodeError> {
        let file = File::open(path).map_err(|source| DecodeError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let reader: Box<dyn Read + Send> = if path.extension().map_or(false, |e| e == "gz") {
            Box::new(MultiGzDecoder::new(file))
        } else {
            Box::new(file)
        };
        Ok(Self::from_reader(reader, format))
    }

    /// Decode CSV from any reader. The first row must be the header.
    pub fn from_reader(reader: Box<dyn Read + Send>, format: PriceFormat) -> Self {
        let rows = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader)
            .into_deserialize();
        Self {
            rows,
            format,
            record: 0,
        }
    }
}

impl Iterator for MbpCsvReader {
    type Item = Result<EventRecord, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        self.record += 1;
        let record = self.record;
        let format = self.format;
        Some(
            row.map_err(|source| DecodeError::Csv { record, source })
                .and_then(|row| {
                    row.into_event(format)
                        .map_err(|source| DecodeError::Field { record, source })
                }),
        )
    }
}
