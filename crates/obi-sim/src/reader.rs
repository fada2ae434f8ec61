//! Tick-data file reader.
//!
//! Supports two line formats, detected per line:
//! 1. Binance combined-stream messages, optionally prefixed by a local receive
//!    timestamp in nanoseconds: `<ts_ns> {"stream":"btcusdt@bookTicker","data":{...}}`
//! 2. Normalised snapshots:
//!    `{"timestamp":..,"bid_price":..,"bid_qty":..,"ask_price":..,"ask_qty":..}`
//!
//! Non-`bookTicker` streams and other symbols are skipped.

use obi_core::{BookSnapshot, Price, Size, Timestamp};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{SimError, SimResult};

const NANOS_PER_MILLI: i64 = 1_000_000;

/// Combined-stream envelope.
#[derive(Debug, Deserialize)]
struct StreamEnvelope {
    stream: String,
    data: serde_json::Value,
}

/// `bookTicker` payload. Prices and quantities arrive as strings.
#[derive(Debug, Deserialize)]
struct BookTicker {
    #[serde(rename = "s")]
    symbol: String,
    #[serde(rename = "b")]
    bid_price: String,
    #[serde(rename = "B")]
    bid_qty: String,
    #[serde(rename = "a")]
    ask_price: String,
    #[serde(rename = "A")]
    ask_qty: String,
    /// Transaction time, milliseconds.
    #[serde(rename = "T", default)]
    transaction_time: Option<i64>,
    /// Event time, milliseconds.
    #[serde(rename = "E", default)]
    event_time: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawLine {
    Stream(StreamEnvelope),
    Snapshot(BookSnapshot),
}

/// Reads top-of-book snapshots for one instrument.
#[derive(Debug, Clone)]
pub struct TickReader {
    instrument: Option<String>,
}

impl TickReader {
    /// Reader keeping only `instrument` (case-insensitive) from stream lines.
    pub fn new(instrument: impl Into<String>) -> Self {
        Self {
            instrument: Some(instrument.into()),
        }
    }

    /// Reader keeping every symbol.
    pub fn any_instrument() -> Self {
        Self { instrument: None }
    }

    pub fn read_path(&self, path: impl AsRef<Path>) -> SimResult<Vec<BookSnapshot>> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let snapshots = self.read(BufReader::new(file))?;
        info!(
            path = %path.display(),
            snapshots = snapshots.len(),
            "Loaded tick data"
        );
        Ok(snapshots)
    }

    /// Parse every line, returning snapshots in timestamp order.
    pub fn read<R: BufRead>(&self, reader: R) -> SimResult<Vec<BookSnapshot>> {
        let mut snapshots = Vec::new();
        let mut skipped = 0usize;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            match self.parse_line(&line) {
                Ok(Some(snapshot)) => snapshots.push(snapshot),
                Ok(None) => skipped += 1,
                Err(reason) => {
                    return Err(SimError::InvalidLine {
                        line: idx + 1,
                        reason,
                    })
                }
            }
        }

        snapshots.sort_by_key(|s| s.timestamp);
        debug!(kept = snapshots.len(), skipped, "Parsed tick data");
        Ok(snapshots)
    }

    /// Parse one line. `Ok(None)` means the line carries nothing for this reader.
    fn parse_line(&self, line: &str) -> Result<Option<BookSnapshot>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (local_ts, json) = split_local_timestamp(line)?;
        let raw: RawLine = serde_json::from_str(json).map_err(|e| e.to_string())?;

        match raw {
            RawLine::Snapshot(snapshot) => Ok(Some(snapshot)),
            RawLine::Stream(envelope) => {
                if !envelope.stream.ends_with("@bookTicker") {
                    return Ok(None);
                }
                let ticker: BookTicker =
                    serde_json::from_value(envelope.data).map_err(|e| e.to_string())?;
                if let Some(instrument) = &self.instrument {
                    if !ticker.symbol.eq_ignore_ascii_case(instrument) {
                        return Ok(None);
                    }
                }
                ticker_to_snapshot(ticker, local_ts).map(Some)
            }
        }
    }
}

/// Split an optional leading `<digits> ` receive timestamp from the JSON body.
fn split_local_timestamp(line: &str) -> Result<(Option<Timestamp>, &str), String> {
    if line.starts_with('{') {
        return Ok((None, line));
    }
    let (prefix, rest) = line
        .split_once(char::is_whitespace)
        .ok_or_else(|| "expected JSON object".to_string())?;
    let ts = prefix
        .parse::<Timestamp>()
        .map_err(|e| format!("bad timestamp prefix {prefix:?}: {e}"))?;
    Ok((Some(ts), rest.trim_start()))
}

fn ticker_to_snapshot(ticker: BookTicker, local_ts: Option<Timestamp>) -> Result<BookSnapshot, String> {
    let timestamp = match local_ts {
        Some(ts) => ts,
        None => {
            let ms = ticker
                .transaction_time
                .or(ticker.event_time)
                .ok_or_else(|| "bookTicker without timestamp".to_string())?;
            ms.checked_mul(NANOS_PER_MILLI)
                .ok_or_else(|| format!("timestamp {ms} ms out of range"))?
        }
    };

    let price = |field: &str, v: &str| {
        v.parse::<Price>()
            .map_err(|e| format!("bad {field} {v:?}: {e}"))
    };
    let size = |field: &str, v: &str| {
        v.parse::<Size>()
            .map_err(|e| format!("bad {field} {v:?}: {e}"))
    };

    Ok(BookSnapshot::new(
        timestamp,
        price("bid price", &ticker.bid_price)?,
        size("bid qty", &ticker.bid_qty)?,
        price("ask price", &ticker.ask_price)?,
        size("ask qty", &ticker.ask_qty)?,
    ))
}
