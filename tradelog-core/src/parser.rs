//! Trade-log parser — free-text report → `TradeRecord` stream.
//!
//! A trade log is a header followed by entries, each introduced by the
//! literal `ENTRY #`. Inside an entry only a few line prefixes matter:
//!
//! ```text
//! ENTRY #12
//! Time: 2024-03-04 09:35:00
//! Direction: LONG
//! Exit Time: 2024-03-04 14:10:00
//! PnL: $1,234.50
//! ```
//!
//! Parsing is tolerant: a bad entry is skipped without disturbing its
//! neighbours, and a bad optional field only clears that field.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;
use tracing::debug;

use crate::domain::{Direction, TradeRecord};

/// Literal that starts every entry. Text before the first one is header.
pub const ENTRY_DELIMITER: &str = "ENTRY #";

/// Default separator between the instrument name and the rest of a log file name.
pub const DEFAULT_FILE_SEPARATOR: &str = "_trades_";

/// Why a single entry was discarded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("entry has no `Time:` line")]
    MissingEntryTime,

    #[error("entry has no `PnL:` line")]
    MissingPnl,

    #[error("invalid entry time '{0}'")]
    InvalidEntryTime(String),

    #[error("invalid pnl '{0}'")]
    InvalidPnl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    EntryTime,
    ExitTime,
    Pnl,
    Direction,
}

// `Time:` cannot match `Exit Time:` lines because matching is by prefix.
const PREFIXES: &[(&str, Field)] = &[
    ("Time:", Field::EntryTime),
    ("Exit Time:", Field::ExitTime),
    ("PnL:", Field::Pnl),
    ("P&L:", Field::Pnl),
    ("Direction:", Field::Direction),
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥'];

/// Every entry of a log with its parse outcome, in file order.
pub fn parse_entries<'a>(
    asset: &'a str,
    text: &'a str,
) -> impl Iterator<Item = Result<TradeRecord, ParseError>> + 'a {
    text.split(ENTRY_DELIMITER)
        .skip(1)
        .map(move |body| parse_entry(asset, body))
}

/// Valid trade records of a log, lazily. Discarded entries are logged at debug level.
pub fn parse_log<'a>(asset: &'a str, text: &'a str) -> impl Iterator<Item = TradeRecord> + 'a {
    parse_entries(asset, text)
        .enumerate()
        .filter_map(move |(i, parsed)| match parsed {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(asset, entry = i + 1, error = %e, "discarding trade-log entry");
                None
            }
        })
}

/// Parse the body of one entry (the text after an `ENTRY #` delimiter).
///
/// A later line with the same prefix overwrites an earlier one.
pub fn parse_entry(asset: &str, body: &str) -> Result<TradeRecord, ParseError> {
    let mut entry_time: Option<Result<NaiveDateTime, ParseError>> = None;
    let mut exit_time = None;
    let mut pnl: Option<Result<f64, ParseError>> = None;
    let mut direction = None;

    for line in body.lines() {
        let Some((field, value)) = match_prefix(line.trim_start()) else {
            continue;
        };
        let value = value.trim();
        match field {
            Field::EntryTime => {
                entry_time = Some(
                    parse_timestamp(value)
                        .ok_or_else(|| ParseError::InvalidEntryTime(value.to_string())),
                );
            }
            Field::ExitTime => exit_time = parse_timestamp(value),
            Field::Pnl => {
                pnl = Some(
                    parse_pnl(value).ok_or_else(|| ParseError::InvalidPnl(value.to_string())),
                );
            }
            Field::Direction => direction = Direction::parse(value),
        }
    }

    let entry_time = entry_time.ok_or(ParseError::MissingEntryTime)??;
    let pnl = pnl.ok_or(ParseError::MissingPnl)??;

    Ok(TradeRecord {
        asset: asset.to_string(),
        entry_time,
        exit_time,
        pnl,
        direction,
    })
}

fn match_prefix(line: &str) -> Option<(Field, &str)> {
    PREFIXES
        .iter()
        .find_map(|(prefix, field)| line.strip_prefix(prefix).map(|rest| (*field, rest)))
}

/// Parse a PnL value after stripping currency symbols, thousands separators
/// and inner whitespace. Non-finite results are rejected.
pub fn parse_pnl(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !CURRENCY_SYMBOLS.contains(c) && *c != ',' && !c.is_whitespace())
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a log timestamp.
///
/// Accepts `YYYY-MM-DD HH:MM[:SS[.fff]]` (space or `T`), RFC 3339 with an
/// offset (offset dropped, wall-clock kept) and bare dates (midnight).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_local())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Instrument name encoded in a log file name: the stem up to `separator`.
///
/// `EURUSD_trades_20240101.txt` → `EURUSD`. Returns `None` for files that
/// are not trade logs (no separator, or nothing before it).
pub fn asset_from_file_name<'a>(file_name: &'a str, separator: &str) -> Option<&'a str> {
    let stem = file_name
        .rsplit_once('.')
        .map_or(file_name, |(stem, _ext)| stem);
    stem.split_once(separator)
        .map(|(asset, _rest)| asset)
        .filter(|asset| !asset.is_empty())
}
