//! TradeRecord — one completed round-trip trade recovered from a trade log.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Side of a trade, when the log states it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// Case-insensitive parse of a `Direction:` value. Unknown words yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "long" | "buy" => Some(Direction::Long),
            "short" | "sell" => Some(Direction::Short),
            _ => None,
        }
    }
}

/// A completed trade: entry → exit with realized PnL.
///
/// Only `entry_time` and `pnl` are required; the parser never builds a
/// record without both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeRecord {
    pub asset: String,
    pub entry_time: NaiveDateTime,
    #[serde(default)]
    pub exit_time: Option<NaiveDateTime>,
    pub pnl: f64,
    #[serde(default)]
    pub direction: Option<Direction>,
}

impl TradeRecord {
    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }

    /// Calendar date of entry, used for the per-day entry counts.
    pub fn entry_date(&self) -> NaiveDate {
        self.entry_time.date()
    }

    /// When the PnL was realized: the exit time, or the entry time when the
    /// log has no exit line.
    pub fn close_time(&self) -> NaiveDateTime {
        self.exit_time.unwrap_or(self.entry_time)
    }
}
