//! Domain types for trade-log statistics

pub mod asset;
pub mod ratio;
pub mod trade;

pub use asset::{AssetResult, DrawdownUnit};
pub use ratio::{format_ratio, percentage, profit_factor};
pub use trade::{Direction, TradeRecord};

/// Instrument identifier type alias
pub type Asset = String;
