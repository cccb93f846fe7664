use serde::{Deserialize, Serialize};

/// A single executed buy or sell, as recorded by the trading process.
///
/// Trades are append-only: once written a row is never mutated, and
/// `timestamp_micros` is non-decreasing across the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub mint: String,
    /// `"buy"` or `"sell"`, stored verbatim.
    pub trade_type: String,
    pub price: f64,
    pub sol_amount: f64,
    /// Microseconds since the Unix epoch.
    pub timestamp_micros: i64,
}
