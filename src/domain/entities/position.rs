use serde::{Deserialize, Serialize};

/// A tracked holding in one instrument, open from entry until an exit closes it.
///
/// A position is open while `exit_time_micros` is `None` and closes exactly
/// once when the trading process sets it. While open, the P&L columns are
/// rewritten on every price tick; after close the row is immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub mint: String,
    /// Microseconds since the Unix epoch.
    pub entry_time_micros: i64,
    /// SOL committed at entry.
    pub entry_sol: f64,
    pub tokens: Option<f64>,
    /// `None` while the position is open.
    pub exit_time_micros: Option<i64>,
    /// Unrealized P&L while open, realized P&L after close.
    pub pnl_sol: Option<f64>,
    pub pnl_percent: Option<f64>,
    pub hold_duration_secs: Option<i64>,
    pub holder_count_entry: Option<i64>,
    pub holder_count_exit: Option<i64>,
    pub exit_reason: Option<String>,
}

impl Position {
    pub fn is_closed(&self) -> bool {
        self.exit_time_micros.is_some()
    }

    /// A missing P&L counts as zero, which is not a win.
    pub fn is_win(&self) -> bool {
        self.pnl_sol.unwrap_or(0.0) > 0.0
    }

    /// Entry size plus live P&L, the display value of an open position.
    pub fn current_value(&self) -> f64 {
        self.entry_sol + self.pnl_sol.unwrap_or(0.0)
    }
}
