use std::sync::Arc;

use serde::Serialize;

use crate::application::ports::{StatsRow, StoreError, TelemetryStore};

/// Summary figures over the full position/trade history.
///
/// Counts are integers, everything else a float; no field is ever null or
/// NaN. With zero closed positions the rate and all closed-set averages are
/// exactly `0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSummary {
    pub total_trades: i64,
    pub open_positions: i64,
    pub closed_positions: i64,
    pub wins: i64,
    pub losses: i64,
    pub win_rate_pct: f64,
    /// Realized P&L summed over closed positions.
    pub total_pnl_sol: f64,
    /// Live P&L summed over still-open positions.
    pub unrealized_pnl_sol: f64,
    pub avg_pnl_pct: f64,
    pub avg_hold_secs: f64,
    pub avg_entry_holders: f64,
    pub avg_exit_holders: f64,
}

impl StatsSummary {
    /// Coerce a raw aggregate row into the wire summary.
    ///
    /// `losses` is the complement of `wins` within the closed set, so the
    /// two always partition it exactly even when some closed rows carry a
    /// NULL P&L (a missing P&L counts as zero, i.e. a loss).
    pub fn from_row(row: StatsRow) -> Self {
        let win_rate_pct = if row.closed_positions > 0 {
            row.wins as f64 / row.closed_positions as f64 * 100.0
        } else {
            0.0
        };

        StatsSummary {
            total_trades: row.total_trades,
            open_positions: row.open_positions,
            closed_positions: row.closed_positions,
            wins: row.wins,
            losses: row.closed_positions - row.wins,
            win_rate_pct,
            total_pnl_sol: row.total_pnl_sol.unwrap_or(0.0),
            unrealized_pnl_sol: row.unrealized_pnl_sol.unwrap_or(0.0),
            avg_pnl_pct: row.avg_pnl_pct.unwrap_or(0.0),
            avg_hold_secs: row.avg_hold_secs.unwrap_or(0.0),
            avg_entry_holders: row.avg_entry_holders.unwrap_or(0.0),
            avg_exit_holders: row.avg_exit_holders.unwrap_or(0.0),
        }
    }
}

pub struct GetStatsUseCase<S>
where
    S: TelemetryStore,
{
    store: Arc<S>,
}

impl<S> GetStatsUseCase<S>
where
    S: TelemetryStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn execute(&self) -> Result<StatsSummary, StoreError> {
        let row = self.store.overall_stats().await?;
        Ok(StatsSummary::from_row(row))
    }
}
