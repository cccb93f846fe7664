use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Decision, Position, Trade};

/// Errors raised by the telemetry store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be opened: missing file, lock contention, corruption.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A query against an otherwise healthy store failed.
    #[error("query failed: {0}")]
    Query(String),
}

/// One-row aggregate snapshot over the full trade/position history.
///
/// Nullable SQL aggregates are preserved as `Option` here; coercing them to
/// the documented zero defaults is the aggregator's job, not the reader's.
/// Each field reflects a single query's point-in-time view of the store.
#[derive(Debug, Clone, Default)]
pub struct StatsRow {
    pub total_trades: i64,
    pub open_positions: i64,
    pub closed_positions: i64,
    /// Closed positions with P&L strictly greater than zero.
    pub wins: i64,
    pub total_pnl_sol: Option<f64>,
    pub unrealized_pnl_sol: Option<f64>,
    pub avg_pnl_pct: Option<f64>,
    pub avg_hold_secs: Option<f64>,
    pub avg_entry_holders: Option<f64>,
    pub avg_exit_holders: Option<f64>,
}

/// Read-only access to the trading process's durable log.
///
/// This port abstracts the store so different backends (SQLite file,
/// in-memory fixture) can sit behind the same endpoints. Implementations
/// must never hold a write lock or block the trading process's writer, and
/// must release the underlying connection on every exit path. Each call sees
/// an independent point-in-time view; no cross-call snapshot isolation is
/// promised.
#[async_trait]
pub trait TelemetryStore: Send + Sync {
    /// Run the single aggregate pass behind `/api/stats`.
    async fn overall_stats(&self) -> Result<StatsRow, StoreError>;

    /// Closed positions, exit time descending, at most `limit` rows.
    async fn recent_closed_positions(&self, limit: usize) -> Result<Vec<Position>, StoreError>;

    /// Open positions with live P&L, entry time descending, at most `limit` rows.
    async fn active_positions(&self, limit: usize) -> Result<Vec<Position>, StoreError>;

    /// Trades, occurrence time descending, at most `limit` rows.
    async fn recent_trades(&self, limit: usize) -> Result<Vec<Trade>, StoreError>;

    /// AI decisions, occurrence time descending, at most `limit` rows.
    async fn recent_decisions(&self, limit: usize) -> Result<Vec<Decision>, StoreError>;
}
