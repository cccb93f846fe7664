use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::{Connection, OpenFlags, Row};

use crate::application::ports::{StatsRow, StoreError, TelemetryStore};
use crate::domain::{Decision, Position, Trade};

/// How long a query may wait on the writing process's lock before failing.
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(2);

/// Read-only SQLite adapter for the [`TelemetryStore`] port.
///
/// The store file is owned and written by the trading process; this adapter
/// opens a fresh read-only connection per call and drops it when the call
/// returns, so the writer is never blocked and the connection is released on
/// every exit path, including query failures. Queries run on the blocking
/// thread pool.
#[derive(Debug, Clone)]
pub struct SqliteTelemetryStore {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteTelemetryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    fn open(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        conn.busy_timeout(self.busy_timeout)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(conn)
    }

    async fn run_blocking<T, F>(&self, query: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Self) -> Result<T, StoreError> + Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || query(&store))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?
    }

    fn overall_stats_blocking(&self) -> Result<StatsRow, StoreError> {
        let conn = self.open()?;

        // One pass; every field reflects the same point-in-time view.
        conn.query_row(
            "SELECT
                (SELECT COUNT(*) FROM trades),
                (SELECT COUNT(*) FROM positions WHERE exit_time_micros IS NULL),
                (SELECT COUNT(*) FROM positions WHERE exit_time_micros IS NOT NULL),
                (SELECT SUM(CASE WHEN COALESCE(pnl_sol, 0) > 0 THEN 1 ELSE 0 END)
                   FROM positions WHERE exit_time_micros IS NOT NULL),
                (SELECT SUM(COALESCE(pnl_sol, 0))
                   FROM positions WHERE exit_time_micros IS NOT NULL),
                (SELECT SUM(COALESCE(pnl_sol, 0))
                   FROM positions WHERE exit_time_micros IS NULL),
                (SELECT AVG(pnl_percent) FROM positions WHERE exit_time_micros IS NOT NULL),
                (SELECT AVG(hold_duration_secs) FROM positions WHERE exit_time_micros IS NOT NULL),
                (SELECT AVG(holder_count_entry) FROM positions WHERE exit_time_micros IS NOT NULL),
                (SELECT AVG(holder_count_exit) FROM positions WHERE exit_time_micros IS NOT NULL)",
            [],
            |row| {
                Ok(StatsRow {
                    total_trades: row.get(0)?,
                    open_positions: row.get(1)?,
                    closed_positions: row.get(2)?,
                    wins: row.get::<_, Option<i64>>(3)?.unwrap_or(0),
                    total_pnl_sol: row.get(4)?,
                    unrealized_pnl_sol: row.get(5)?,
                    avg_pnl_pct: row.get(6)?,
                    avg_hold_secs: row.get(7)?,
                    avg_entry_holders: row.get(8)?,
                    avg_exit_holders: row.get(9)?,
                })
            },
        )
        .map_err(|e| StoreError::Query(e.to_string()))
    }

    fn positions_blocking(&self, sql: &str, limit: usize) -> Result<Vec<Position>, StoreError> {
        let conn = self.open()?;

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let rows = stmt
            .query_map([limit as i64], position_from_row)
            .map_err(|e| StoreError::Query(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(rows)
    }
}

/// Map a `positions` row into the named record, coercing unexpected NULLs
/// in required columns instead of aborting the slice.
fn position_from_row(row: &Row<'_>) -> rusqlite::Result<Position> {
    Ok(Position {
        mint: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
        entry_time_micros: row.get::<_, Option<i64>>(1)?.unwrap_or(0),
        entry_sol: row.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
        tokens: row.get(3)?,
        exit_time_micros: row.get(4)?,
        pnl_sol: row.get(5)?,
        pnl_percent: row.get(6)?,
        hold_duration_secs: row.get(7)?,
        holder_count_entry: row.get(8)?,
        holder_count_exit: row.get(9)?,
        exit_reason: row.get(10)?,
    })
}

const POSITION_COLUMNS: &str = "mint, entry_time_micros, entry_sol, tokens, exit_time_micros, \
     pnl_sol, pnl_percent, hold_duration_secs, holder_count_entry, holder_count_exit, exit_reason";

#[async_trait]
impl TelemetryStore for SqliteTelemetryStore {
    async fn overall_stats(&self) -> Result<StatsRow, StoreError> {
        self.run_blocking(|store| store.overall_stats_blocking())
            .await
    }

    async fn recent_closed_positions(&self, limit: usize) -> Result<Vec<Position>, StoreError> {
        let sql = format!(
            "SELECT {POSITION_COLUMNS}
             FROM positions
             WHERE exit_time_micros IS NOT NULL
             ORDER BY exit_time_micros DESC
             LIMIT ?1"
        );
        self.run_blocking(move |store| store.positions_blocking(&sql, limit))
            .await
    }

    async fn active_positions(&self, limit: usize) -> Result<Vec<Position>, StoreError> {
        let sql = format!(
            "SELECT {POSITION_COLUMNS}
             FROM positions
             WHERE exit_time_micros IS NULL
             ORDER BY entry_time_micros DESC
             LIMIT ?1"
        );
        self.run_blocking(move |store| store.positions_blocking(&sql, limit))
            .await
    }

    async fn recent_trades(&self, limit: usize) -> Result<Vec<Trade>, StoreError> {
        self.run_blocking(move |store| {
            let conn = store.open()?;

            let mut stmt = conn
                .prepare(
                    "SELECT mint, trade_type, price, sol_amount, timestamp_micros
                     FROM trades
                     ORDER BY timestamp_micros DESC
                     LIMIT ?1",
                )
                .map_err(|e| StoreError::Query(e.to_string()))?;
            let rows = stmt
                .query_map([limit as i64], |row| {
                    Ok(Trade {
                        mint: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                        trade_type: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                        price: row.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
                        sol_amount: row.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
                        timestamp_micros: row.get::<_, Option<i64>>(4)?.unwrap_or(0),
                    })
                })
                .map_err(|e| StoreError::Query(e.to_string()))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| StoreError::Query(e.to_string()))?;

            Ok(rows)
        })
        .await
    }

    async fn recent_decisions(&self, limit: usize) -> Result<Vec<Decision>, StoreError> {
        self.run_blocking(move |store| {
            let conn = store.open()?;

            let mut stmt = conn
                .prepare(
                    "SELECT mint, action, confidence, reasoning, timestamp
                     FROM ai_decisions
                     ORDER BY timestamp DESC
                     LIMIT ?1",
                )
                .map_err(|e| StoreError::Query(e.to_string()))?;
            let rows = stmt
                .query_map([limit as i64], |row| {
                    Ok(Decision {
                        mint: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                        action: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                        confidence: row.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
                        reasoning: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                        timestamp_secs: row.get::<_, Option<i64>>(4)?.unwrap_or(0),
                    })
                })
                .map_err(|e| StoreError::Query(e.to_string()))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| StoreError::Query(e.to_string()))?;

            Ok(rows)
        })
        .await
    }
}
