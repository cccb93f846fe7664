//! Display projections for the dashboard.
//!
//! Everything here is derived once per request from raw rows: mints are
//! shortened to a fixed-length prefix (plus suffix on the detail variant),
//! numerics are rounded to the precision of their unit (3 decimals for SOL,
//! 1 for percentages, 2 for confidence scores), and epoch integers become
//! locale-independent UTC strings. Trade and position timestamps are
//! microseconds; decision timestamps are seconds. The two units must never
//! be conflated.

use chrono::DateTime;
use serde::Serialize;

use crate::domain::{Decision, Position, Trade};

const MINT_PREFIX_LEN: usize = 8;
const MINT_SUFFIX_LEN: usize = 8;

/// `7xKXtg2C...` — fixed display length for any mint of at least prefix length.
fn short_mint(mint: &str) -> String {
    let prefix: String = mint.chars().take(MINT_PREFIX_LEN).collect();
    format!("{prefix}...")
}

/// `7xKXtg2C...Josg4sU9` — prefix and suffix, for the detail variant. Mints
/// short enough to show whole are passed through.
fn short_mint_detailed(mint: &str) -> String {
    let len = mint.chars().count();
    if len <= MINT_PREFIX_LEN + MINT_SUFFIX_LEN {
        return mint.to_string();
    }
    let prefix: String = mint.chars().take(MINT_PREFIX_LEN).collect();
    let suffix: String = mint.chars().skip(len - MINT_SUFFIX_LEN).collect();
    format!("{prefix}...{suffix}")
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// `%H:%M:%S` UTC from an epoch in seconds (AI decision resolution).
fn clock_time_from_secs(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .unwrap_or_default()
        .format("%H:%M:%S")
        .to_string()
}

/// `%H:%M:%S` UTC from an epoch in microseconds (position resolution).
fn clock_time_from_micros(micros: i64) -> String {
    DateTime::from_timestamp_micros(micros)
        .unwrap_or_default()
        .format("%H:%M:%S")
        .to_string()
}

/// `%Y-%m-%d %H:%M:%S` UTC from an epoch in microseconds (trade resolution).
fn datetime_from_micros(micros: i64) -> String {
    DateTime::from_timestamp_micros(micros)
        .unwrap_or_default()
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Closed-position entry for `/api/positions`
#[derive(Debug, Clone, Serialize)]
pub struct ClosedPositionView {
    pub mint: String,
    pub pnl_pct: f64,
    pub pnl_sol: f64,
    pub hold_secs: i64,
    pub entry_holders: i64,
    pub exit_holders: i64,
    pub exit_reason: String,
}

impl ClosedPositionView {
    pub fn from_position(position: &Position) -> Self {
        ClosedPositionView {
            mint: short_mint(&position.mint),
            pnl_pct: round_to(position.pnl_percent.unwrap_or(0.0), 1),
            pnl_sol: round_to(position.pnl_sol.unwrap_or(0.0), 3),
            hold_secs: position.hold_duration_secs.unwrap_or(0),
            entry_holders: position.holder_count_entry.unwrap_or(0),
            exit_holders: position.holder_count_exit.unwrap_or(0),
            // An unset exit reason is meaningful in itself, not a zero.
            exit_reason: position
                .exit_reason
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

/// Live open-position entry for `/api/positions/active`
///
/// Carries the untruncated mint so the dashboard can issue follow-up
/// actions (e.g. a manual sell) against the exact instrument.
#[derive(Debug, Clone, Serialize)]
pub struct ActivePositionView {
    pub mint: String,
    pub full_mint: String,
    pub entry_sol: f64,
    pub entry_time: String,
    pub tokens: i64,
    pub pnl_sol: f64,
    pub pnl_percent: f64,
    pub current_value: f64,
}

impl ActivePositionView {
    pub fn from_position(position: &Position) -> Self {
        ActivePositionView {
            mint: short_mint_detailed(&position.mint),
            full_mint: position.mint.clone(),
            entry_sol: round_to(position.entry_sol, 3),
            entry_time: clock_time_from_micros(position.entry_time_micros),
            tokens: position.tokens.unwrap_or(0.0) as i64,
            pnl_sol: round_to(position.pnl_sol.unwrap_or(0.0), 3),
            pnl_percent: round_to(position.pnl_percent.unwrap_or(0.0), 1),
            current_value: round_to(position.current_value(), 3),
        }
    }
}

/// Trade entry for `/api/recent-trades`
#[derive(Debug, Clone, Serialize)]
pub struct TradeView {
    #[serde(rename = "type")]
    pub trade_type: String,
    pub mint: String,
    pub price: f64,
    pub sol: f64,
    pub time: String,
}

impl TradeView {
    pub fn from_trade(trade: &Trade) -> Self {
        TradeView {
            trade_type: trade.trade_type.clone(),
            mint: short_mint(&trade.mint),
            price: trade.price,
            sol: round_to(trade.sol_amount, 3),
            time: datetime_from_micros(trade.timestamp_micros),
        }
    }
}

/// AI decision entry for `/api/ai-stream`
#[derive(Debug, Clone, Serialize)]
pub struct DecisionView {
    pub mint: String,
    pub action: String,
    pub confidence: f64,
    pub reasoning: String,
    pub time: String,
}

impl DecisionView {
    pub fn from_decision(decision: &Decision) -> Self {
        DecisionView {
            mint: short_mint(&decision.mint),
            action: decision.action.clone(),
            confidence: round_to(decision.confidence, 2),
            reasoning: decision.reasoning.clone(),
            time: clock_time_from_secs(decision.timestamp_secs),
        }
    }
}

/// Error document emitted at the endpoint boundary
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        ErrorResponse {
            error: error.into(),
        }
    }
}

/// Acknowledgment for the control stubs
#[derive(Debug, Clone, Serialize)]
pub struct ControlResponse {
    pub status: &'static str,
    pub message: &'static str,
}

impl ControlResponse {
    pub fn ok(message: &'static str) -> Self {
        ControlResponse {
            status: "ok",
            message,
        }
    }
}

/// Liveness probe response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
