//! Integration tests for the telemetry REST API
//!
//! Tests the full HTTP stack against real SQLite fixture stores:
//! - Aggregate statistics (null-safety, win/loss partition, zero-division)
//! - Slice bounds and ordering
//! - Display projection (truncation, rounding, timestamps)
//! - Per-endpoint failure policy and recovery

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rusqlite::{Connection, params};
use serde_json::Value;
use sniper_telemetry::{
    SliceLimits, SqliteTelemetryStore,
    presentation::{AppState, create_router},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

// ============================================================================
// Test Fixtures
// ============================================================================

const MINT_A: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";
const MINT_B: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";

/// Create an empty fixture store with the canonical schema
fn create_store(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("telemetry.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE trades (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            mint TEXT NOT NULL,
            trade_type TEXT NOT NULL,
            price REAL NOT NULL,
            sol_amount REAL NOT NULL,
            timestamp_micros INTEGER NOT NULL
        );
        CREATE TABLE positions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            mint TEXT NOT NULL,
            entry_time_micros INTEGER NOT NULL,
            entry_sol REAL NOT NULL,
            tokens REAL,
            exit_time_micros INTEGER,
            pnl_sol REAL,
            pnl_percent REAL,
            hold_duration_secs INTEGER,
            holder_count_entry INTEGER,
            holder_count_exit INTEGER,
            exit_reason TEXT
        );
        CREATE TABLE ai_decisions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            mint TEXT NOT NULL,
            action TEXT NOT NULL,
            confidence REAL NOT NULL,
            reasoning TEXT NOT NULL,
            timestamp INTEGER NOT NULL
        );",
    )
    .unwrap();
    path
}

fn insert_trade(path: &Path, mint: &str, trade_type: &str, sol_amount: f64, micros: i64) {
    let conn = Connection::open(path).unwrap();
    conn.execute(
        "INSERT INTO trades (mint, trade_type, price, sol_amount, timestamp_micros)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![mint, trade_type, 0.0000321, sol_amount, micros],
    )
    .unwrap();
}

fn insert_closed_position(path: &Path, mint: &str, pnl_sol: Option<f64>, exit_micros: i64) {
    let conn = Connection::open(path).unwrap();
    conn.execute(
        "INSERT INTO positions (mint, entry_time_micros, entry_sol, tokens, exit_time_micros,
                                pnl_sol, pnl_percent, hold_duration_secs,
                                holder_count_entry, holder_count_exit, exit_reason)
         VALUES (?1, ?2, 0.5, 1000000.0, ?3, ?4, 40.0, 120, 30, 45, 'take_profit')",
        params![mint, exit_micros - 120_000_000, exit_micros, pnl_sol],
    )
    .unwrap();
}

fn insert_open_position(path: &Path, mint: &str, pnl_sol: Option<f64>, entry_micros: i64) {
    let conn = Connection::open(path).unwrap();
    conn.execute(
        "INSERT INTO positions (mint, entry_time_micros, entry_sol, tokens,
                                pnl_sol, pnl_percent, holder_count_entry)
         VALUES (?1, ?2, 0.5, 1000000.0, ?3, 10.0, 30)",
        params![mint, entry_micros, pnl_sol],
    )
    .unwrap();
}

fn insert_decision(path: &Path, mint: &str, confidence: f64, secs: i64) {
    let conn = Connection::open(path).unwrap();
    conn.execute(
        "INSERT INTO ai_decisions (mint, action, confidence, reasoning, timestamp)
         VALUES (?1, 'Hold', ?2, 'volume still climbing', ?3)",
        params![mint, confidence, secs],
    )
    .unwrap();
}

/// Build a router over the given store file with the default slice limits
fn test_app(path: &Path) -> Router {
    let store = Arc::new(SqliteTelemetryStore::new(path));
    let state = Arc::new(AppState::new(store, SliceLimits::default()));
    create_router(state)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

const BASE_MICROS: i64 = 1_700_000_000_000_000;

// ============================================================================
// Stats Endpoint
// ============================================================================

#[tokio::test]
async fn test_stats_known_scenario() {
    let dir = TempDir::new().unwrap();
    let path = create_store(&dir);

    for i in 0..4 {
        insert_trade(&path, MINT_A, "buy", 0.5, BASE_MICROS + i * 1_000_000);
    }
    insert_open_position(&path, MINT_A, Some(0.5), BASE_MICROS);
    insert_closed_position(&path, MINT_B, Some(2.0), BASE_MICROS + 10_000_000);

    let app = test_app(&path);
    let (status, json) = get_json(&app, "/api/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_trades"], 4);
    assert_eq!(json["open_positions"], 1);
    assert_eq!(json["closed_positions"], 1);
    assert_eq!(json["wins"], 1);
    assert_eq!(json["losses"], 0);
    assert_eq!(json["win_rate_pct"], 100.0);
    assert_eq!(json["total_pnl_sol"], 2.0);
    assert_eq!(json["unrealized_pnl_sol"], 0.5);
    assert_eq!(json["avg_pnl_pct"], 40.0);
    assert_eq!(json["avg_hold_secs"], 120.0);
}

#[tokio::test]
async fn test_stats_empty_store_is_all_zeroes() {
    let dir = TempDir::new().unwrap();
    let path = create_store(&dir);

    let app = test_app(&path);
    let (status, json) = get_json(&app, "/api/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["closed_positions"], 0);
    assert_eq!(json["win_rate_pct"], 0.0);
    assert_eq!(json["avg_pnl_pct"], 0.0);
    assert_eq!(json["avg_hold_secs"], 0.0);
    assert_eq!(json["avg_entry_holders"], 0.0);
    assert_eq!(json["avg_exit_holders"], 0.0);
    assert_eq!(json["total_pnl_sol"], 0.0);
}

#[tokio::test]
async fn test_stats_null_pnl_counts_as_loss() {
    let dir = TempDir::new().unwrap();
    let path = create_store(&dir);

    insert_closed_position(&path, MINT_A, None, BASE_MICROS);
    insert_closed_position(&path, MINT_B, Some(1.0), BASE_MICROS + 1_000_000);

    let app = test_app(&path);
    let (_, json) = get_json(&app, "/api/stats").await;

    assert_eq!(json["closed_positions"], 2);
    assert_eq!(json["wins"], 1);
    assert_eq!(json["losses"], 1);
    assert_eq!(json["win_rate_pct"], 50.0);
}

#[tokio::test]
async fn test_stats_total_pnl_sums_mixed_signs() {
    let dir = TempDir::new().unwrap();
    let path = create_store(&dir);

    insert_closed_position(&path, MINT_A, Some(-0.5), BASE_MICROS);
    insert_closed_position(&path, MINT_B, Some(1.25), BASE_MICROS + 1_000_000);

    let app = test_app(&path);
    let (_, json) = get_json(&app, "/api/stats").await;

    assert_eq!(json["total_pnl_sol"], 0.75);
    assert_eq!(json["wins"], 1);
    assert_eq!(json["losses"], 1);
}

// ============================================================================
// Closed-Position Slice
// ============================================================================

#[tokio::test]
async fn test_positions_bound_and_descending_order() {
    let dir = TempDir::new().unwrap();
    let path = create_store(&dir);

    for i in 0..60 {
        insert_closed_position(&path, MINT_A, Some(i as f64), BASE_MICROS + i * 1_000_000);
    }

    let app = test_app(&path);
    let (status, json) = get_json(&app, "/api/positions").await;

    assert_eq!(status, StatusCode::OK);
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 50);

    // Most recent exit first, strictly descending from there.
    assert_eq!(entries[0]["pnl_sol"], 59.0);
    assert_eq!(entries[49]["pnl_sol"], 10.0);
    for pair in entries.windows(2) {
        assert!(pair[0]["pnl_sol"].as_f64().unwrap() > pair[1]["pnl_sol"].as_f64().unwrap());
    }
}

#[tokio::test]
async fn test_positions_projection_shape() {
    let dir = TempDir::new().unwrap();
    let path = create_store(&dir);

    insert_closed_position(&path, MINT_A, Some(0.123456), BASE_MICROS);

    let app = test_app(&path);
    let (_, json) = get_json(&app, "/api/positions").await;
    let entry = &json.as_array().unwrap()[0];

    assert_eq!(entry["mint"], "7xKXtg2C...");
    assert_eq!(entry["pnl_sol"], 0.123);
    assert_eq!(entry["pnl_pct"], 40.0);
    assert_eq!(entry["hold_secs"], 120);
    assert_eq!(entry["entry_holders"], 30);
    assert_eq!(entry["exit_holders"], 45);
    assert_eq!(entry["exit_reason"], "take_profit");
}

#[tokio::test]
async fn test_positions_null_fields_coerced() {
    let dir = TempDir::new().unwrap();
    let path = create_store(&dir);

    // Closed position with nothing recorded beyond the exit time.
    let conn = Connection::open(&path).unwrap();
    conn.execute(
        "INSERT INTO positions (mint, entry_time_micros, entry_sol, exit_time_micros)
         VALUES (?1, ?2, 0.5, ?3)",
        params![MINT_A, BASE_MICROS, BASE_MICROS + 1_000_000],
    )
    .unwrap();
    drop(conn);

    let app = test_app(&path);
    let (status, json) = get_json(&app, "/api/positions").await;

    assert_eq!(status, StatusCode::OK);
    let entry = &json.as_array().unwrap()[0];
    assert_eq!(entry["pnl_sol"], 0.0);
    assert_eq!(entry["pnl_pct"], 0.0);
    assert_eq!(entry["hold_secs"], 0);
    assert_eq!(entry["exit_reason"], "unknown");
}

// ============================================================================
// Active-Position Slice
// ============================================================================

#[tokio::test]
async fn test_active_positions_bound_and_live_pnl() {
    let dir = TempDir::new().unwrap();
    let path = create_store(&dir);

    for i in 0..5 {
        insert_open_position(
            &path,
            if i == 4 { MINT_A } else { MINT_B },
            Some(-0.2),
            BASE_MICROS + i * 1_000_000,
        );
    }

    let app = test_app(&path);
    let (status, json) = get_json(&app, "/api/positions/active").await;

    assert_eq!(status, StatusCode::OK);
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 3);

    // Latest entry first, with the detail truncation and the full mint kept.
    assert_eq!(entries[0]["mint"], "7xKXtg2C...uJosgAsU");
    assert_eq!(entries[0]["full_mint"], MINT_A);
    assert_eq!(entries[0]["entry_sol"], 0.5);
    assert_eq!(entries[0]["pnl_sol"], -0.2);
    assert_eq!(entries[0]["current_value"], 0.3);
    assert_eq!(entries[0]["tokens"], 1_000_000);
}

#[tokio::test]
async fn test_active_position_null_pnl_does_not_fail() {
    let dir = TempDir::new().unwrap();
    let path = create_store(&dir);

    insert_open_position(&path, MINT_A, None, BASE_MICROS);

    let app = test_app(&path);
    let (status, json) = get_json(&app, "/api/positions/active").await;

    assert_eq!(status, StatusCode::OK);
    let entry = &json.as_array().unwrap()[0];
    assert_eq!(entry["pnl_sol"], 0.0);
    assert_eq!(entry["current_value"], 0.5);
}

// ============================================================================
// Trade and Decision Slices
// ============================================================================

#[tokio::test]
async fn test_recent_trades_bound_and_projection() {
    let dir = TempDir::new().unwrap();
    let path = create_store(&dir);

    for i in 0..25 {
        let side = if i % 2 == 0 { "buy" } else { "sell" };
        insert_trade(&path, MINT_A, side, 0.123456, BASE_MICROS + i * 1_000_000);
    }

    let app = test_app(&path);
    let (status, json) = get_json(&app, "/api/recent-trades").await;

    assert_eq!(status, StatusCode::OK);
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 20);

    assert_eq!(entries[0]["type"], "buy");
    assert_eq!(entries[0]["mint"], "7xKXtg2C...");
    assert_eq!(entries[0]["sol"], 0.123);
    assert_eq!(entries[0]["time"], "2023-11-14 22:13:44");
    assert_eq!(entries[19]["time"], "2023-11-14 22:13:25");
}

#[tokio::test]
async fn test_ai_stream_projection() {
    let dir = TempDir::new().unwrap();
    let path = create_store(&dir);

    insert_decision(&path, MINT_A, 0.876, 1_700_000_000);
    insert_decision(&path, MINT_B, 0.42, 1_700_000_060);

    let app = test_app(&path);
    let (status, json) = get_json(&app, "/api/ai-stream").await;

    assert_eq!(status, StatusCode::OK);
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 2);

    // Most recent decision first; seconds-resolution clock time.
    assert_eq!(entries[0]["mint"], "9WzDXwBb...");
    assert_eq!(entries[0]["time"], "22:14:20");
    assert_eq!(entries[1]["confidence"], 0.88);
    assert_eq!(entries[1]["action"], "Hold");
}

// ============================================================================
// Failure Policy
// ============================================================================

#[tokio::test]
async fn test_missing_store_surfaces_error_and_keeps_serving() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir.path().join("missing.db"));

    let (status, json) = get_json(&app, "/api/recent-trades").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().unwrap().contains("store unavailable"));

    // A failed request never takes the serving loop down with it.
    let (status, json) = get_json(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");

    let (status, _) = get_json(&app, "/api/stats").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_missing_store_degrades_live_endpoints_to_empty() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir.path().join("missing.db"));

    let (status, json) = get_json(&app, "/api/ai-stream").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 0);

    let (status, json) = get_json(&app, "/api/positions/active").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_query_error_on_foreign_schema() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("foreign.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute("CREATE TABLE unrelated (x INTEGER)", [])
        .unwrap();
    drop(conn);

    let app = test_app(&path);
    let (status, json) = get_json(&app, "/api/stats").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().unwrap().contains("query failed"));
}

// ============================================================================
// Control Stubs
// ============================================================================

#[tokio::test]
async fn test_control_stubs_acknowledge() {
    let dir = TempDir::new().unwrap();
    let path = create_store(&dir);
    let app = test_app(&path);

    let (status, json) = post_json(&app, "/api/control/start").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["message"], "Bot started");

    let (_, json) = post_json(&app, "/api/control/pause").await;
    assert_eq!(json["message"], "Bot paused");

    let (_, json) = post_json(&app, "/api/control/sell-all").await;
    assert_eq!(json["message"], "Emergency sell initiated");
}
