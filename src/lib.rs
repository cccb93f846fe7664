//! Sniper Telemetry
//!
//! Read-only telemetry service for the sniper trading bot: serves the bot's
//! historical and live trading state (trades, positions, P&L, AI decisions)
//! as JSON endpoints for the browser dashboard. The trading process is the
//! only writer; this service opens its store read-only, computes everything
//! fresh per request, and holds no state across requests.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture with clear separation of concerns:
//!
//! - **Domain**: Store row record types (Trade, Position, Decision)
//! - **Application**: The TelemetryStore port and the stats aggregator
//! - **Infrastructure**: Read-only SQLite adapter and JSON configuration
//! - **Presentation**: REST handlers, display projections, error encoding
//!
//! # Example
//!
//! ```ignore
//! use sniper_telemetry::{TelemetryConfig, TelemetryServer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = TelemetryConfig::default();
//!     TelemetryServer::new(config).run().await.unwrap();
//! }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types
pub use domain::{Decision, Position, Trade};

pub use application::{GetStatsUseCase, StatsRow, StatsSummary, StoreError, TelemetryStore};

pub use infrastructure::{
    ConfigError, ServerConfig, SliceLimits, SqliteTelemetryStore, TelemetryConfig,
};

pub use presentation::{ApiError, AppState, create_router};

use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// The telemetry server: config in, JSON API out.
pub struct TelemetryServer {
    pub config: TelemetryConfig,
    store: Arc<SqliteTelemetryStore>,
}

impl TelemetryServer {
    pub fn new(config: TelemetryConfig) -> Self {
        let store = Arc::new(SqliteTelemetryStore::new(&config.store_path));
        TelemetryServer { config, store }
    }

    /// Create the REST API router
    pub fn rest_router(&self) -> Router {
        let state = Arc::new(AppState::new(
            Arc::clone(&self.store),
            self.config.slice_limits,
        ));

        create_router(state)
    }

    /// Run the telemetry server
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);
        let router = self.rest_router();

        tracing::info!("Telemetry server listening on {}", addr);

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
