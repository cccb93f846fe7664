use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::application::TelemetryStore;
use crate::infrastructure::SliceLimits;

/// Bound on total request time; the store is shared with a concurrently
/// writing process, so a wedged query must not pin the connection loop.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state shared across handlers
pub struct AppState<S: TelemetryStore> {
    pub store: Arc<S>,
    pub limits: SliceLimits,
}

impl<S: TelemetryStore> AppState<S> {
    pub fn new(store: Arc<S>, limits: SliceLimits) -> Self {
        AppState { store, limits }
    }
}

/// Create the REST API router
pub fn create_router<S: TelemetryStore + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        // Analytics endpoints
        .route("/api/stats", get(handlers::stats::<S>))
        .route("/api/positions", get(handlers::closed_positions::<S>))
        .route("/api/positions/active", get(handlers::active_positions::<S>))
        .route("/api/recent-trades", get(handlers::recent_trades::<S>))
        .route("/api/ai-stream", get(handlers::ai_stream::<S>))
        // Control stubs (acknowledgment only)
        .route("/api/control/start", post(handlers::control_start))
        .route("/api/control/pause", post(handlers::control_pause))
        .route("/api/control/sell-all", post(handlers::control_sell_all))
        // Middleware
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
