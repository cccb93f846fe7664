use axum::{Json, extract::State};
use std::sync::Arc;

use crate::application::{GetStatsUseCase, StatsSummary, TelemetryStore};
use crate::presentation::rest::{ApiError, dto::*};

use super::AppState;

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /api/stats
pub async fn stats<S: TelemetryStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<StatsSummary>, ApiError> {
    let use_case = GetStatsUseCase::new(Arc::clone(&state.store));
    let summary = use_case.execute().await?;
    Ok(Json(summary))
}

/// GET /api/positions
pub async fn closed_positions<S: TelemetryStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<ClosedPositionView>>, ApiError> {
    let positions = state
        .store
        .recent_closed_positions(state.limits.closed_positions)
        .await?;

    Ok(Json(
        positions
            .iter()
            .map(ClosedPositionView::from_position)
            .collect(),
    ))
}

/// GET /api/positions/active
///
/// Degrades to an empty slice on store failure: the live panel polls every
/// few seconds and should keep rendering through transient lock contention
/// with the trading process.
pub async fn active_positions<S: TelemetryStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<Vec<ActivePositionView>> {
    match state
        .store
        .active_positions(state.limits.active_positions)
        .await
    {
        Ok(positions) => Json(
            positions
                .iter()
                .map(ActivePositionView::from_position)
                .collect(),
        ),
        Err(e) => {
            tracing::warn!("serving empty active-position slice: {}", e);
            Json(Vec::new())
        }
    }
}

/// GET /api/recent-trades
pub async fn recent_trades<S: TelemetryStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<TradeView>>, ApiError> {
    let trades = state.store.recent_trades(state.limits.recent_trades).await?;

    Ok(Json(trades.iter().map(TradeView::from_trade).collect()))
}

/// GET /api/ai-stream
///
/// Same availability-over-visibility policy as the active-position slice.
pub async fn ai_stream<S: TelemetryStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<Vec<DecisionView>> {
    match state.store.recent_decisions(state.limits.decisions).await {
        Ok(decisions) => Json(decisions.iter().map(DecisionView::from_decision).collect()),
        Err(e) => {
            tracing::warn!("serving empty decision stream: {}", e);
            Json(Vec::new())
        }
    }
}

/// POST /api/control/start
///
/// Acknowledgment stub; the trading process itself acts on control state.
pub async fn control_start() -> Json<ControlResponse> {
    Json(ControlResponse::ok("Bot started"))
}

/// POST /api/control/pause
pub async fn control_pause() -> Json<ControlResponse> {
    Json(ControlResponse::ok("Bot paused"))
}

/// POST /api/control/sell-all
pub async fn control_sell_all() -> Json<ControlResponse> {
    Json(ControlResponse::ok("Emergency sell initiated"))
}
