use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
    /// Whether the remote pipeline server answered its health check.
    pub pipeline_healthy: bool,
    /// Whether the pronunciation-dictionary API answered a rules fetch.
    pub dictionary_healthy: bool,
}

/// GET /health -- returns service, database, and upstream health.
///
/// The upstream checks are proxies: clients cannot reach the command
/// server or the dictionary API directly, so their reachability is
/// reported here. A dead upstream leaves the service `degraded`, not
/// down.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = narrata_db::health_check(&state.pool).await.is_ok();
    let pipeline_healthy = state.pipeline.health().await.is_ok();
    let dictionary_healthy = state.lexicon.get_rules().await.is_ok();

    let status = if db_healthy && pipeline_healthy && dictionary_healthy {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        pipeline_healthy,
        dictionary_healthy,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
