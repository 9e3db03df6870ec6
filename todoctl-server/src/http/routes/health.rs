//! Health check endpoints

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::state::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Database health response
#[derive(Serialize)]
pub struct DatabaseHealthResponse {
    pub status: &'static str,
    pub database: String,
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /health/db - pings the database
async fn database_health(
    State(state): State<AppState>,
) -> Result<Json<DatabaseHealthResponse>, ApiError> {
    state.engine().ping().await.map_err(|e| {
        tracing::warn!(error = %e, "database ping failed");
        ApiError::Unavailable
    })?;

    Ok(Json(DatabaseHealthResponse {
        status: "ok",
        database: state.engine().url().database().to_owned(),
    }))
}

/// Health routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/db", get(database_health))
}
