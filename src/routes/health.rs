//! Health check endpoint.
//!
//! Reports whether the session holds an API key, so the frontend harness can
//! wait for setup to finish before sending queries.

use axum::{extract::State, Json};

use crate::session::HealthStatus;
use crate::state::AppState;

/// Health check handler.
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.session.health())
}
