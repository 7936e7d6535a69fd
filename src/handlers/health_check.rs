use std::sync::Arc;

use axum::{extract::State, http::StatusCode};
use tracing::{debug, instrument};

use crate::models::AppState;

/// Liveness probe. Always `200 OK` with an empty body; the throttle's size
/// goes to the debug log for whoever is watching memory.
#[instrument(skip(state))]
pub async fn health_check(State(state): State<Arc<AppState>>) -> StatusCode {
    debug!(live_entries = state.throttle.len(), "Health check endpoint accessed");
    StatusCode::OK
}
