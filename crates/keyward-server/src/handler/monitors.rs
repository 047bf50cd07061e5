//! Liveness handler.

use axum::Router;
use axum::routing::get;

use super::response::MonitorStatus;
use crate::extract::Json;
use crate::service::ServiceState;

async fn health_status() -> Json<MonitorStatus> {
    Json(MonitorStatus::default())
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health_status))
}
