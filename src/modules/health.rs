use axum::{Router, routing::get};

use crate::state::AppState;

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = String)),
    tag = "Health"
)]
pub async fn health() -> &'static str {
    "ok"
}

pub fn init_health_router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
