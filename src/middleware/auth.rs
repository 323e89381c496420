use axum::{
    extract::{OriginalUri, Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use dashboard_auth::GateDecision;
use dashboard_core::AppError;

use crate::state::AppState;

/// Gates every request through [`dashboard_auth::AuthGate`].
///
/// Rejections end the request here with 401 or 403; nothing downstream runs.
pub async fn authorize(State(state): State<AppState>, req: Request, next: Next) -> Response {
    // nested routers strip their prefix from `req.uri()`
    let path = req
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let decision = state.gate.decide(
        &path,
        req.method(),
        req.headers().get(header::AUTHORIZATION),
    );

    match decision {
        GateDecision::Bypass => next.run(req).await,
        GateDecision::Unauthenticated(err) => {
            debug!(error = %err, %path, "Rejected unauthenticated request");
            AppError::from(err).into_response()
        }
        GateDecision::Forbidden { .. } => {
            AppError::forbidden("Insufficient permissions").into_response()
        }
        GateDecision::Allowed { role } => {
            debug!(%role, "Request authorized");
            next.run(req).await
        }
    }
}
