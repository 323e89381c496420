use axum::Json;
use axum::extract::State;
use tracing::instrument;
use utoipa::ToSchema;

use dashboard_core::AppError;
use dashboard_models::{LoginRequest, LoginResponse};

use super::service::AuthService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Exchange a username and password for an access token
#[utoipa::path(
    post,
    path = "/v1/auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Malformed body or empty credentials", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login(state.users.as_ref(), dto, state.gate.jwt_config()).await?;
    Ok(Json(response))
}
