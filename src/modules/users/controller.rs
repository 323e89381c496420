use std::collections::HashMap;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use tracing::instrument;

use dashboard_core::{AppError, Page};
use dashboard_db::Fetched;
use dashboard_models::{CreateUserDto, UpdateUserDto, User};

use super::service::UserService;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List or look up users
///
/// Same precedence as the services listing, with `username` as the lookup
/// parameter and `load_profile` to include profiles.
#[utoipa::path(
    get,
    path = "/v1/users",
    params(
        ("page" = Option<i64>, Query, description = "Page number, from 1"),
        ("limit" = Option<i64>, Query, description = "Page size, at most 100"),
        ("sort_by" = Option<String>, Query, description = "id, username or created_at; requires order"),
        ("order" = Option<String>, Query, description = "asc or desc; requires sort_by"),
        ("search_mode" = Option<bool>, Query, description = "Substring match on username"),
        ("username" = Option<String>, Query, description = "Exact username, or the search term"),
        ("id" = Option<i64>, Query, description = "Exact id"),
        ("load_profile" = Option<bool>, Query, description = "Include the user profile"),
    ),
    responses(
        (status = 200, description = "A page of users, or the bare user for id and username lookups", body = Page<User>),
        (status = 400, description = "Invalid query parameter", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Single lookup found nothing", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Fetched<User>>, AppError> {
    let fetched = UserService::get_users(state.users.as_ref(), &params).await?;
    Ok(Json(fetched))
}

/// Create a user, optionally with a profile
#[utoipa::path(
    post,
    path = "/v1/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 403, description = "Role may not create", body = ErrorResponse),
        (status = 409, description = "Username already taken", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = UserService::create_user(state.users.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Update a user by the `id` in the body
#[utoipa::path(
    put,
    path = "/v1/users",
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Missing id or invalid body", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Username already taken", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn update_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<User>, AppError> {
    let user = UserService::update_user(state.users.as_ref(), dto).await?;
    Ok(Json(user))
}

/// Delete a user and their profile by `id` or `username`
#[utoipa::path(
    delete,
    path = "/v1/users",
    params(
        ("id" = Option<i64>, Query, description = "User id"),
        ("username" = Option<String>, Query, description = "Username, used when id is absent"),
    ),
    responses(
        (status = 200, description = "User deleted"),
        (status = 400, description = "Neither id nor username given", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<StatusCode, AppError> {
    UserService::delete_user(state.users.as_ref(), &params).await?;
    Ok(StatusCode::OK)
}
