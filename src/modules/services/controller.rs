use std::collections::HashMap;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use tracing::instrument;

use dashboard_core::{AppError, Page};
use dashboard_db::Fetched;
use dashboard_models::{
    CreateServiceDto, CreateServiceVersionDto, Service, ServiceVersion, UpdateServiceDto,
    UpdateServiceVersionDto,
};

use super::service::CatalogService;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List, search or look up services
///
/// `id` beats `search_mode=true&name=..` which beats `name`; with none of
/// them the full collection is paged. Single lookups return the bare record.
#[utoipa::path(
    get,
    path = "/v1/services",
    params(
        ("page" = Option<i64>, Query, description = "Page number, from 1"),
        ("limit" = Option<i64>, Query, description = "Page size, at most 100"),
        ("sort_by" = Option<String>, Query, description = "id, service_name or created_at; requires order"),
        ("order" = Option<String>, Query, description = "asc or desc; requires sort_by"),
        ("search_mode" = Option<bool>, Query, description = "Substring match on name"),
        ("name" = Option<String>, Query, description = "Exact name, or the search term"),
        ("id" = Option<i64>, Query, description = "Exact id"),
        ("load_version" = Option<bool>, Query, description = "Include service versions"),
    ),
    responses(
        (status = 200, description = "A page of services, or the bare service for id and name lookups", body = Page<Service>),
        (status = 400, description = "Invalid query parameter", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Single lookup found nothing", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Services"
)]
#[instrument(skip(state))]
pub async fn get_services(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Fetched<Service>>, AppError> {
    let fetched = CatalogService::get_services(state.services.as_ref(), &params).await?;
    Ok(Json(fetched))
}

/// Create a service
#[utoipa::path(
    post,
    path = "/v1/services",
    request_body = CreateServiceDto,
    responses(
        (status = 201, description = "Service created", body = Service),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 403, description = "Role may not create", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Services"
)]
#[instrument(skip(state, dto))]
pub async fn create_service(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateServiceDto>,
) -> Result<(StatusCode, Json<Service>), AppError> {
    let service = CatalogService::create_service(state.services.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

/// Update a service by the `id` in the body
#[utoipa::path(
    put,
    path = "/v1/services",
    request_body = UpdateServiceDto,
    responses(
        (status = 200, description = "Service updated", body = Service),
        (status = 400, description = "Missing id or invalid body", body = ErrorResponse),
        (status = 404, description = "Service not found", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Services"
)]
#[instrument(skip(state, dto))]
pub async fn update_service(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<UpdateServiceDto>,
) -> Result<Json<Service>, AppError> {
    let service = CatalogService::update_service(state.services.as_ref(), dto).await?;
    Ok(Json(service))
}

/// Delete a service and its versions by `id` or `name`
#[utoipa::path(
    delete,
    path = "/v1/services",
    params(
        ("id" = Option<i64>, Query, description = "Service id"),
        ("name" = Option<String>, Query, description = "Service name, used when id is absent"),
    ),
    responses(
        (status = 200, description = "Service deleted"),
        (status = 400, description = "Neither id nor name given", body = ErrorResponse),
        (status = 404, description = "Service not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Services"
)]
#[instrument(skip(state))]
pub async fn delete_service(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<StatusCode, AppError> {
    CatalogService::delete_service(state.services.as_ref(), &params).await?;
    Ok(StatusCode::OK)
}

/// Add a version to a service
#[utoipa::path(
    post,
    path = "/v1/services/versions",
    request_body = CreateServiceVersionDto,
    responses(
        (status = 201, description = "Version created", body = ServiceVersion),
        (status = 400, description = "Missing service_id or invalid body", body = ErrorResponse),
        (status = 404, description = "Service not found", body = ErrorResponse),
        (status = 409, description = "Version name already used by the service", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Services"
)]
#[instrument(skip(state, dto))]
pub async fn create_version(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateServiceVersionDto>,
) -> Result<(StatusCode, Json<ServiceVersion>), AppError> {
    let version = CatalogService::create_version(state.services.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(version)))
}

/// Update a version by the `id` in the body
#[utoipa::path(
    put,
    path = "/v1/services/versions",
    request_body = UpdateServiceVersionDto,
    responses(
        (status = 200, description = "Version updated", body = ServiceVersion),
        (status = 400, description = "Missing id or invalid body", body = ErrorResponse),
        (status = 404, description = "Version not found", body = ErrorResponse),
        (status = 409, description = "Version name already used by the service", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Services"
)]
#[instrument(skip(state, dto))]
pub async fn update_version(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<UpdateServiceVersionDto>,
) -> Result<Json<ServiceVersion>, AppError> {
    let version = CatalogService::update_version(state.services.as_ref(), dto).await?;
    Ok(Json(version))
}

#[utoipa::path(
    delete,
    path = "/v1/services/versions",
    params(("id" = i64, Query, description = "Version id")),
    responses(
        (status = 200, description = "Version deleted"),
        (status = 400, description = "Missing or invalid id", body = ErrorResponse),
        (status = 404, description = "Version not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Services"
)]
#[instrument(skip(state))]
pub async fn delete_version(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<StatusCode, AppError> {
    CatalogService::delete_version(state.services.as_ref(), &params).await?;
    Ok(StatusCode::OK)
}
