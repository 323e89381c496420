use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::middleware::auth::authorize;
use crate::modules::auth::router::init_auth_router;
use crate::modules::health::init_health_router;
use crate::modules::services::router::init_services_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;

/// Builds the application.
///
/// Layers run outermost first: request logging, CORS, authorization. The
/// authorization layer covers every route; its bypass list decides which
/// paths skip the token check.
pub fn init_router(state: AppState) -> Router {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(init_health_router())
        .nest(
            "/v1",
            Router::new()
                .merge(init_auth_router())
                .merge(init_services_router())
                .merge(init_users_router()),
        )
        .layer(middleware::from_fn_with_state(state.clone(), authorize))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true),
        )
        .layer(middleware::from_fn(logging_middleware))
}
