use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use dashboard_core::PaginationMeta;
use dashboard_models::{
    CreateServiceDto, CreateServiceVersionDto, CreateUserDto, LoginRequest, LoginResponse,
    Service, ServiceVersion, UpdateServiceDto, UpdateServiceVersionDto, UpdateUserDto, User,
    UserProfile, UserProfileDto,
};

use crate::modules::auth::controller::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::health,
        crate::modules::auth::controller::login,
        crate::modules::services::controller::get_services,
        crate::modules::services::controller::create_service,
        crate::modules::services::controller::update_service,
        crate::modules::services::controller::delete_service,
        crate::modules::services::controller::create_version,
        crate::modules::services::controller::update_version,
        crate::modules::services::controller::delete_version,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            Service,
            ServiceVersion,
            CreateServiceDto,
            UpdateServiceDto,
            CreateServiceVersionDto,
            UpdateServiceVersionDto,
            User,
            UserProfile,
            UserProfileDto,
            CreateUserDto,
            UpdateUserDto,
            PaginationMeta,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Authentication", description = "Access token issuance"),
        (name = "Services", description = "Service catalog and service versions"),
        (name = "Users", description = "User directory and profiles")
    ),
    info(
        title = "Service Dashboard API",
        version = "0.1.0",
        description = "Service catalog and user directory with JWT authentication and role-based permissions.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
