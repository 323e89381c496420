use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    create_service, create_version, delete_service, delete_version, get_services, update_service,
    update_version,
};
use crate::state::AppState;

pub fn init_services_router() -> Router<AppState> {
    Router::new()
        .route(
            "/services",
            get(get_services)
                .post(create_service)
                .put(update_service)
                .delete(delete_service),
        )
        .route(
            "/services/versions",
            post(create_version)
                .put(update_version)
                .delete(delete_version),
        )
}
