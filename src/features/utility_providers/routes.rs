use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::utility_providers::handlers;
use crate::features::utility_providers::services::UtilityProviderService;

/// Create routes for the utility providers feature (protected)
pub fn routes(service: Arc<UtilityProviderService>) -> Router {
    Router::new()
        .route("/ayto/utility-provider/all", get(handlers::list_providers))
        .route(
            "/ayto/utility-provider/register",
            post(handlers::register_provider),
        )
        .route("/ayto/utility-provider/{id}", get(handlers::get_provider))
        .route(
            "/ayto/utility-provider/{id}/status",
            put(handlers::update_provider_status),
        )
        .with_state(service)
}
