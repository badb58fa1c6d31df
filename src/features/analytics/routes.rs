use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::analytics::handlers;
use crate::features::analytics::services::AnalyticsService;

/// Create routes for the analytics feature (protected, government only)
pub fn routes(service: Arc<AnalyticsService>) -> Router {
    Router::new()
        .route("/ayto/analytics/summary", get(handlers::get_summary))
        .route("/ayto/analytics/by-category", get(handlers::get_by_category))
        .route("/ayto/analytics/by-status", get(handlers::get_by_status))
        .route("/ayto/analytics/trend", get(handlers::get_trend))
        .route("/ayto/analytics/providers", get(handlers::get_providers))
        .with_state(service)
}
