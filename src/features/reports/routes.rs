use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::maintenance_teams::MaintenanceTeamService;
use crate::features::reports::handlers::{self, ReportState};
use crate::features::reports::services::ReportService;
use crate::features::utility_providers::UtilityProviderService;

/// Create routes for the reports feature (protected)
pub fn routes(
    report_service: Arc<ReportService>,
    provider_service: Arc<UtilityProviderService>,
    team_service: Arc<MaintenanceTeamService>,
) -> Router {
    let state = ReportState {
        report_service,
        provider_service,
        team_service,
    };

    Router::new()
        .route(
            "/ayto/reports",
            post(handlers::create_report).get(handlers::list_reports),
        )
        .route(
            "/ayto/reports/{id}",
            get(handlers::get_report)
                .put(handlers::update_report)
                .delete(handlers::delete_report),
        )
        .route(
            "/ayto/reports/resident/{user_id}",
            get(handlers::list_resident_reports),
        )
        .route(
            "/ayto/reports/provider/{provider_id}",
            get(handlers::list_provider_reports),
        )
        .route(
            "/ayto/reports/team/{team_id}",
            get(handlers::list_team_reports),
        )
        .route(
            "/ayto/reports/{id}/status",
            put(handlers::update_report_status),
        )
        .route("/ayto/reports/{id}/assign-team", put(handlers::assign_team))
        .route("/ayto/reports/{id}/upvote", post(handlers::upvote_report))
        .route("/ayto/reports/{id}/downvote", post(handlers::downvote_report))
        .with_state(state)
}
