use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::employees::EmployeeService;
use crate::features::maintenance_teams::handlers::{self, TeamState};
use crate::features::maintenance_teams::services::MaintenanceTeamService;
use crate::features::reports::ReportService;
use crate::features::utility_providers::UtilityProviderService;

/// Create routes for the maintenance teams feature (protected)
pub fn routes(
    team_service: Arc<MaintenanceTeamService>,
    provider_service: Arc<UtilityProviderService>,
    employee_service: Arc<EmployeeService>,
    report_service: Arc<ReportService>,
) -> Router {
    let state = TeamState {
        team_service,
        provider_service,
        employee_service,
        report_service,
    };

    Router::new()
        .route("/api/maintenance-teams", get(handlers::list_teams))
        .route(
            "/api/maintenance-teams/register",
            post(handlers::register_team),
        )
        .route("/api/maintenance-teams/{id}", get(handlers::get_team))
        .route(
            "/api/maintenance-teams/{id}/work-status",
            put(handlers::update_work_status),
        )
        .route(
            "/api/maintenance-teams/{id}/account-status",
            put(handlers::update_account_status),
        )
        .route(
            "/api/maintenance-teams/reports/{report_id}/status",
            put(handlers::update_report_status),
        )
        .with_state(state)
}
