use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::employees::handlers::{self, EmployeeState};
use crate::features::employees::services::EmployeeService;
use crate::features::maintenance_teams::MaintenanceTeamService;
use crate::features::utility_providers::UtilityProviderService;

/// Create routes for the employees feature (protected)
pub fn routes(
    employee_service: Arc<EmployeeService>,
    team_service: Arc<MaintenanceTeamService>,
    provider_service: Arc<UtilityProviderService>,
) -> Router {
    let state = EmployeeState {
        employee_service,
        team_service,
        provider_service,
    };

    Router::new()
        .route("/api/employees", post(handlers::create_employee))
        .route(
            "/api/employees/team/{team_id}",
            get(handlers::list_team_employees),
        )
        .route(
            "/api/employees/{id}",
            put(handlers::update_employee).delete(handlers::delete_employee),
        )
        .with_state(state)
}
