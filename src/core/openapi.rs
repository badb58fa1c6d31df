use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::analytics::{dtos as analytics_dtos, handlers as analytics_handlers};
use crate::features::auth;
use crate::features::employees::{dtos as employees_dtos, handlers as employees_handlers};
use crate::features::maintenance_teams::{
    dtos as teams_dtos, handlers as teams_handlers, models as teams_models,
};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::features::utility_providers::{dtos as providers_dtos, handlers as providers_handlers};
use crate::shared::types::{AccountStatus, ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::get_me,
        // Reports
        reports_handlers::create_report,
        reports_handlers::list_reports,
        reports_handlers::get_report,
        reports_handlers::update_report,
        reports_handlers::delete_report,
        reports_handlers::list_resident_reports,
        reports_handlers::list_provider_reports,
        reports_handlers::list_team_reports,
        reports_handlers::update_report_status,
        reports_handlers::assign_team,
        reports_handlers::upvote_report,
        reports_handlers::downvote_report,
        // Utility providers
        providers_handlers::list_providers,
        providers_handlers::register_provider,
        providers_handlers::get_provider,
        providers_handlers::update_provider_status,
        // Maintenance teams
        teams_handlers::register_team,
        teams_handlers::list_teams,
        teams_handlers::get_team,
        teams_handlers::update_work_status,
        teams_handlers::update_account_status,
        teams_handlers::update_report_status,
        // Employees
        employees_handlers::create_employee,
        employees_handlers::list_team_employees,
        employees_handlers::update_employee,
        employees_handlers::delete_employee,
        // Analytics
        analytics_handlers::get_summary,
        analytics_handlers::get_by_category,
        analytics_handlers::get_by_status,
        analytics_handlers::get_trend,
        analytics_handlers::get_providers,
    ),
    components(
        schemas(
            // Shared
            Meta,
            AccountStatus,
            // Auth
            auth::model::UserRole,
            auth::dtos::RegisterRequestDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::AuthResponseDto,
            auth::dtos::AuthUserDto,
            ApiResponse<auth::dtos::AuthResponseDto>,
            ApiResponse<auth::dtos::AuthUserDto>,
            // Reports
            reports_models::IssueCategory,
            reports_models::ReportStatus,
            reports_dtos::CreateReportDto,
            reports_dtos::UpdateReportDto,
            reports_dtos::UpdateReportStatusDto,
            reports_dtos::AssignTeamDto,
            reports_dtos::ReportResponseDto,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            // Utility providers
            providers_dtos::RegisterUtilityProviderDto,
            providers_dtos::UpdateProviderStatusDto,
            providers_dtos::UtilityProviderResponseDto,
            ApiResponse<providers_dtos::UtilityProviderResponseDto>,
            ApiResponse<Vec<providers_dtos::UtilityProviderResponseDto>>,
            // Maintenance teams
            teams_models::WorkStatus,
            teams_dtos::RegisterMaintenanceTeamDto,
            teams_dtos::UpdateWorkStatusDto,
            teams_dtos::UpdateTeamAccountStatusDto,
            teams_dtos::MaintenanceTeamResponseDto,
            ApiResponse<teams_dtos::MaintenanceTeamResponseDto>,
            ApiResponse<Vec<teams_dtos::MaintenanceTeamResponseDto>>,
            // Employees
            employees_dtos::CreateEmployeeDto,
            employees_dtos::UpdateEmployeeDto,
            employees_dtos::EmployeeResponseDto,
            ApiResponse<employees_dtos::EmployeeResponseDto>,
            ApiResponse<Vec<employees_dtos::EmployeeResponseDto>>,
            // Analytics
            crate::features::analytics::models::TimeRange,
            analytics_dtos::AnalyticsSummaryDto,
            analytics_dtos::CategoryCountDto,
            analytics_dtos::StatusCountDto,
            analytics_dtos::TrendPointDto,
            analytics_dtos::ProviderPerformanceDto,
            ApiResponse<analytics_dtos::AnalyticsSummaryDto>,
            ApiResponse<Vec<analytics_dtos::CategoryCountDto>>,
            ApiResponse<Vec<analytics_dtos::StatusCountDto>>,
            ApiResponse<Vec<analytics_dtos::TrendPointDto>>,
            ApiResponse<Vec<analytics_dtos::ProviderPerformanceDto>>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and current account"),
        (name = "reports", description = "Resident issue reports, lifecycle and voting"),
        (name = "utility-providers", description = "Utility providers that receive routed reports"),
        (name = "maintenance-teams", description = "Field teams working on assigned reports"),
        (name = "employees", description = "Members of maintenance teams"),
        (name = "analytics", description = "Government dashboard analytics"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Ayto API",
        version = "0.1.0",
        description = "Municipal issue reporting API",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
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
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_routed_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/ayto/reports",
            "/ayto/reports/{id}/status",
            "/ayto/utility-provider/all",
            "/api/maintenance-teams/reports/{report_id}/status",
            "/api/employees/team/{team_id}",
            "/ayto/analytics/trend",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {}",
                expected
            );
        }
    }

    #[test]
    fn test_swagger_info_modifier() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Ayto (staging)".to_string(),
            version: "9.9.9".to_string(),
            description: "staging".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Ayto (staging)");
        assert_eq!(doc.info.version, "9.9.9");
    }
}
