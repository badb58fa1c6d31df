use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::{AuthenticatedUser, UserRole};
use crate::features::auth::Resource;
use crate::features::employees::EmployeeService;
use crate::features::maintenance_teams::dtos::{
    MaintenanceTeamResponseDto, RegisterMaintenanceTeamDto, UpdateTeamAccountStatusDto,
    UpdateWorkStatusDto,
};
use crate::features::maintenance_teams::models::MaintenanceTeam;
use crate::features::maintenance_teams::services::MaintenanceTeamService;
use crate::features::reports::dtos::{ReportResponseDto, UpdateReportStatusDto};
use crate::features::reports::ReportService;
use crate::features::utility_providers::UtilityProviderService;
use crate::shared::types::{ApiResponse, Meta};

/// State for maintenance team handlers
#[derive(Clone)]
pub struct TeamState {
    pub team_service: Arc<MaintenanceTeamService>,
    pub provider_service: Arc<UtilityProviderService>,
    pub employee_service: Arc<EmployeeService>,
    pub report_service: Arc<ReportService>,
}

impl TeamState {
    /// Government, the owning provider, or (when `allow_self`) the team itself
    async fn ensure_team_access(
        &self,
        user: &AuthenticatedUser,
        team: &MaintenanceTeam,
        allow_government: bool,
        allow_self: bool,
    ) -> Result<()> {
        let allowed = match user.role {
            UserRole::Government => allow_government,
            UserRole::MaintenanceTeam => allow_self && team.user_id == user.user_id,
            UserRole::UtilityProvider => {
                let provider = self
                    .provider_service
                    .for_user(user, Resource::MaintenanceTeam)
                    .await?;
                team.utility_provider_id == provider.id
            }
            UserRole::Resident => false,
        };

        if allowed {
            Ok(())
        } else {
            Err(Resource::MaintenanceTeam.denied())
        }
    }

    async fn with_employees(&self, team: MaintenanceTeam) -> Result<MaintenanceTeamResponseDto> {
        let employees = self
            .employee_service
            .list_by_team(team.id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        Ok(MaintenanceTeamResponseDto::with_employees(team, employees))
    }
}

/// Register a maintenance team under the caller's utility provider
#[utoipa::path(
    post,
    path = "/api/maintenance-teams/register",
    request_body = RegisterMaintenanceTeamDto,
    responses(
        (status = 201, description = "Team registered", body = ApiResponse<MaintenanceTeamResponseDto>),
        (status = 400, description = "Validation error or inactive provider"),
        (status = 403, description = "Only utility providers register teams"),
        (status = 409, description = "Email already registered")
    ),
    security(("bearer_auth" = [])),
    tag = "maintenance-teams"
)]
pub async fn register_team(
    user: AuthenticatedUser,
    State(state): State<TeamState>,
    AppJson(dto): AppJson<RegisterMaintenanceTeamDto>,
) -> Result<(StatusCode, Json<ApiResponse<MaintenanceTeamResponseDto>>)> {
    let provider = state
        .provider_service
        .for_user(&user, Resource::MaintenanceTeam)
        .await?;
    dto.validate()?;

    if !provider.account_status.is_active() {
        return Err(AppError::BadRequest(
            "Inactive providers cannot register maintenance teams".to_string(),
        ));
    }

    let team = state.team_service.register(provider.id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(team.into()),
            Some("Maintenance team registered".to_string()),
            None,
        )),
    ))
}

/// List maintenance teams (all for government, own teams for a provider)
#[utoipa::path(
    get,
    path = "/api/maintenance-teams",
    responses(
        (status = 200, description = "Maintenance teams", body = ApiResponse<Vec<MaintenanceTeamResponseDto>>),
        (status = 403, description = "Not allowed to list teams")
    ),
    security(("bearer_auth" = [])),
    tag = "maintenance-teams"
)]
pub async fn list_teams(
    user: AuthenticatedUser,
    State(state): State<TeamState>,
) -> Result<Json<ApiResponse<Vec<MaintenanceTeamResponseDto>>>> {
    let teams = if user.is_government() {
        state.team_service.list_all().await?
    } else {
        let provider = state
            .provider_service
            .for_user(&user, Resource::MaintenanceTeam)
            .await?;
        state.team_service.list_by_provider(provider.id).await?
    };

    let total = teams.len() as i64;
    let dtos = teams.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Get a maintenance team with its employees
#[utoipa::path(
    get,
    path = "/api/maintenance-teams/{id}",
    params(("id" = Uuid, Path, description = "Maintenance team ID")),
    responses(
        (status = 200, description = "Team found", body = ApiResponse<MaintenanceTeamResponseDto>),
        (status = 403, description = "Not allowed to view this team"),
        (status = 404, description = "Team not found")
    ),
    security(("bearer_auth" = [])),
    tag = "maintenance-teams"
)]
pub async fn get_team(
    user: AuthenticatedUser,
    State(state): State<TeamState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MaintenanceTeamResponseDto>>> {
    let team = state.team_service.get_by_id(id).await?;
    state.ensure_team_access(&user, &team, true, true).await?;

    let dto = state.with_employees(team).await?;
    Ok(Json(ApiResponse::success(Some(dto), None, None)))
}

/// Set a team's availability (the team itself or its provider)
#[utoipa::path(
    put,
    path = "/api/maintenance-teams/{id}/work-status",
    params(("id" = Uuid, Path, description = "Maintenance team ID")),
    request_body = UpdateWorkStatusDto,
    responses(
        (status = 200, description = "Work status updated", body = ApiResponse<MaintenanceTeamResponseDto>),
        (status = 403, description = "Not allowed to manage this team"),
        (status = 404, description = "Team not found")
    ),
    security(("bearer_auth" = [])),
    tag = "maintenance-teams"
)]
pub async fn update_work_status(
    user: AuthenticatedUser,
    State(state): State<TeamState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateWorkStatusDto>,
) -> Result<Json<ApiResponse<MaintenanceTeamResponseDto>>> {
    let team = state.team_service.get_by_id(id).await?;
    state.ensure_team_access(&user, &team, false, true).await?;

    let team = state
        .team_service
        .update_work_status(id, dto.work_status)
        .await?;
    Ok(Json(ApiResponse::success(Some(team.into()), None, None)))
}

/// Activate or deactivate a team (its provider or government)
#[utoipa::path(
    put,
    path = "/api/maintenance-teams/{id}/account-status",
    params(("id" = Uuid, Path, description = "Maintenance team ID")),
    request_body = UpdateTeamAccountStatusDto,
    responses(
        (status = 200, description = "Account status updated", body = ApiResponse<MaintenanceTeamResponseDto>),
        (status = 403, description = "Not allowed to manage this team"),
        (status = 404, description = "Team not found")
    ),
    security(("bearer_auth" = [])),
    tag = "maintenance-teams"
)]
pub async fn update_account_status(
    user: AuthenticatedUser,
    State(state): State<TeamState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateTeamAccountStatusDto>,
) -> Result<Json<ApiResponse<MaintenanceTeamResponseDto>>> {
    let team = state.team_service.get_by_id(id).await?;
    state.ensure_team_access(&user, &team, true, false).await?;

    let team = state
        .team_service
        .update_account_status(id, dto.account_status)
        .await?;
    Ok(Json(ApiResponse::success(Some(team.into()), None, None)))
}

/// Move an assigned report through its lifecycle (assigned team only)
#[utoipa::path(
    put,
    path = "/api/maintenance-teams/reports/{report_id}/status",
    params(("report_id" = Uuid, Path, description = "Report ID")),
    request_body = UpdateReportStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ReportResponseDto>),
        (status = 403, description = "Report is not assigned to this team"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Transition not allowed")
    ),
    security(("bearer_auth" = [])),
    tag = "maintenance-teams"
)]
pub async fn update_report_status(
    user: AuthenticatedUser,
    State(state): State<TeamState>,
    Path(report_id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateReportStatusDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let team = state
        .team_service
        .for_user(&user, Resource::MaintenanceTeam)
        .await?;

    let report = state.report_service.get_by_id(report_id).await?;
    if report.assigned_team_id != Some(team.id) {
        return Err(Resource::MaintenanceTeam.denied());
    }

    let report = state
        .report_service
        .update_status(report_id, dto.status)
        .await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}
