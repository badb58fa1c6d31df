use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::model::{AuthenticatedUser, UserRole};
use crate::features::auth::Resource;
use crate::features::maintenance_teams::MaintenanceTeamService;
use crate::features::reports::dtos::{
    AssignTeamDto, CreateReportDto, ReportResponseDto, UpdateReportDto, UpdateReportStatusDto,
};
use crate::features::reports::models::{Report, VoteKind};
use crate::features::reports::services::ReportService;
use crate::features::utility_providers::UtilityProviderService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// State for report handlers
#[derive(Clone)]
pub struct ReportState {
    pub report_service: Arc<ReportService>,
    pub provider_service: Arc<UtilityProviderService>,
    pub team_service: Arc<MaintenanceTeamService>,
}

impl ReportState {
    /// Read access: residents and government see every report, providers and
    /// teams only the ones routed or assigned to them
    async fn ensure_can_view(&self, user: &AuthenticatedUser, report: &Report) -> Result<()> {
        match user.role {
            UserRole::Government | UserRole::Resident => Ok(()),
            UserRole::UtilityProvider => {
                let provider = self
                    .provider_service
                    .for_user(user, Resource::Report)
                    .await?;
                if report.utility_provider_id == Some(provider.id) {
                    Ok(())
                } else {
                    Err(Resource::Report.denied())
                }
            }
            UserRole::MaintenanceTeam => {
                let team = self.team_service.for_user(user, Resource::Report).await?;
                if report.assigned_team_id == Some(team.id) {
                    Ok(())
                } else {
                    Err(Resource::Report.denied())
                }
            }
        }
    }

    /// The caller must be the provider the report was routed to
    async fn ensure_routed_provider(
        &self,
        user: &AuthenticatedUser,
        report: &Report,
    ) -> Result<Uuid> {
        let provider = self
            .provider_service
            .for_user(user, Resource::Report)
            .await?;
        if report.utility_provider_id == Some(provider.id) {
            Ok(provider.id)
        } else {
            Err(Resource::Report.denied())
        }
    }
}

fn to_dtos(reports: Vec<Report>) -> Vec<ReportResponseDto> {
    reports.into_iter().map(Into::into).collect()
}

/// Submit a new report
///
/// The report starts PENDING and is routed to the nearest active provider of
/// the matching category, if any.
#[utoipa::path(
    post,
    path = "/ayto/reports",
    request_body = CreateReportDto,
    responses(
        (status = 201, description = "Report submitted", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only residents submit reports")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn create_report(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    AppJson(dto): AppJson<CreateReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    user.authorize(Resource::Report, &[UserRole::Resident])?;
    dto.validate()?;

    let report = state.report_service.submit(user.user_id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report.into()),
            Some("Report submitted".to_string()),
            None,
        )),
    ))
}

/// List all reports, newest first
#[utoipa::path(
    get,
    path = "/ayto/reports",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Page of reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 400, description = "Invalid query parameters"),
        (status = 403, description = "Not allowed to list reports")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_reports(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    AppQuery(pagination): AppQuery<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    user.authorize(Resource::Report, &[UserRole::Government, UserRole::Resident])?;

    let (reports, total) = state.report_service.list_all(&pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(to_dtos(reports)),
        None,
        Some(Meta { total }),
    )))
}

/// Get report by ID
#[utoipa::path(
    get,
    path = "/ayto/reports/{id}",
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 403, description = "Not allowed to view this report"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn get_report(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = state.report_service.get_by_id(id).await?;
    state.ensure_can_view(&user, &report).await?;

    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Edit a report's title, description or location (owner only)
#[utoipa::path(
    put,
    path = "/ayto/reports/{id}",
    params(("id" = Uuid, Path, description = "Report ID")),
    request_body = UpdateReportDto,
    responses(
        (status = 200, description = "Report updated", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Not the report owner"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Report is closed")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn update_report(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateReportDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    dto.validate()?;
    dto.ensure_content_change()?;

    let report = state.report_service.get_by_id(id).await?;
    user.authorize_owner(Resource::Report, report.resident_id, &[])?;

    let report = state.report_service.update_content(id, dto.into()).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Delete a report (owner or government)
#[utoipa::path(
    delete,
    path = "/ayto/reports/{id}",
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report deleted"),
        (status = 403, description = "Not allowed to delete this report"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn delete_report(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    let report = state.report_service.get_by_id(id).await?;
    user.authorize_owner(Resource::Report, report.resident_id, &[UserRole::Government])?;

    state.report_service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Report deleted".to_string()),
        None,
    )))
}

/// List a resident's reports, newest first
#[utoipa::path(
    get,
    path = "/ayto/reports/resident/{user_id}",
    params(("user_id" = Uuid, Path, description = "Resident user ID")),
    responses(
        (status = 200, description = "Resident's reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 403, description = "Not allowed to view these reports")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_resident_reports(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(resident_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    user.authorize_owner(Resource::Report, resident_id, &[UserRole::Government])?;

    let reports = state.report_service.list_by_resident(resident_id).await?;
    Ok(Json(ApiResponse::success(Some(to_dtos(reports)), None, None)))
}

/// List reports routed to a utility provider
#[utoipa::path(
    get,
    path = "/ayto/reports/provider/{provider_id}",
    params(("provider_id" = Uuid, Path, description = "Utility provider ID")),
    responses(
        (status = 200, description = "Provider's reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 403, description = "Not allowed to view these reports")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_provider_reports(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    if !user.is_government() {
        let provider = state
            .provider_service
            .for_user(&user, Resource::Report)
            .await?;
        if provider.id != provider_id {
            return Err(Resource::Report.denied());
        }
    }

    let reports = state.report_service.list_by_provider(provider_id).await?;
    Ok(Json(ApiResponse::success(Some(to_dtos(reports)), None, None)))
}

/// List reports assigned to a maintenance team
#[utoipa::path(
    get,
    path = "/ayto/reports/team/{team_id}",
    params(("team_id" = Uuid, Path, description = "Maintenance team ID")),
    responses(
        (status = 200, description = "Team's reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 403, description = "Not allowed to view these reports")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_team_reports(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(team_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    match user.role {
        UserRole::Government => {}
        UserRole::MaintenanceTeam => {
            let team = state.team_service.for_user(&user, Resource::Report).await?;
            if team.id != team_id {
                return Err(Resource::Report.denied());
            }
        }
        UserRole::UtilityProvider => {
            let provider = state
                .provider_service
                .for_user(&user, Resource::Report)
                .await?;
            let team = state.team_service.get_by_id(team_id).await?;
            if team.utility_provider_id != provider.id {
                return Err(Resource::Report.denied());
            }
        }
        UserRole::Resident => return Err(Resource::Report.denied()),
    }

    let reports = state.report_service.list_by_team(team_id).await?;
    Ok(Json(ApiResponse::success(Some(to_dtos(reports)), None, None)))
}

/// Change a report's status (government or the routed provider)
#[utoipa::path(
    put,
    path = "/ayto/reports/{id}/status",
    params(("id" = Uuid, Path, description = "Report ID")),
    request_body = UpdateReportStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ReportResponseDto>),
        (status = 403, description = "Not allowed to change this report"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Transition not allowed")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn update_report_status(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateReportStatusDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    user.authorize(
        Resource::Report,
        &[UserRole::Government, UserRole::UtilityProvider],
    )?;

    let report = state.report_service.get_by_id(id).await?;
    if !user.is_government() {
        state.ensure_routed_provider(&user, &report).await?;
    }

    let report = state.report_service.update_status(id, dto.status).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Assign one of the routed provider's active teams to a report
#[utoipa::path(
    put,
    path = "/ayto/reports/{id}/assign-team",
    params(("id" = Uuid, Path, description = "Report ID")),
    request_body = AssignTeamDto,
    responses(
        (status = 200, description = "Team assigned", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Team is inactive"),
        (status = 403, description = "Not the routed provider, or team belongs to another provider"),
        (status = 404, description = "Report or team not found"),
        (status = 409, description = "Report is closed")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn assign_team(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<AssignTeamDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = state.report_service.get_by_id(id).await?;
    let provider_id = state.ensure_routed_provider(&user, &report).await?;

    let team = state.team_service.get_by_id(dto.team_id).await?;
    if team.utility_provider_id != provider_id {
        return Err(Resource::MaintenanceTeam.denied());
    }
    if !team.is_assignable() {
        return Err(AppError::BadRequest(format!(
            "Maintenance team {} is inactive",
            team.id
        )));
    }

    let report = state.report_service.assign_team(id, team.id).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Upvote a report
#[utoipa::path(
    post,
    path = "/ayto/reports/{id}/upvote",
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Vote recorded", body = ApiResponse<ReportResponseDto>),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn upvote_report(
    _user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = state.report_service.vote(id, VoteKind::Up).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Downvote a report
#[utoipa::path(
    post,
    path = "/ayto/reports/{id}/downvote",
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Vote recorded", body = ApiResponse<ReportResponseDto>),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn downvote_report(
    _user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = state.report_service.vote(id, VoteKind::Down).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}
