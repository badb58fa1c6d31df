use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::{AuthenticatedUser, UserRole};
use crate::features::auth::Resource;
use crate::features::employees::dtos::{CreateEmployeeDto, EmployeeResponseDto, UpdateEmployeeDto};
use crate::features::employees::services::EmployeeService;
use crate::features::maintenance_teams::MaintenanceTeamService;
use crate::features::utility_providers::UtilityProviderService;
use crate::shared::types::{ApiResponse, Meta};

/// State for employee handlers
#[derive(Clone)]
pub struct EmployeeState {
    pub employee_service: Arc<EmployeeService>,
    pub team_service: Arc<MaintenanceTeamService>,
    pub provider_service: Arc<UtilityProviderService>,
}

impl EmployeeState {
    /// Only the provider owning the team manages its employees
    async fn ensure_manages_team(&self, user: &AuthenticatedUser, team_id: Uuid) -> Result<()> {
        let provider = self
            .provider_service
            .for_user(user, Resource::Employee)
            .await?;
        let team = self.team_service.get_by_id(team_id).await?;

        if team.utility_provider_id == provider.id {
            Ok(())
        } else {
            Err(Resource::Employee.denied())
        }
    }
}

/// Add an employee to a maintenance team
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployeeDto,
    responses(
        (status = 201, description = "Employee added", body = ApiResponse<EmployeeResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Not allowed to manage employees of this team"),
        (status = 404, description = "Team not found")
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn create_employee(
    user: AuthenticatedUser,
    State(state): State<EmployeeState>,
    AppJson(dto): AppJson<CreateEmployeeDto>,
) -> Result<(StatusCode, Json<ApiResponse<EmployeeResponseDto>>)> {
    dto.validate()?;
    state
        .ensure_manages_team(&user, dto.maintenance_team_id)
        .await?;

    let employee = state.employee_service.create(&dto.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(employee.into()), None, None)),
    ))
}

/// List the employees of a team
///
/// Visible to government, the owning provider and the team itself.
#[utoipa::path(
    get,
    path = "/api/employees/team/{team_id}",
    params(("team_id" = Uuid, Path, description = "Maintenance team ID")),
    responses(
        (status = 200, description = "Team employees", body = ApiResponse<Vec<EmployeeResponseDto>>),
        (status = 403, description = "Not allowed to view this team"),
        (status = 404, description = "Team not found")
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn list_team_employees(
    user: AuthenticatedUser,
    State(state): State<EmployeeState>,
    Path(team_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<EmployeeResponseDto>>>> {
    match user.role {
        UserRole::Government => {}
        UserRole::MaintenanceTeam => {
            let team = state.team_service.get_by_id(team_id).await?;
            user.authorize_owner(Resource::Employee, team.user_id, &[])?;
        }
        _ => state.ensure_manages_team(&user, team_id).await?,
    }

    let employees = state.employee_service.list_by_team(team_id).await?;
    let total = employees.len() as i64;
    let dtos = employees.into_iter().map(Into::into).collect();

    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Update an employee
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(("id" = Uuid, Path, description = "Employee ID")),
    request_body = UpdateEmployeeDto,
    responses(
        (status = 200, description = "Employee updated", body = ApiResponse<EmployeeResponseDto>),
        (status = 403, description = "Not allowed to manage this employee"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn update_employee(
    user: AuthenticatedUser,
    State(state): State<EmployeeState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateEmployeeDto>,
) -> Result<Json<ApiResponse<EmployeeResponseDto>>> {
    dto.validate()?;
    let employee = state.employee_service.get_by_id(id).await?;
    state
        .ensure_manages_team(&user, employee.maintenance_team_id)
        .await?;

    let employee = state.employee_service.update(id, &dto.into()).await?;
    Ok(Json(ApiResponse::success(Some(employee.into()), None, None)))
}

/// Remove an employee
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(("id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee removed"),
        (status = 403, description = "Not allowed to manage this employee"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn delete_employee(
    user: AuthenticatedUser,
    State(state): State<EmployeeState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    let employee = state.employee_service.get_by_id(id).await?;
    state
        .ensure_manages_team(&user, employee.maintenance_team_id)
        .await?;

    state.employee_service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Employee removed".to_string()),
        None,
    )))
}
