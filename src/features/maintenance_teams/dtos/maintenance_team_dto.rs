use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::employees::dtos::EmployeeResponseDto;
use crate::features::maintenance_teams::models::{MaintenanceTeam, WorkStatus};
use crate::shared::types::AccountStatus;
use crate::shared::validation::PHONE_REGEX;

/// Request DTO for registering a maintenance team under the caller's provider
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterMaintenanceTeamDto {
    #[validate(length(min = 1, max = 150, message = "Team leader must be 1-150 characters"))]
    pub team_leader: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateWorkStatusDto {
    pub work_status: WorkStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateTeamAccountStatusDto {
    pub account_status: AccountStatus,
}

/// Response DTO for maintenance team
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MaintenanceTeamResponseDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub utility_provider_id: Uuid,
    pub team_leader: String,
    pub work_status: WorkStatus,
    pub account_status: AccountStatus,
    pub employees: Vec<EmployeeResponseDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MaintenanceTeamResponseDto {
    pub fn with_employees(team: MaintenanceTeam, employees: Vec<EmployeeResponseDto>) -> Self {
        Self {
            id: team.id,
            user_id: team.user_id,
            utility_provider_id: team.utility_provider_id,
            team_leader: team.team_leader,
            work_status: team.work_status,
            account_status: team.account_status,
            employees,
            created_at: team.created_at,
            updated_at: team.updated_at,
        }
    }
}

impl From<MaintenanceTeam> for MaintenanceTeamResponseDto {
    fn from(team: MaintenanceTeam) -> Self {
        Self::with_employees(team, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::Name;
    use fake::Fake;

    #[test]
    fn test_register_team_valid() {
        let dto = RegisterMaintenanceTeamDto {
            team_leader: Name().fake(),
            email: SafeEmail().fake(),
            password: "Cuadrilla-Norte".to_string(),
            phone: None,
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_register_team_rejects_short_password() {
        let dto = RegisterMaintenanceTeamDto {
            team_leader: "Javier Ruiz".to_string(),
            email: "cuadrilla@example.com".to_string(),
            password: "short".to_string(),
            phone: None,
        };
        assert!(dto.validate().unwrap_err().field_errors().contains_key("password"));
    }

    #[test]
    fn test_work_status_wire_format() {
        let dto: UpdateWorkStatusDto =
            serde_json::from_value(serde_json::json!({ "work_status": "BUSY" })).unwrap();
        assert_eq!(dto.work_status, WorkStatus::Busy);
        assert_eq!(WorkStatus::Offline.to_string(), "OFFLINE");
    }
}
