use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::employees::models::{CreateEmployee, Employee, UpdateEmployee};
use crate::shared::validation::PHONE_REGEX;

/// Request DTO for adding an employee to a team
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateEmployeeDto {
    pub maintenance_team_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: Option<String>,
}

impl From<CreateEmployeeDto> for CreateEmployee {
    fn from(dto: CreateEmployeeDto) -> Self {
        Self {
            maintenance_team_id: dto.maintenance_team_id,
            first_name: dto.first_name,
            last_name: dto.last_name,
            phone: dto.phone,
        }
    }
}

/// Request DTO for updating an employee
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateEmployeeDto {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: Option<String>,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: Option<String>,
}

impl From<UpdateEmployeeDto> for UpdateEmployee {
    fn from(dto: UpdateEmployeeDto) -> Self {
        Self {
            first_name: dto.first_name,
            last_name: dto.last_name,
            phone: dto.phone,
        }
    }
}

/// Response DTO for employee
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmployeeResponseDto {
    pub id: Uuid,
    pub maintenance_team_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Employee> for EmployeeResponseDto {
    fn from(e: Employee) -> Self {
        Self {
            id: e.id,
            maintenance_team_id: e.maintenance_team_id,
            first_name: e.first_name,
            last_name: e.last_name,
            phone: e.phone,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::name::en::{FirstName, LastName};
    use fake::Fake;

    #[test]
    fn test_create_employee_valid() {
        let dto = CreateEmployeeDto {
            maintenance_team_id: Uuid::new_v4(),
            first_name: FirstName().fake(),
            last_name: LastName().fake(),
            phone: Some("+34 600 123 456".to_string()),
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_employee_rejects_bad_phone() {
        let dto = CreateEmployeeDto {
            maintenance_team_id: Uuid::new_v4(),
            first_name: "Lucía".to_string(),
            last_name: "Moreno".to_string(),
            phone: Some("call me".to_string()),
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("phone"));
    }

    #[test]
    fn test_update_employee_rejects_blank_name() {
        let dto = UpdateEmployeeDto {
            first_name: Some(String::new()),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
        assert!(UpdateEmployeeDto::default().validate().is_ok());
    }
}
