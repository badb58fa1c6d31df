use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::auth::model::{User, UserRole};
use crate::shared::validation::PHONE_REGEX;

/// Request DTO for resident self-registration
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,

    #[validate(length(min = 1, max = 120, message = "Full name must be 1-120 characters"))]
    pub full_name: String,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: Option<String>,
}

/// Request DTO for login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Account details shared by auth responses and /me
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthUserDto {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<User> for AuthUserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            full_name: u.full_name,
            phone: u.phone,
            role: u.role,
            created_at: u.created_at,
        }
    }
}

/// Response DTO for authentication (register/login)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponseDto {
    /// Signed JWT access token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token expiry time in seconds
    pub expires_in: i64,
    pub user: AuthUserDto,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_dto() -> RegisterRequestDto {
        RegisterRequestDto {
            email: "vecina@example.com".to_string(),
            password: "Plaza-Mayor-1".to_string(),
            confirm_password: "Plaza-Mayor-1".to_string(),
            full_name: "Lucia Martin".to_string(),
            phone: Some("+34 600 123 456".to_string()),
        }
    }

    #[test]
    fn test_register_valid() {
        assert!(register_dto().validate().is_ok());
    }

    #[test]
    fn test_register_password_mismatch() {
        let mut dto = register_dto();
        dto.confirm_password = "something-else".to_string();

        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("confirm_password"));
    }

    #[test]
    fn test_register_bad_phone() {
        let mut dto = register_dto();
        dto.phone = Some("12ab".to_string());

        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("phone"));
    }

    #[test]
    fn test_register_phone_optional() {
        let mut dto = register_dto();
        dto.phone = None;
        assert!(dto.validate().is_ok());
    }
}
