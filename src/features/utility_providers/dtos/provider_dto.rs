use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::reports::models::IssueCategory;
use crate::features::utility_providers::models::UtilityProvider;
use crate::shared::types::AccountStatus;
use crate::shared::validation::{validate_location, PHONE_REGEX};

/// Request DTO for registering a utility provider together with its login account
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterUtilityProviderDto {
    #[validate(length(min = 1, max = 150, message = "Name must be 1-150 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: Option<String>,

    /// Base location as "lat,lng"
    #[validate(custom(function = "validate_location"))]
    pub location: String,

    pub provider_type: IssueCategory,
}

/// Response DTO for utility provider
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UtilityProviderResponseDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub location: String,
    pub provider_type: IssueCategory,
    pub account_status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UtilityProvider> for UtilityProviderResponseDto {
    fn from(p: UtilityProvider) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            name: p.name,
            location: p.location,
            provider_type: p.provider_type,
            account_status: p.account_status,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Request DTO for activating/deactivating a provider
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateProviderStatusDto {
    pub account_status: AccountStatus,
}
