use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::reports::models::IssueCategory;
use crate::shared::types::AccountStatus;

/// Database model for a utility provider (power, water, telecom, roads)
#[derive(Debug, Clone, FromRow)]
pub struct UtilityProvider {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    /// "lat,lng" of the provider's base of operations
    pub location: String,
    pub provider_type: IssueCategory,
    pub account_status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a provider profile
#[derive(Debug)]
pub struct CreateUtilityProvider {
    pub user_id: Uuid,
    pub name: String,
    pub location: String,
    pub provider_type: IssueCategory,
}
