use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::types::AccountStatus;

/// Availability of a maintenance team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "work_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkStatus {
    Free,
    Busy,
    Offline,
}

impl std::fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkStatus::Free => write!(f, "FREE"),
            WorkStatus::Busy => write!(f, "BUSY"),
            WorkStatus::Offline => write!(f, "OFFLINE"),
        }
    }
}

/// Database model for a maintenance team
#[derive(Debug, Clone, FromRow)]
pub struct MaintenanceTeam {
    pub id: Uuid,
    pub user_id: Uuid,
    pub utility_provider_id: Uuid,
    pub team_leader: String,
    pub work_status: WorkStatus,
    pub account_status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MaintenanceTeam {
    /// Whether the team can take on a report
    pub fn is_assignable(&self) -> bool {
        self.account_status.is_active()
    }
}

#[derive(Debug)]
pub struct CreateMaintenanceTeam {
    pub user_id: Uuid,
    pub utility_provider_id: Uuid,
    pub team_leader: String,
}
