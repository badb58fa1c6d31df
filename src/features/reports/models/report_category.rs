use serde::{Deserialize, Serialize};
use sqlx::Type;
use utoipa::ToSchema;

/// Issue category of a report; doubles as the service type a utility provider covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "issue_category", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCategory {
    Power,
    Water,
    Telecom,
    Roads,
}

impl IssueCategory {
    pub const ALL: [IssueCategory; 4] = [
        IssueCategory::Power,
        IssueCategory::Water,
        IssueCategory::Telecom,
        IssueCategory::Roads,
    ];
}

impl std::fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueCategory::Power => write!(f, "POWER"),
            IssueCategory::Water => write!(f, "WATER"),
            IssueCategory::Telecom => write!(f, "TELECOM"),
            IssueCategory::Roads => write!(f, "ROADS"),
        }
    }
}
