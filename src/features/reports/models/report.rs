use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use super::IssueCategory;

/// Report status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Pending,
    InProgress,
    HelpRequested,
    Resolved,
    Rejected,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 5] = [
        ReportStatus::Pending,
        ReportStatus::InProgress,
        ReportStatus::HelpRequested,
        ReportStatus::Resolved,
        ReportStatus::Rejected,
    ];

    /// Statuses reachable from `self` in one step
    pub fn allowed_transitions(self) -> &'static [ReportStatus] {
        use ReportStatus::*;
        match self {
            // PENDING -> PENDING re-asserts the initial state when a provider is attached
            Pending => &[Pending, InProgress, HelpRequested, Rejected],
            InProgress => &[HelpRequested, Resolved, Rejected],
            HelpRequested => &[InProgress, Resolved, Rejected],
            Resolved | Rejected => &[],
        }
    }

    pub fn can_transition_to(self, next: ReportStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Pending => write!(f, "PENDING"),
            ReportStatus::InProgress => write!(f, "IN_PROGRESS"),
            ReportStatus::HelpRequested => write!(f, "HELP_REQUESTED"),
            ReportStatus::Resolved => write!(f, "RESOLVED"),
            ReportStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// Which counter a vote increments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteKind {
    Up,
    Down,
}

impl VoteKind {
    /// Single-statement increment touching only this vote's counter
    pub fn increment_sql(self) -> &'static str {
        match self {
            VoteKind::Up => {
                "UPDATE reports SET upvotes = upvotes + 1, updated_at = NOW() WHERE id = $1"
            }
            VoteKind::Down => {
                "UPDATE reports SET downvotes = downvotes + 1, updated_at = NOW() WHERE id = $1"
            }
        }
    }
}

/// Database model for report
#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub resident_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: IssueCategory,
    pub location: String,
    pub location_name: Option<String>,
    pub status: ReportStatus,
    pub upvotes: i32,
    pub downvotes: i32,
    pub is_edited: bool,
    pub edited_at: Option<DateTime<Utc>>,
    pub utility_provider_id: Option<Uuid>,
    pub assigned_team_id: Option<Uuid>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// Timestamp used for "newest first" ordering: the last edit once edited, else creation
    pub fn sort_timestamp(&self) -> DateTime<Utc> {
        match (self.is_edited, self.edited_at) {
            (true, Some(edited_at)) => edited_at,
            _ => self.created_at,
        }
    }
}

/// Data for creating a new report
#[derive(Debug)]
pub struct CreateReport {
    pub resident_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: IssueCategory,
    pub location: String,
    pub location_name: Option<String>,
}

/// Content fields a resident may change after submission
#[derive(Debug, Default)]
pub struct UpdateReportContent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub location_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReportStatus::*;

    #[test]
    fn test_pending_transitions() {
        assert!(Pending.can_transition_to(InProgress));
        assert!(Pending.can_transition_to(HelpRequested));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Pending.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Resolved));
    }

    #[test]
    fn test_active_transitions() {
        assert!(InProgress.can_transition_to(Resolved));
        assert!(InProgress.can_transition_to(HelpRequested));
        assert!(HelpRequested.can_transition_to(InProgress));
        assert!(HelpRequested.can_transition_to(Resolved));
        assert!(!InProgress.can_transition_to(Pending));
        assert!(!HelpRequested.can_transition_to(Pending));
    }

    #[test]
    fn test_terminal_states_have_no_exit() {
        for terminal in [Resolved, Rejected] {
            assert!(terminal.is_terminal());
            for next in ReportStatus::ALL {
                assert!(
                    !terminal.can_transition_to(next),
                    "{} -> {} should be rejected",
                    terminal,
                    next
                );
            }
        }
        assert!(!Pending.is_terminal());
        assert!(!InProgress.is_terminal());
        assert!(!HelpRequested.is_terminal());
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&HelpRequested).unwrap(),
            "\"HELP_REQUESTED\""
        );
        let parsed: ReportStatus = serde_json::from_str("\"IN_PROGRESS\"").unwrap();
        assert_eq!(parsed, InProgress);
        assert_eq!(InProgress.to_string(), "IN_PROGRESS");
    }

    #[test]
    fn test_vote_statements_touch_one_counter() {
        let up = VoteKind::Up.increment_sql();
        assert!(up.contains("upvotes = upvotes + 1"));
        assert!(!up.contains("downvotes"));

        let down = VoteKind::Down.increment_sql();
        assert!(down.contains("downvotes = downvotes + 1"));
        assert!(!down.replace("downvotes", "").contains("upvotes"));
    }
}
