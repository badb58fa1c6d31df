use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::AppError;
use crate::features::reports::models::{IssueCategory, Report, ReportStatus, UpdateReportContent};
use crate::shared::constants::{
    MAX_DESCRIPTION_LENGTH, MAX_LOCATION_NAME_LENGTH, MAX_TITLE_LENGTH,
};
use crate::shared::validation::validate_location;

/// Request DTO for submitting a report
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateReportDto {
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(
        min = 1,
        max = MAX_DESCRIPTION_LENGTH,
        message = "Description must be 1-5000 characters"
    ))]
    pub description: String,

    pub category: IssueCategory,

    /// "lat,lng"
    #[validate(custom(function = "validate_location"))]
    #[schema(example = "40.4168,-3.7038")]
    pub location: String,

    /// Optional place name; reverse geocoded when omitted
    #[validate(length(
        max = MAX_LOCATION_NAME_LENGTH,
        message = "Location name must be at most 300 characters"
    ))]
    pub location_name: Option<String>,
}

/// Request DTO for editing a report's content
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateReportDto {
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(
        min = 1,
        max = MAX_DESCRIPTION_LENGTH,
        message = "Description must be 1-5000 characters"
    ))]
    pub description: Option<String>,

    #[validate(custom(function = "validate_location"))]
    pub location: Option<String>,

    #[validate(length(
        max = MAX_LOCATION_NAME_LENGTH,
        message = "Location name must be at most 300 characters"
    ))]
    pub location_name: Option<String>,
}

impl UpdateReportDto {
    /// Reject edits that change nothing the edited flag tracks
    ///
    /// `location_name` only travels with a new `location`.
    pub fn ensure_content_change(&self) -> Result<(), AppError> {
        if self.location_name.is_some() && self.location.is_none() {
            return Err(AppError::BadRequest(
                "Location name can only be changed together with location".to_string(),
            ));
        }
        if self.title.is_none() && self.description.is_none() && self.location.is_none() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }
        Ok(())
    }
}

impl From<UpdateReportDto> for UpdateReportContent {
    fn from(dto: UpdateReportDto) -> Self {
        Self {
            title: dto.title,
            description: dto.description,
            location: dto.location,
            location_name: dto.location_name,
        }
    }
}

/// Request DTO for updating report status
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateReportStatusDto {
    pub status: ReportStatus,
}

/// Request DTO for assigning a maintenance team
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignTeamDto {
    pub team_id: Uuid,
}

/// Response DTO for report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
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

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            resident_id: r.resident_id,
            title: r.title,
            description: r.description,
            category: r.category,
            location: r.location,
            location_name: r.location_name,
            status: r.status,
            upvotes: r.upvotes,
            downvotes: r.downvotes,
            is_edited: r.is_edited,
            edited_at: r.edited_at,
            utility_provider_id: r.utility_provider_id,
            assigned_team_id: r.assigned_team_id,
            resolved_at: r.resolved_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::lorem::en::{Paragraph, Sentence};
    use fake::Fake;

    fn create_dto() -> CreateReportDto {
        let title: String = Sentence(3..6).fake();
        CreateReportDto {
            title: title.chars().take(200).collect(),
            description: Paragraph(1..3).fake(),
            category: IssueCategory::Roads,
            location: "40.4168,-3.7038".to_string(),
            location_name: None,
        }
    }

    #[test]
    fn test_create_report_valid() {
        assert!(create_dto().validate().is_ok());
    }

    #[test]
    fn test_create_report_rejects_bad_location_and_empty_title() {
        let mut dto = create_dto();
        dto.title = String::new();
        dto.location = "40.4168".to_string();

        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("location"));
    }

    #[test]
    fn test_update_report_validates_present_fields_only() {
        let dto = UpdateReportDto {
            description: Some("El bache ha crecido".to_string()),
            ..Default::default()
        };
        assert!(dto.validate().is_ok());
        assert!(dto.ensure_content_change().is_ok());

        let bad = UpdateReportDto {
            location: Some("91,0".to_string()),
            ..Default::default()
        };
        assert!(bad.validate().unwrap_err().field_errors().contains_key("location"));

        assert!(matches!(
            UpdateReportDto::default().ensure_content_change(),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_location_name_alone_is_not_an_edit() {
        let rename_only = UpdateReportDto {
            location_name: Some("Plaza Mayor".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            rename_only.ensure_content_change(),
            Err(AppError::BadRequest(_))
        ));

        let moved = UpdateReportDto {
            location: Some("40.4155,-3.7074".to_string()),
            location_name: Some("Plaza Mayor".to_string()),
            ..Default::default()
        };
        assert!(moved.ensure_content_change().is_ok());
    }

    #[test]
    fn test_status_dto_wire_format() {
        let dto: UpdateReportStatusDto =
            serde_json::from_value(serde_json::json!({ "status": "HELP_REQUESTED" })).unwrap();
        assert_eq!(dto.status, ReportStatus::HelpRequested);

        assert!(serde_json::from_value::<UpdateReportStatusDto>(
            serde_json::json!({ "status": "VERIFIED" })
        )
        .is_err());
    }
}
