use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::analytics::models::TimeRange;
use crate::features::reports::models::{IssueCategory, ReportStatus};

/// `?timeRange=week|month|quarter|year`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQuery {
    /// Reporting window (default: month)
    #[serde(default)]
    pub time_range: TimeRange,
}

/// Headline numbers for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalyticsSummaryDto {
    pub time_range: TimeRange,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub total_reports: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub help_requested: i64,
    pub resolved: i64,
    pub rejected: i64,
    pub total_upvotes: i64,
    pub total_downvotes: i64,
    /// Share of reports in the window that are resolved, 0.0-1.0
    pub resolution_rate: f64,
    pub avg_resolution_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryCountDto {
    pub category: IssueCategory,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StatusCountDto {
    pub status: ReportStatus,
    pub count: i64,
}

/// Reports created per bucket
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct TrendPointDto {
    pub period_start: DateTime<Utc>,
    pub count: i64,
    pub resolved: i64,
}

/// Per-provider workload and resolution stats
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct ProviderPerformanceDto {
    pub provider_id: Uuid,
    pub name: String,
    pub provider_type: IssueCategory,
    pub total_reports: i64,
    pub open_reports: i64,
    pub resolved: i64,
    pub avg_resolution_hours: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_reads_camel_case_time_range() {
        let query: AnalyticsQuery =
            serde_json::from_value(serde_json::json!({ "timeRange": "year" })).unwrap();
        assert_eq!(query.time_range, TimeRange::Year);

        let query: AnalyticsQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(query.time_range, TimeRange::Month);
    }
}
