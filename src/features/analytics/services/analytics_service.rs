use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::core::error::{AppError, Result};
use crate::features::analytics::dtos::{
    AnalyticsSummaryDto, CategoryCountDto, ProviderPerformanceDto, StatusCountDto,
    TrendPointDto,
};
use crate::features::analytics::models::TimeRange;
use crate::features::reports::models::{IssueCategory, ReportStatus};

/// Aggregate counters for the summary endpoint
#[derive(Debug, Default, FromRow)]
struct SummaryRow {
    total_reports: i64,
    pending: i64,
    in_progress: i64,
    help_requested: i64,
    resolved: i64,
    rejected: i64,
    total_upvotes: i64,
    total_downvotes: i64,
    avg_resolution_hours: Option<f64>,
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    category: IssueCategory,
    count: i64,
}

#[derive(Debug, FromRow)]
struct StatusRow {
    status: ReportStatus,
    count: i64,
}

/// Fraction of `total` that is `resolved`; 0 for an empty window
pub fn resolution_rate(resolved: i64, total: i64) -> f64 {
    if total <= 0 {
        0.0
    } else {
        resolved as f64 / total as f64
    }
}

/// One entry per category, zero-filled, in declaration order
fn fill_categories(rows: Vec<CategoryRow>) -> Vec<CategoryCountDto> {
    IssueCategory::ALL
        .into_iter()
        .map(|category| CategoryCountDto {
            category,
            count: rows
                .iter()
                .find(|r| r.category == category)
                .map_or(0, |r| r.count),
        })
        .collect()
}

/// One entry per status, zero-filled, in lifecycle order
fn fill_statuses(rows: Vec<StatusRow>) -> Vec<StatusCountDto> {
    ReportStatus::ALL
        .into_iter()
        .map(|status| StatusCountDto {
            status,
            count: rows
                .iter()
                .find(|r| r.status == status)
                .map_or(0, |r| r.count),
        })
        .collect()
}

/// Service for government dashboard analytics
pub struct AnalyticsService {
    pool: PgPool,
}

impl AnalyticsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn summary(&self, range: TimeRange) -> Result<AnalyticsSummaryDto> {
        let to = Utc::now();
        let from = range.window_start(to);

        let row = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT
                COUNT(*) AS total_reports,
                COUNT(*) FILTER (WHERE status = 'PENDING') AS pending,
                COUNT(*) FILTER (WHERE status = 'IN_PROGRESS') AS in_progress,
                COUNT(*) FILTER (WHERE status = 'HELP_REQUESTED') AS help_requested,
                COUNT(*) FILTER (WHERE status = 'RESOLVED') AS resolved,
                COUNT(*) FILTER (WHERE status = 'REJECTED') AS rejected,
                COALESCE(SUM(upvotes), 0)::BIGINT AS total_upvotes,
                COALESCE(SUM(downvotes), 0)::BIGINT AS total_downvotes,
                (AVG(EXTRACT(EPOCH FROM (resolved_at - created_at)))
                    FILTER (WHERE resolved_at IS NOT NULL) / 3600.0)::DOUBLE PRECISION
                    AS avg_resolution_hours
            FROM reports
            WHERE created_at >= $1
            "#,
        )
        .bind(from)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get analytics summary: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(AnalyticsSummaryDto {
            time_range: range,
            from,
            to,
            total_reports: row.total_reports,
            pending: row.pending,
            in_progress: row.in_progress,
            help_requested: row.help_requested,
            resolved: row.resolved,
            rejected: row.rejected,
            total_upvotes: row.total_upvotes,
            total_downvotes: row.total_downvotes,
            resolution_rate: resolution_rate(row.resolved, row.total_reports),
            avg_resolution_hours: row.avg_resolution_hours,
        })
    }

    pub async fn by_category(&self, range: TimeRange) -> Result<Vec<CategoryCountDto>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT category, COUNT(*) AS count
            FROM reports
            WHERE created_at >= $1
            GROUP BY category
            "#,
        )
        .bind(range.window_start(Utc::now()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count reports by category: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(fill_categories(rows))
    }

    pub async fn by_status(&self, range: TimeRange) -> Result<Vec<StatusCountDto>> {
        let rows = sqlx::query_as::<_, StatusRow>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM reports
            WHERE created_at >= $1
            GROUP BY status
            "#,
        )
        .bind(range.window_start(Utc::now()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count reports by status: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(fill_statuses(rows))
    }

    /// Reports created per day/week/month across the window
    pub async fn trend(&self, range: TimeRange) -> Result<Vec<TrendPointDto>> {
        let from: DateTime<Utc> = range.window_start(Utc::now());

        sqlx::query_as::<_, TrendPointDto>(
            r#"
            SELECT
                date_trunc($2, created_at) AS period_start,
                COUNT(*) AS count,
                COUNT(*) FILTER (WHERE status = 'RESOLVED') AS resolved
            FROM reports
            WHERE created_at >= $1
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(from)
        .bind(range.bucket().as_sql_unit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get report trend: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Workload per provider for reports created in the window
    pub async fn providers(&self, range: TimeRange) -> Result<Vec<ProviderPerformanceDto>> {
        sqlx::query_as::<_, ProviderPerformanceDto>(
            r#"
            SELECT
                p.id AS provider_id,
                p.name,
                p.provider_type,
                COUNT(r.id) AS total_reports,
                COUNT(r.id) FILTER (
                    WHERE r.status IN ('PENDING', 'IN_PROGRESS', 'HELP_REQUESTED')
                ) AS open_reports,
                COUNT(r.id) FILTER (WHERE r.status = 'RESOLVED') AS resolved,
                (AVG(EXTRACT(EPOCH FROM (r.resolved_at - r.created_at)))
                    FILTER (WHERE r.resolved_at IS NOT NULL) / 3600.0)::DOUBLE PRECISION
                    AS avg_resolution_hours
            FROM utility_providers p
            LEFT JOIN reports r
                ON r.utility_provider_id = p.id AND r.created_at >= $1
            GROUP BY p.id, p.name, p.provider_type
            ORDER BY total_reports DESC, p.name
            "#,
        )
        .bind(range.window_start(Utc::now()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get provider analytics: {:?}", e);
            AppError::Database(e)
        })
    }
}
