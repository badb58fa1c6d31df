use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::core::extractor::AppQuery;
use crate::features::analytics::dtos::{
    AnalyticsQuery, AnalyticsSummaryDto, CategoryCountDto, ProviderPerformanceDto,
    StatusCountDto, TrendPointDto,
};
use crate::features::analytics::services::AnalyticsService;
use crate::features::auth::model::{AuthenticatedUser, UserRole};
use crate::features::auth::Resource;
use crate::shared::types::ApiResponse;

fn authorize(user: &AuthenticatedUser) -> Result<()> {
    user.authorize(Resource::Analytics, &[UserRole::Government])
}

/// Headline report counts for the window
#[utoipa::path(
    get,
    path = "/ayto/analytics/summary",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Summary", body = ApiResponse<AnalyticsSummaryDto>),
        (status = 400, description = "Invalid time range"),
        (status = 403, description = "Government access required")
    ),
    security(("bearer_auth" = [])),
    tag = "analytics"
)]
pub async fn get_summary(
    user: AuthenticatedUser,
    State(service): State<Arc<AnalyticsService>>,
    AppQuery(query): AppQuery<AnalyticsQuery>,
) -> Result<Json<ApiResponse<AnalyticsSummaryDto>>> {
    authorize(&user)?;
    let summary = service.summary(query.time_range).await?;
    Ok(Json(ApiResponse::success(Some(summary), None, None)))
}

#[utoipa::path(
    get,
    path = "/ayto/analytics/by-category",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Reports per category", body = ApiResponse<Vec<CategoryCountDto>>),
        (status = 400, description = "Invalid time range"),
        (status = 403, description = "Government access required")
    ),
    security(("bearer_auth" = [])),
    tag = "analytics"
)]
pub async fn get_by_category(
    user: AuthenticatedUser,
    State(service): State<Arc<AnalyticsService>>,
    AppQuery(query): AppQuery<AnalyticsQuery>,
) -> Result<Json<ApiResponse<Vec<CategoryCountDto>>>> {
    authorize(&user)?;
    let counts = service.by_category(query.time_range).await?;
    Ok(Json(ApiResponse::success(Some(counts), None, None)))
}

#[utoipa::path(
    get,
    path = "/ayto/analytics/by-status",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Reports per status", body = ApiResponse<Vec<StatusCountDto>>),
        (status = 400, description = "Invalid time range"),
        (status = 403, description = "Government access required")
    ),
    security(("bearer_auth" = [])),
    tag = "analytics"
)]
pub async fn get_by_status(
    user: AuthenticatedUser,
    State(service): State<Arc<AnalyticsService>>,
    AppQuery(query): AppQuery<AnalyticsQuery>,
) -> Result<Json<ApiResponse<Vec<StatusCountDto>>>> {
    authorize(&user)?;
    let counts = service.by_status(query.time_range).await?;
    Ok(Json(ApiResponse::success(Some(counts), None, None)))
}

/// Report volume over time (daily, weekly or monthly buckets)
#[utoipa::path(
    get,
    path = "/ayto/analytics/trend",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Trend points", body = ApiResponse<Vec<TrendPointDto>>),
        (status = 400, description = "Invalid time range"),
        (status = 403, description = "Government access required")
    ),
    security(("bearer_auth" = [])),
    tag = "analytics"
)]
pub async fn get_trend(
    user: AuthenticatedUser,
    State(service): State<Arc<AnalyticsService>>,
    AppQuery(query): AppQuery<AnalyticsQuery>,
) -> Result<Json<ApiResponse<Vec<TrendPointDto>>>> {
    authorize(&user)?;
    let points = service.trend(query.time_range).await?;
    Ok(Json(ApiResponse::success(Some(points), None, None)))
}

#[utoipa::path(
    get,
    path = "/ayto/analytics/providers",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Per-provider performance", body = ApiResponse<Vec<ProviderPerformanceDto>>),
        (status = 400, description = "Invalid time range"),
        (status = 403, description = "Government access required")
    ),
    security(("bearer_auth" = [])),
    tag = "analytics"
)]
pub async fn get_providers(
    user: AuthenticatedUser,
    State(service): State<Arc<AnalyticsService>>,
    AppQuery(query): AppQuery<AnalyticsQuery>,
) -> Result<Json<ApiResponse<Vec<ProviderPerformanceDto>>>> {
    authorize(&user)?;
    let providers = service.providers(query.time_range).await?;
    Ok(Json(ApiResponse::success(Some(providers), None, None)))
}
