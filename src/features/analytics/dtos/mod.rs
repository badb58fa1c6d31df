mod analytics_dto;

pub use analytics_dto::{
    AnalyticsQuery, AnalyticsSummaryDto, CategoryCountDto, ProviderPerformanceDto,
    StatusCountDto, TrendPointDto,
};
