use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Reporting window for analytics queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

/// Granularity of trend buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendBucket {
    Day,
    Week,
    Month,
}

impl TrendBucket {
    /// Unit name accepted by Postgres `date_trunc`
    pub fn as_sql_unit(self) -> &'static str {
        match self {
            TrendBucket::Day => "day",
            TrendBucket::Week => "week",
            TrendBucket::Month => "month",
        }
    }
}

impl TimeRange {
    pub fn days(self) -> i64 {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Quarter => 90,
            TimeRange::Year => 365,
        }
    }

    /// Inclusive lower bound of the window ending at `now`
    pub fn window_start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.days())
    }

    pub fn bucket(self) -> TrendBucket {
        match self {
            TimeRange::Week | TimeRange::Month => TrendBucket::Day,
            TimeRange::Quarter => TrendBucket::Week,
            TimeRange::Year => TrendBucket::Month,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_start() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();

        assert_eq!(
            TimeRange::Week.window_start(now),
            Utc.with_ymd_and_hms(2024, 3, 24, 12, 0, 0).unwrap()
        );
        assert_eq!(
            TimeRange::Month.window_start(now),
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
        );
        assert_eq!(
            TimeRange::Quarter.window_start(now),
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
        );
        // 2024 is a leap year
        assert_eq!(
            TimeRange::Year.window_start(now),
            Utc.with_ymd_and_hms(2023, 4, 1, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_bucket_granularity() {
        assert_eq!(TimeRange::Week.bucket().as_sql_unit(), "day");
        assert_eq!(TimeRange::Month.bucket().as_sql_unit(), "day");
        assert_eq!(TimeRange::Quarter.bucket().as_sql_unit(), "week");
        assert_eq!(TimeRange::Year.bucket().as_sql_unit(), "month");
    }

    #[test]
    fn test_wire_format_and_default() {
        let parsed: TimeRange = serde_json::from_str("\"quarter\"").unwrap();
        assert_eq!(parsed, TimeRange::Quarter);
        assert!(serde_json::from_str::<TimeRange>("\"decade\"").is_err());
        assert_eq!(TimeRange::default(), TimeRange::Month);
    }
}
