use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::reports::models::{IssueCategory, Report};
use crate::features::utility_providers::models::UtilityProvider;
use crate::shared::geo::GeoPoint;

/// Source of routing candidates
#[async_trait]
pub trait ProviderDirectory: Send + Sync {
    async fn list_providers(&self) -> Result<Vec<UtilityProvider>>;
}

/// Pick the nearest ACTIVE provider whose type matches `category`
///
/// Candidates with an unparseable location are skipped. On equal distance the
/// earlier candidate in `providers` wins.
pub fn select_nearest_provider(
    origin: GeoPoint,
    category: IssueCategory,
    providers: &[UtilityProvider],
) -> Option<Uuid> {
    let mut best: Option<(Uuid, f64)> = None;

    for provider in providers
        .iter()
        .filter(|p| p.provider_type == category && p.account_status.is_active())
    {
        let point = match provider.location.parse::<GeoPoint>() {
            Ok(point) => point,
            Err(e) => {
                tracing::warn!(
                    "Skipping provider {} with unusable location {:?}: {}",
                    provider.id,
                    provider.location,
                    e
                );
                continue;
            }
        };

        let distance = origin.distance_km(&point);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((provider.id, distance)),
        }
    }

    if let Some((id, distance)) = best {
        tracing::debug!("Nearest {} provider {} at {:.3} km", category, id, distance);
    }

    best.map(|(id, _)| id)
}

/// Routes newly submitted reports to a utility provider
#[derive(Clone)]
pub struct ReportRouter {
    directory: Arc<dyn ProviderDirectory>,
}

impl ReportRouter {
    pub fn new(directory: Arc<dyn ProviderDirectory>) -> Self {
        Self { directory }
    }

    /// Provider id for `report`, or `None` when nothing matches or the lookup fails
    pub async fn route(&self, report: &Report) -> Option<Uuid> {
        let origin = match report.location.parse::<GeoPoint>() {
            Ok(point) => point,
            Err(e) => {
                tracing::warn!("Report {} has unusable location: {}", report.id, e);
                return None;
            }
        };

        let providers = match self.directory.list_providers().await {
            Ok(providers) => providers,
            Err(e) => {
                tracing::warn!("Provider lookup failed while routing {}: {}", report.id, e);
                return None;
            }
        };

        let selected = select_nearest_provider(origin, report.category, &providers);
        if selected.is_none() {
            tracing::info!(
                "No active {} provider available for report {}",
                report.category,
                report.id
            );
        }
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use crate::shared::test_helpers::{day, provider_fixture, report_fixture};
    use crate::shared::types::AccountStatus;

    // 1 degree of latitude is ~111.195 km, so 0.018 deg ~ 2 km and 0.045 deg ~ 5 km
    const ORIGIN: &str = "40.0,-3.7";

    struct StaticDirectory(Vec<UtilityProvider>);

    #[async_trait]
    impl ProviderDirectory for StaticDirectory {
        async fn list_providers(&self) -> Result<Vec<UtilityProvider>> {
            Ok(self.0.clone())
        }
    }

    struct FailingDirectory;

    #[async_trait]
    impl ProviderDirectory for FailingDirectory {
        async fn list_providers(&self) -> Result<Vec<UtilityProvider>> {
            Err(AppError::ExternalServiceError("directory offline".to_string()))
        }
    }

    fn origin() -> GeoPoint {
        ORIGIN.parse().unwrap()
    }

    fn water_report() -> Report {
        let mut report = report_fixture("Fuga en la calle Mayor", day(0));
        report.category = IssueCategory::Water;
        report.location = ORIGIN.to_string();
        report
    }

    #[test]
    fn test_nearest_active_matching_provider_wins() {
        let a = provider_fixture(IssueCategory::Water, "40.045,-3.7", AccountStatus::Active);
        let b = provider_fixture(IssueCategory::Water, "40.018,-3.7", AccountStatus::Active);
        let c = provider_fixture(IssueCategory::Power, "40.0,-3.7", AccountStatus::Active);
        let d = provider_fixture(IssueCategory::Water, "40.001,-3.7", AccountStatus::Inactive);

        let providers = vec![a, b.clone(), c, d];
        assert_eq!(
            select_nearest_provider(origin(), IssueCategory::Water, &providers),
            Some(b.id)
        );
    }

    #[test]
    fn test_no_active_match_returns_none() {
        let providers = vec![
            provider_fixture(IssueCategory::Power, "40.0,-3.7", AccountStatus::Active),
            provider_fixture(IssueCategory::Water, "40.0,-3.7", AccountStatus::Inactive),
        ];

        assert_eq!(
            select_nearest_provider(origin(), IssueCategory::Water, &providers),
            None
        );
        assert_eq!(select_nearest_provider(origin(), IssueCategory::Water, &[]), None);
    }

    #[test]
    fn test_tie_keeps_first_candidate() {
        // Two depots sharing one yard are exactly equidistant
        let first = provider_fixture(IssueCategory::Roads, "40.02,-3.7", AccountStatus::Active);
        let second = provider_fixture(IssueCategory::Roads, "40.02,-3.7", AccountStatus::Active);
        let providers = vec![first.clone(), second.clone()];

        for _ in 0..5 {
            assert_eq!(
                select_nearest_provider(origin(), IssueCategory::Roads, &providers),
                Some(first.id)
            );
        }

        let reversed = vec![second.clone(), first];
        assert_eq!(
            select_nearest_provider(origin(), IssueCategory::Roads, &reversed),
            Some(second.id)
        );
    }

    #[test]
    fn test_malformed_candidate_is_skipped() {
        let broken = provider_fixture(
            IssueCategory::Telecom,
            "not-a-location",
            AccountStatus::Active,
        );
        let valid = provider_fixture(IssueCategory::Telecom, "40.5,-3.7", AccountStatus::Active);

        assert_eq!(
            select_nearest_provider(
                origin(),
                IssueCategory::Telecom,
                &[broken, valid.clone()]
            ),
            Some(valid.id)
        );
    }

    #[tokio::test]
    async fn test_route_uses_directory() {
        let near = provider_fixture(IssueCategory::Water, "40.018,-3.7", AccountStatus::Active);
        let far = provider_fixture(IssueCategory::Water, "40.045,-3.7", AccountStatus::Active);
        let router = ReportRouter::new(Arc::new(StaticDirectory(vec![far, near.clone()])));

        assert_eq!(router.route(&water_report()).await, Some(near.id));
    }

    #[tokio::test]
    async fn test_route_swallows_directory_errors() {
        let router = ReportRouter::new(Arc::new(FailingDirectory));
        assert_eq!(router.route(&water_report()).await, None);
    }

    #[tokio::test]
    async fn test_route_with_unusable_report_location() {
        let provider = provider_fixture(IssueCategory::Water, "40.0,-3.7", AccountStatus::Active);
        let router = ReportRouter::new(Arc::new(StaticDirectory(vec![provider])));

        let mut report = water_report();
        report.location = "40.0;-3.7".to_string();
        assert_eq!(router.route(&report).await, None);
    }
}
