use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::dtos::CreateReportDto;
use crate::features::reports::models::{
    CreateReport, Report, ReportStatus, UpdateReportContent, VoteKind,
};
use crate::features::reports::ordering::{sort_newest_first, NEWEST_FIRST_ORDER_SQL};
use crate::features::reports::services::{GeocodingService, ReportRouter};
use crate::shared::geo::GeoPoint;
use crate::shared::types::PaginationQuery;

const REPORT_COLUMNS: &str = "id, resident_id, title, description, category, location, \
     location_name, status, upvotes, downvotes, is_edited, edited_at, utility_provider_id, \
     assigned_team_id, resolved_at, created_at, updated_at";

/// Service for report operations
pub struct ReportService {
    pool: PgPool,
    router: ReportRouter,
    geocoding: Arc<GeocodingService>,
}

impl ReportService {
    pub fn new(pool: PgPool, router: ReportRouter, geocoding: Arc<GeocodingService>) -> Self {
        Self {
            pool,
            router,
            geocoding,
        }
    }

    /// Submit a report: persist as PENDING, then route it to the nearest provider
    pub async fn submit(&self, resident_id: Uuid, dto: CreateReportDto) -> Result<Report> {
        let point: GeoPoint = dto.location.parse()?;

        let location_name = match dto.location_name {
            Some(name) if !name.trim().is_empty() => Some(name),
            _ => self.place_name(point).await,
        };

        let report = self
            .create(&CreateReport {
                resident_id,
                title: dto.title,
                description: dto.description,
                category: dto.category,
                location: point.to_string(),
                location_name,
            })
            .await?;

        let Some(provider_id) = self.router.route(&report).await else {
            return Ok(report);
        };

        // The report is already stored; a failed assignment leaves it unrouted
        match self.assign_provider(report.id, provider_id).await {
            Ok(routed) => Ok(routed),
            Err(e) => {
                tracing::warn!(
                    "Report {} saved but not routed to provider {}: {}",
                    report.id,
                    provider_id,
                    e
                );
                Ok(report)
            }
        }
    }

    /// Reverse geocode, treating any failure as "no name"
    async fn place_name(&self, point: GeoPoint) -> Option<String> {
        match self.geocoding.reverse(point).await {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!("Reverse geocoding failed for {}: {}", point, e);
                None
            }
        }
    }

    /// Insert a new report in PENDING
    pub async fn create(&self, data: &CreateReport) -> Result<Report> {
        let query = format!(
            "INSERT INTO reports \
                (resident_id, title, description, category, location, location_name, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            REPORT_COLUMNS
        );

        let report = sqlx::query_as::<_, Report>(&query)
            .bind(data.resident_id)
            .bind(&data.title)
            .bind(&data.description)
            .bind(data.category)
            .bind(&data.location)
            .bind(&data.location_name)
            .bind(ReportStatus::Pending)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create report: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!(
            "Created {} report: {} by resident: {}",
            report.category,
            report.id,
            report.resident_id
        );

        Ok(report)
    }

    /// Attach the routed provider, re-asserting PENDING
    pub async fn assign_provider(&self, id: Uuid, provider_id: Uuid) -> Result<Report> {
        let query = format!(
            "UPDATE reports SET utility_provider_id = $2, status = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            REPORT_COLUMNS
        );

        let report = sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .bind(provider_id)
            .bind(ReportStatus::Pending)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to assign provider to report: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

        tracing::info!("Report {} routed to provider {}", id, provider_id);
        Ok(report)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Report> {
        let query = format!("SELECT {} FROM reports WHERE id = $1", REPORT_COLUMNS);

        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get report: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }

    /// One page of every report, newest first, with the total count
    pub async fn list_all(&self, pagination: &PaginationQuery) -> Result<(Vec<Report>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reports")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count reports: {:?}", e);
                AppError::Database(e)
            })?;

        let query = format!(
            "SELECT {} FROM reports {} LIMIT $1 OFFSET $2",
            REPORT_COLUMNS, NEWEST_FIRST_ORDER_SQL
        );

        let reports = sqlx::query_as::<_, Report>(&query)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list reports: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((reports, total))
    }

    pub async fn list_by_resident(&self, resident_id: Uuid) -> Result<Vec<Report>> {
        self.list_where("resident_id", resident_id).await
    }

    pub async fn list_by_provider(&self, provider_id: Uuid) -> Result<Vec<Report>> {
        self.list_where("utility_provider_id", provider_id).await
    }

    pub async fn list_by_team(&self, team_id: Uuid) -> Result<Vec<Report>> {
        self.list_where("assigned_team_id", team_id).await
    }

    /// `column` is always one of the fixed owner columns above
    async fn list_where(&self, column: &'static str, value: Uuid) -> Result<Vec<Report>> {
        let query = format!(
            "SELECT {} FROM reports WHERE {} = $1 {}",
            REPORT_COLUMNS, column, NEWEST_FIRST_ORDER_SQL
        );

        let mut reports = sqlx::query_as::<_, Report>(&query)
            .bind(value)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list reports by {}: {:?}", column, e);
                AppError::Database(e)
            })?;

        sort_newest_first(&mut reports);
        Ok(reports)
    }

    /// Edit title/description/location; marks the report edited for good
    ///
    /// A new location always replaces the place name, with the given one or
    /// a fresh lookup that may find nothing.
    pub async fn update_content(&self, id: Uuid, mut data: UpdateReportContent) -> Result<Report> {
        let current = self.get_by_id(id).await?;
        if current.status.is_terminal() {
            return Err(AppError::Conflict(format!(
                "Report {} is {} and can no longer be edited",
                id, current.status
            )));
        }

        if let Some(location) = data.location.take() {
            let point: GeoPoint = location.parse()?;
            if data.location_name.is_none() {
                data.location_name = self.place_name(point).await;
            }
            data.location = Some(point.to_string());
        }

        let query = format!(
            "UPDATE reports SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                location = COALESCE($4, location), \
                location_name = CASE WHEN $4::VARCHAR IS NULL \
                    THEN COALESCE($5, location_name) ELSE $5 END, \
                is_edited = TRUE, \
                edited_at = NOW(), \
                updated_at = NOW() \
             WHERE id = $1 AND status = $6 RETURNING {}",
            REPORT_COLUMNS
        );

        let report = sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .bind(&data.title)
            .bind(&data.description)
            .bind(&data.location)
            .bind(&data.location_name)
            .bind(current.status)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update report: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| {
                AppError::Conflict(format!("Report {} changed while being edited", id))
            })?;

        tracing::info!("Report {} edited", id);
        Ok(report)
    }

    /// Hard delete
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete report: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Report {} not found", id)));
        }

        tracing::info!("Report {} deleted", id);
        Ok(())
    }

    /// Move a report along the lifecycle, rejecting transitions the table forbids
    pub async fn update_status(&self, id: Uuid, next: ReportStatus) -> Result<Report> {
        let current = self.get_by_id(id).await?;

        if !current.status.can_transition_to(next) {
            return Err(AppError::Conflict(format!(
                "Cannot change report status from {} to {}",
                current.status, next
            )));
        }

        let resolved_at = (next == ReportStatus::Resolved).then(Utc::now);

        let query = format!(
            "UPDATE reports SET \
                status = $2, \
                resolved_at = COALESCE($4, resolved_at), \
                updated_at = NOW() \
             WHERE id = $1 AND status = $3 RETURNING {}",
            REPORT_COLUMNS
        );

        let report = sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .bind(next)
            .bind(current.status)
            .bind(resolved_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update report status: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| {
                AppError::Conflict(format!("Report {} status changed concurrently", id))
            })?;

        tracing::info!("Report {} status {} -> {}", id, current.status, next);
        Ok(report)
    }

    /// Set the maintenance team working on a report
    pub async fn assign_team(&self, id: Uuid, team_id: Uuid) -> Result<Report> {
        let query = format!(
            "UPDATE reports SET assigned_team_id = $2, updated_at = NOW() \
             WHERE id = $1 AND status NOT IN ($3, $4) RETURNING {}",
            REPORT_COLUMNS
        );

        let report = sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .bind(team_id)
            .bind(ReportStatus::Resolved)
            .bind(ReportStatus::Rejected)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to assign team to report: {:?}", e);
                AppError::Database(e)
            })?;

        match report {
            Some(report) => {
                tracing::info!("Report {} assigned to team {}", id, team_id);
                Ok(report)
            }
            None => {
                // Distinguish a missing report from a closed one
                let current = self.get_by_id(id).await?;
                Err(AppError::Conflict(format!(
                    "Report {} is {} and cannot be reassigned",
                    id, current.status
                )))
            }
        }
    }

    /// Increment one vote counter; repeated votes all count
    pub async fn vote(&self, id: Uuid, kind: VoteKind) -> Result<Report> {
        let result = sqlx::query(kind.increment_sql())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to record {:?} vote: {:?}", kind, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Report {} not found", id)));
        }

        tracing::debug!("Recorded {:?} vote on report {}", kind, id);
        self.get_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio_test::assert_ok;

    use crate::features::auth::model::UserRole;
    use crate::features::reports::models::IssueCategory;
    use crate::features::reports::services::ProviderDirectory;
    use crate::features::utility_providers::models::UtilityProvider;
    use crate::features::utility_providers::UtilityProviderService;
    use crate::shared::test_helpers::{
        insert_account, provider_fixture, register_provider, test_config,
    };
    use crate::shared::types::AccountStatus;

    struct StaticDirectory(Vec<UtilityProvider>);

    #[async_trait]
    impl ProviderDirectory for StaticDirectory {
        async fn list_providers(&self) -> Result<Vec<UtilityProvider>> {
            Ok(self.0.clone())
        }
    }

    fn service(pool: PgPool, directory: Arc<dyn ProviderDirectory>) -> ReportService {
        let geocoding = GeocodingService::new(&test_config().geocoding).unwrap();
        ReportService::new(pool, ReportRouter::new(directory), Arc::new(geocoding))
    }

    fn service_with_providers(pool: PgPool) -> ReportService {
        let directory: Arc<dyn ProviderDirectory> =
            Arc::new(UtilityProviderService::new(pool.clone()));
        service(pool, directory)
    }

    fn power_outage(location: &str) -> CreateReportDto {
        CreateReportDto {
            title: "Farola apagada".to_string(),
            description: "La farola de la esquina lleva una semana sin luz".to_string(),
            category: IssueCategory::Power,
            location: location.to_string(),
            location_name: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_submit_routes_to_nearest_provider(pool: PgPool) {
        let far = register_provider(&pool, IssueCategory::Power, "40.5,-3.7").await;
        let near = register_provider(&pool, IssueCategory::Power, "40.02,-3.7").await;
        let resident = insert_account(&pool, UserRole::Resident).await;
        let reports = service_with_providers(pool);

        let report = reports
            .submit(resident.id, power_outage("40.0,-3.7"))
            .await
            .unwrap();

        assert_eq!(report.utility_provider_id, Some(near.id));
        assert_ne!(report.utility_provider_id, Some(far.id));
        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.location, "40,-3.7");
        assert_eq!(report.location_name, None);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_submit_without_matching_provider_stays_unrouted(pool: PgPool) {
        register_provider(&pool, IssueCategory::Water, "40.0,-3.7").await;
        let resident = insert_account(&pool, UserRole::Resident).await;
        let reports = service_with_providers(pool);

        let report = reports
            .submit(resident.id, power_outage("40.0,-3.7"))
            .await
            .unwrap();

        assert_eq!(report.utility_provider_id, None);
        assert_eq!(report.status, ReportStatus::Pending);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_submit_keeps_report_when_assignment_fails(pool: PgPool) {
        // Listed by the directory but never stored, so the provider foreign key rejects it
        let ghost = provider_fixture(IssueCategory::Power, "40.0,-3.7", AccountStatus::Active);
        let resident = insert_account(&pool, UserRole::Resident).await;
        let reports = service(pool, Arc::new(StaticDirectory(vec![ghost])));

        let report = assert_ok!(reports.submit(resident.id, power_outage("40.0,-3.7")).await);
        assert_eq!(report.utility_provider_id, None);

        let stored = reports.get_by_id(report.id).await.unwrap();
        assert_eq!(stored.status, ReportStatus::Pending);
        assert_eq!(stored.utility_provider_id, None);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_status_follows_lifecycle(pool: PgPool) {
        let resident = insert_account(&pool, UserRole::Resident).await;
        let reports = service_with_providers(pool);
        let report = reports
            .submit(resident.id, power_outage("40.0,-3.7"))
            .await
            .unwrap();

        let skipped = reports.update_status(report.id, ReportStatus::Resolved).await;
        assert!(matches!(skipped, Err(AppError::Conflict(_))));

        let started = reports
            .update_status(report.id, ReportStatus::InProgress)
            .await
            .unwrap();
        assert_eq!(started.status, ReportStatus::InProgress);
        assert_eq!(started.resolved_at, None);

        let resolved = reports
            .update_status(report.id, ReportStatus::Resolved)
            .await
            .unwrap();
        assert_eq!(resolved.status, ReportStatus::Resolved);
        assert!(resolved.resolved_at.is_some());

        let reopened = reports.update_status(report.id, ReportStatus::InProgress).await;
        assert!(matches!(reopened, Err(AppError::Conflict(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_new_location_replaces_place_name(pool: PgPool) {
        let resident = insert_account(&pool, UserRole::Resident).await;
        let reports = service_with_providers(pool);
        let mut dto = power_outage("40.0,-3.7");
        dto.location_name = Some("Plaza Mayor".to_string());
        let report = reports.submit(resident.id, dto).await.unwrap();
        assert_eq!(report.location_name.as_deref(), Some("Plaza Mayor"));

        let retitled = reports
            .update_content(
                report.id,
                UpdateReportContent {
                    title: Some("Farola rota".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(retitled.is_edited);
        assert!(retitled.edited_at.is_some());
        assert_eq!(retitled.location_name.as_deref(), Some("Plaza Mayor"));

        // Geocoding is disabled here, so the moved report has no name at all
        let moved = reports
            .update_content(
                report.id,
                UpdateReportContent {
                    location: Some("40.01,-3.71".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.location, "40.01,-3.71");
        assert_eq!(moved.location_name, None);
        assert_eq!(moved.title, "Farola rota");

        let renamed = reports
            .update_content(
                report.id,
                UpdateReportContent {
                    location: Some("40.02,-3.72".to_string()),
                    location_name: Some("Calle de Alcala".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.location_name.as_deref(), Some("Calle de Alcala"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_closed_report_cannot_be_edited(pool: PgPool) {
        let resident = insert_account(&pool, UserRole::Resident).await;
        let reports = service_with_providers(pool);
        let report = reports
            .submit(resident.id, power_outage("40.0,-3.7"))
            .await
            .unwrap();
        reports
            .update_status(report.id, ReportStatus::Rejected)
            .await
            .unwrap();

        let edit = reports
            .update_content(
                report.id,
                UpdateReportContent {
                    title: Some("Otra cosa".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(edit, Err(AppError::Conflict(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_votes_accumulate(pool: PgPool) {
        let resident = insert_account(&pool, UserRole::Resident).await;
        let reports = service_with_providers(pool);
        let report = reports
            .submit(resident.id, power_outage("40.0,-3.7"))
            .await
            .unwrap();

        reports.vote(report.id, VoteKind::Up).await.unwrap();
        reports.vote(report.id, VoteKind::Down).await.unwrap();
        let voted = reports.vote(report.id, VoteKind::Up).await.unwrap();
        assert_eq!((voted.upvotes, voted.downvotes), (2, 1));

        let missing = reports.vote(Uuid::new_v4(), VoteKind::Up).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_resident_list_puts_edited_reports_first(pool: PgPool) {
        let resident = insert_account(&pool, UserRole::Resident).await;
        let reports = service_with_providers(pool);
        let older = reports
            .submit(resident.id, power_outage("40.0,-3.7"))
            .await
            .unwrap();
        let newer = reports
            .submit(resident.id, power_outage("40.0,-3.7"))
            .await
            .unwrap();
        reports
            .update_content(
                older.id,
                UpdateReportContent {
                    description: Some("Ahora parpadea toda la noche".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let listed = reports.list_by_resident(resident.id).await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|r| r.id).collect();
        assert_eq!(ids, [older.id, newer.id]);
    }
}
