use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, CreateUser, UserRole};
use crate::features::auth::Resource;
use crate::features::auth::services::insert_user;
use crate::features::maintenance_teams::dtos::RegisterMaintenanceTeamDto;
use crate::features::maintenance_teams::models::{
    CreateMaintenanceTeam, MaintenanceTeam, WorkStatus,
};
use crate::shared::types::AccountStatus;

const TEAM_COLUMNS: &str = "id, user_id, utility_provider_id, team_leader, work_status, \
     account_status, created_at, updated_at";

/// Service for maintenance team operations
pub struct MaintenanceTeamService {
    pool: PgPool,
}

impl MaintenanceTeamService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the team's login account and profile in one transaction
    pub async fn register(
        &self,
        provider_id: Uuid,
        dto: RegisterMaintenanceTeamDto,
    ) -> Result<MaintenanceTeam> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let user = insert_user(
            &mut *tx,
            &CreateUser {
                email: dto.email,
                password: dto.password,
                full_name: dto.team_leader.clone(),
                phone: dto.phone,
                role: UserRole::MaintenanceTeam,
            },
        )
        .await?;

        let data = CreateMaintenanceTeam {
            user_id: user.id,
            utility_provider_id: provider_id,
            team_leader: dto.team_leader,
        };

        let query = format!(
            "INSERT INTO maintenance_teams (user_id, utility_provider_id, team_leader) \
             VALUES ($1, $2, $3) RETURNING {}",
            TEAM_COLUMNS
        );

        let team = sqlx::query_as::<_, MaintenanceTeam>(&query)
            .bind(data.user_id)
            .bind(data.utility_provider_id)
            .bind(&data.team_leader)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create maintenance team: {:?}", e);
                AppError::Database(e)
            })?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit team registration: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Registered maintenance team {} for provider {}",
            team.id,
            provider_id
        );
        Ok(team)
    }

    pub async fn list_all(&self) -> Result<Vec<MaintenanceTeam>> {
        let query = format!(
            "SELECT {} FROM maintenance_teams ORDER BY created_at, id",
            TEAM_COLUMNS
        );

        sqlx::query_as::<_, MaintenanceTeam>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list maintenance teams: {:?}", e);
                AppError::Database(e)
            })
    }

    pub async fn list_by_provider(&self, provider_id: Uuid) -> Result<Vec<MaintenanceTeam>> {
        let query = format!(
            "SELECT {} FROM maintenance_teams WHERE utility_provider_id = $1 ORDER BY created_at, id",
            TEAM_COLUMNS
        );

        sqlx::query_as::<_, MaintenanceTeam>(&query)
            .bind(provider_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list provider teams: {:?}", e);
                AppError::Database(e)
            })
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<MaintenanceTeam> {
        let query = format!("SELECT {} FROM maintenance_teams WHERE id = $1", TEAM_COLUMNS);

        sqlx::query_as::<_, MaintenanceTeam>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get maintenance team: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Maintenance team {} not found", id)))
    }

    /// Team profile owned by a login account, if any
    pub async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<MaintenanceTeam>> {
        let query = format!(
            "SELECT {} FROM maintenance_teams WHERE user_id = $1",
            TEAM_COLUMNS
        );

        sqlx::query_as::<_, MaintenanceTeam>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get maintenance team by user: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Team profile of a MAINTENANCE_TEAM caller, or a 403 for `resource`
    pub async fn for_user(
        &self,
        user: &AuthenticatedUser,
        resource: Resource,
    ) -> Result<MaintenanceTeam> {
        user.authorize(resource, &[UserRole::MaintenanceTeam])?;
        self.find_by_user_id(user.user_id)
            .await?
            .ok_or_else(|| resource.denied())
    }

    pub async fn update_work_status(
        &self,
        id: Uuid,
        status: WorkStatus,
    ) -> Result<MaintenanceTeam> {
        let query = format!(
            "UPDATE maintenance_teams SET work_status = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            TEAM_COLUMNS
        );

        let team = sqlx::query_as::<_, MaintenanceTeam>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update team work status: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Maintenance team {} not found", id)))?;

        tracing::info!("Maintenance team {} is now {}", id, status);
        Ok(team)
    }

    pub async fn update_account_status(
        &self,
        id: Uuid,
        status: AccountStatus,
    ) -> Result<MaintenanceTeam> {
        let query = format!(
            "UPDATE maintenance_teams SET account_status = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            TEAM_COLUMNS
        );

        let team = sqlx::query_as::<_, MaintenanceTeam>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update team account status: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Maintenance team {} not found", id)))?;

        tracing::info!("Maintenance team {} account {:?}", id, status);
        Ok(team)
    }
}
