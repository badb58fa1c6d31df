use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, CreateUser, UserRole};
use crate::features::auth::Resource;
use crate::features::auth::services::insert_user;
use crate::features::reports::services::ProviderDirectory;
use crate::features::utility_providers::dtos::RegisterUtilityProviderDto;
use crate::features::utility_providers::models::{CreateUtilityProvider, UtilityProvider};
use crate::shared::geo::GeoPoint;
use crate::shared::types::AccountStatus;

const PROVIDER_COLUMNS: &str =
    "id, user_id, name, location, provider_type, account_status, created_at, updated_at";

/// Service for utility provider operations
pub struct UtilityProviderService {
    pool: PgPool,
}

impl UtilityProviderService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the provider's login account and profile in one transaction
    pub async fn register(&self, dto: RegisterUtilityProviderDto) -> Result<UtilityProvider> {
        let location: GeoPoint = dto.location.parse()?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let user = insert_user(
            &mut *tx,
            &CreateUser {
                email: dto.email,
                password: dto.password,
                full_name: dto.name.clone(),
                phone: dto.phone,
                role: UserRole::UtilityProvider,
            },
        )
        .await?;

        let data = CreateUtilityProvider {
            user_id: user.id,
            name: dto.name,
            location: location.to_string(),
            provider_type: dto.provider_type,
        };

        let query = format!(
            "INSERT INTO utility_providers (user_id, name, location, provider_type) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            PROVIDER_COLUMNS
        );

        let provider = sqlx::query_as::<_, UtilityProvider>(&query)
            .bind(data.user_id)
            .bind(&data.name)
            .bind(&data.location)
            .bind(data.provider_type)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create utility provider: {:?}", e);
                AppError::Database(e)
            })?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit provider registration: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Registered utility provider: {} ({}) type={}",
            provider.id,
            provider.name,
            provider.provider_type
        );

        Ok(provider)
    }

    /// List every provider regardless of status
    pub async fn list_all(&self) -> Result<Vec<UtilityProvider>> {
        let query = format!(
            "SELECT {} FROM utility_providers ORDER BY created_at, id",
            PROVIDER_COLUMNS
        );

        sqlx::query_as::<_, UtilityProvider>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list utility providers: {:?}", e);
                AppError::Database(e)
            })
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<UtilityProvider> {
        let query = format!("SELECT {} FROM utility_providers WHERE id = $1", PROVIDER_COLUMNS);

        sqlx::query_as::<_, UtilityProvider>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get utility provider: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Utility provider {} not found", id)))
    }

    /// Provider profile owned by a login account, if any
    pub async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<UtilityProvider>> {
        let query = format!(
            "SELECT {} FROM utility_providers WHERE user_id = $1",
            PROVIDER_COLUMNS
        );

        sqlx::query_as::<_, UtilityProvider>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get utility provider by user: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Provider profile of a UTILITY_PROVIDER caller, or a 403 for `resource`
    pub async fn for_user(
        &self,
        user: &AuthenticatedUser,
        resource: Resource,
    ) -> Result<UtilityProvider> {
        user.authorize(resource, &[UserRole::UtilityProvider])?;
        self.find_by_user_id(user.user_id)
            .await?
            .ok_or_else(|| resource.denied())
    }

    pub async fn update_account_status(
        &self,
        id: Uuid,
        status: AccountStatus,
    ) -> Result<UtilityProvider> {
        let query = format!(
            "UPDATE utility_providers SET account_status = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            PROVIDER_COLUMNS
        );

        let provider = sqlx::query_as::<_, UtilityProvider>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update utility provider status: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Utility provider {} not found", id)))?;

        tracing::info!("Utility provider {} is now {:?}", id, status);
        Ok(provider)
    }
}

#[async_trait]
impl ProviderDirectory for UtilityProviderService {
    async fn list_providers(&self) -> Result<Vec<UtilityProvider>> {
        self.list_all().await
    }
}
