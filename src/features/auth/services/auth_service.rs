use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{
    AuthResponseDto, AuthUserDto, LoginRequestDto, RegisterRequestDto,
};
use crate::features::auth::model::{AuthenticatedUser, CreateUser, User, UserRole};
use crate::features::auth::password::{hash_password, verify_password};
use crate::features::auth::services::token_service::TokenService;
use sqlx::{PgExecutor, PgPool};
use std::sync::Arc;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, email, password_hash, full_name, phone, role, created_at";

/// Insert a login account, hashing its password
///
/// Takes any executor so provider/team registration can run it inside their transaction.
pub async fn insert_user<'e, E>(executor: E, data: &CreateUser) -> Result<User>
where
    E: PgExecutor<'e>,
{
    let password_hash = hash_password(&data.password)?;

    let query = format!(
        "INSERT INTO users (email, password_hash, full_name, phone, role) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {}",
        USER_COLUMNS
    );

    let user = sqlx::query_as::<_, User>(&query)
        .bind(data.email.to_lowercase())
        .bind(password_hash)
        .bind(&data.full_name)
        .bind(&data.phone)
        .bind(data.role)
        .fetch_one(executor)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict(format!("Email {} is already registered", data.email))
            }
            e => {
                tracing::error!("Failed to create user: {:?}", e);
                AppError::Database(e)
            }
        })?;

    tracing::info!("Created {} account: {}", user.role, user.id);
    Ok(user)
}

/// Service for authentication operations (register, login)
pub struct AuthService {
    pool: PgPool,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(pool: PgPool, token_service: Arc<TokenService>) -> Self {
        Self {
            pool,
            token_service,
        }
    }

    /// Register a new resident account
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthResponseDto> {
        let user = insert_user(
            &self.pool,
            &CreateUser {
                email: dto.email,
                password: dto.password,
                full_name: dto.full_name,
                phone: dto.phone,
                role: UserRole::Resident,
            },
        )
        .await?;

        self.auth_response(user)
    }

    /// Login with email and password
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);

        let user = sqlx::query_as::<_, User>(&query)
            .bind(dto.email.to_lowercase())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to look up user by email: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        if !verify_password(&dto.password, &user.password_hash)? {
            tracing::info!("Failed login attempt for user: {}", user.id);
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        self.auth_response(user)
    }

    /// Get current user info (for /me endpoint)
    pub async fn get_current_user(&self, user: &AuthenticatedUser) -> Result<AuthUserDto> {
        self.get_by_id(user.user_id).await.map(Into::into)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<User> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get user: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    fn auth_response(&self, user: User) -> Result<AuthResponseDto> {
        let (access_token, expires_in) = self.token_service.issue(user.id, &user.email, user.role)?;

        Ok(AuthResponseDto {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
            user: user.into(),
        })
    }
}
