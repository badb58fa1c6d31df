use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::{AuthenticatedUser, UserRole};
use crate::features::auth::Resource;
use crate::features::utility_providers::dtos::{
    RegisterUtilityProviderDto, UpdateProviderStatusDto, UtilityProviderResponseDto,
};
use crate::features::utility_providers::services::UtilityProviderService;
use crate::shared::types::{ApiResponse, Meta};

/// List all utility providers
#[utoipa::path(
    get,
    path = "/ayto/utility-provider/all",
    responses(
        (status = 200, description = "All utility providers", body = ApiResponse<Vec<UtilityProviderResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Government access required")
    ),
    security(("bearer_auth" = [])),
    tag = "utility-providers"
)]
pub async fn list_providers(
    user: AuthenticatedUser,
    State(service): State<Arc<UtilityProviderService>>,
) -> Result<Json<ApiResponse<Vec<UtilityProviderResponseDto>>>> {
    user.authorize(Resource::UtilityProvider, &[UserRole::Government])?;

    let providers = service.list_all().await?;
    let total = providers.len() as i64;
    let dtos = providers.into_iter().map(Into::into).collect();

    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Register a utility provider and its login account
#[utoipa::path(
    post,
    path = "/ayto/utility-provider/register",
    request_body = RegisterUtilityProviderDto,
    responses(
        (status = 201, description = "Provider registered", body = ApiResponse<UtilityProviderResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Government access required"),
        (status = 409, description = "Email already registered")
    ),
    security(("bearer_auth" = [])),
    tag = "utility-providers"
)]
pub async fn register_provider(
    user: AuthenticatedUser,
    State(service): State<Arc<UtilityProviderService>>,
    AppJson(dto): AppJson<RegisterUtilityProviderDto>,
) -> Result<(StatusCode, Json<ApiResponse<UtilityProviderResponseDto>>)> {
    user.authorize(Resource::UtilityProvider, &[UserRole::Government])?;
    dto.validate()?;

    let provider = service.register(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(provider.into()),
            Some("Utility provider registered".to_string()),
            None,
        )),
    ))
}

/// Get a utility provider
///
/// Government sees any provider; a provider account sees its own profile.
#[utoipa::path(
    get,
    path = "/ayto/utility-provider/{id}",
    params(("id" = Uuid, Path, description = "Utility provider ID")),
    responses(
        (status = 200, description = "Provider found", body = ApiResponse<UtilityProviderResponseDto>),
        (status = 403, description = "Not allowed to view this provider"),
        (status = 404, description = "Provider not found")
    ),
    security(("bearer_auth" = [])),
    tag = "utility-providers"
)]
pub async fn get_provider(
    user: AuthenticatedUser,
    State(service): State<Arc<UtilityProviderService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UtilityProviderResponseDto>>> {
    user.authorize(
        Resource::UtilityProvider,
        &[UserRole::Government, UserRole::UtilityProvider],
    )?;

    let provider = service.get_by_id(id).await?;
    user.authorize_owner(
        Resource::UtilityProvider,
        provider.user_id,
        &[UserRole::Government],
    )?;

    Ok(Json(ApiResponse::success(Some(provider.into()), None, None)))
}

/// Activate or deactivate a provider (deactivated providers stop receiving reports)
#[utoipa::path(
    put,
    path = "/ayto/utility-provider/{id}/status",
    params(("id" = Uuid, Path, description = "Utility provider ID")),
    request_body = UpdateProviderStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<UtilityProviderResponseDto>),
        (status = 403, description = "Government access required"),
        (status = 404, description = "Provider not found")
    ),
    security(("bearer_auth" = [])),
    tag = "utility-providers"
)]
pub async fn update_provider_status(
    user: AuthenticatedUser,
    State(service): State<Arc<UtilityProviderService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateProviderStatusDto>,
) -> Result<Json<ApiResponse<UtilityProviderResponseDto>>> {
    user.authorize(Resource::UtilityProvider, &[UserRole::Government])?;

    let provider = service.update_account_status(id, dto.account_status).await?;
    Ok(Json(ApiResponse::success(Some(provider.into()), None, None)))
}
