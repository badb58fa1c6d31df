use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, middleware::from_fn, Router};
use sqlx::PgPool;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::core::config::Config;
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::analytics::{routes as analytics_routes, AnalyticsService};
use crate::features::auth::routes as auth_routes;
use crate::features::auth::{AuthService, JwtValidator, TokenService};
use crate::features::employees::{routes as employees_routes, EmployeeService};
use crate::features::maintenance_teams::{routes as teams_routes, MaintenanceTeamService};
use crate::features::reports::services::ProviderDirectory;
use crate::features::reports::{
    routes as reports_routes, GeocodingService, ReportRouter, ReportService,
};
use crate::features::utility_providers::{routes as providers_routes, UtilityProviderService};

/// Wire services and routes into the application router
pub fn build_router(config: &Config, pool: PgPool) -> anyhow::Result<Router> {
    // Initialize auth
    let jwt_validator = Arc::new(JwtValidator::new(
        &config.auth.jwt_secret,
        config.auth.issuer.clone(),
        config.auth.jwt_leeway,
    ));
    let token_service = Arc::new(TokenService::new(&config.auth));
    let auth_service = Arc::new(AuthService::new(pool.clone(), Arc::clone(&token_service)));
    tracing::info!("Auth services initialized");

    // Organisations
    let provider_service = Arc::new(UtilityProviderService::new(pool.clone()));
    let team_service = Arc::new(MaintenanceTeamService::new(pool.clone()));
    let employee_service = Arc::new(EmployeeService::new(pool.clone()));
    tracing::info!("Provider, team and employee services initialized");

    // Reports
    let geocoding_service = Arc::new(
        GeocodingService::new(&config.geocoding)
            .map_err(|e| anyhow::anyhow!("Failed to initialize geocoding: {}", e))?,
    );
    let directory: Arc<dyn ProviderDirectory> = provider_service.clone();
    let report_service = Arc::new(ReportService::new(
        pool.clone(),
        ReportRouter::new(directory),
        geocoding_service,
    ));
    tracing::info!(
        "Report services initialized (reverse geocoding {})",
        if config.geocoding.enabled {
            "enabled"
        } else {
            "disabled"
        }
    );

    let analytics_service = Arc::new(AnalyticsService::new(pool));
    tracing::info!("Analytics service initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Protected routes (require JWT authentication)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes(Arc::clone(&auth_service)))
        .merge(reports_routes::routes(
            Arc::clone(&report_service),
            Arc::clone(&provider_service),
            Arc::clone(&team_service),
        ))
        .merge(providers_routes::routes(Arc::clone(&provider_service)))
        .merge(teams_routes::routes(
            Arc::clone(&team_service),
            Arc::clone(&provider_service),
            Arc::clone(&employee_service),
            Arc::clone(&report_service),
        ))
        .merge(employees_routes::routes(
            employee_service,
            team_service,
            provider_service,
        ))
        .merge(analytics_routes::routes(analytics_service))
        .route_layer(axum::middleware::from_fn_with_state(
            jwt_validator,
            middleware::auth_middleware,
        ));

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    // Public routes (no auth required)
    let public_routes = Router::new().merge(auth_routes::public_routes(auth_service));

    Ok(Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(public_routes)
        .merge(health_route)
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tokio_test::{assert_err, assert_ok};
    use uuid::Uuid;

    use crate::features::auth::model::UserRole;
    use crate::shared::test_helpers::{test_auth_config, test_config, user_with_role, with_user};

    /// Pool that never connects; every request below is answered before touching it
    fn lazy_pool(config: &Config) -> PgPool {
        PgPoolOptions::new()
            .max_connections(1)
            .connect_lazy(&config.database.url)
            .unwrap()
    }

    fn server() -> TestServer {
        let config = test_config();
        let pool = lazy_pool(&config);
        TestServer::new(build_router(&config, pool).unwrap()).unwrap()
    }

    fn token_for(role: UserRole) -> String {
        let tokens = TokenService::new(&test_auth_config());
        let (token, _) = tokens
            .issue(Uuid::new_v4(), "someone@ayto.test", role)
            .unwrap();
        token
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let server = server();
        server.get("/health").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_protected_routes_require_a_valid_token() {
        let server = server();

        server
            .get("/ayto/reports")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        server
            .get("/ayto/reports")
            .authorization_bearer("not-a-jwt")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_analytics_is_government_only() {
        let server = server();

        let response = server
            .get("/ayto/analytics/summary")
            .authorization_bearer(token_for(UserRole::Resident))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
        let body: Value = response.json();
        assert_eq!(body["success"], json!(false));
        assert_eq!(
            body["message"],
            json!("You do not have permission to view analytics")
        );
    }

    #[tokio::test]
    async fn test_analytics_rejects_unknown_time_range() {
        let server = server();

        server
            .get("/ayto/analytics/trend")
            .add_query_param("timeRange", "decade")
            .authorization_bearer(token_for(UserRole::Government))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_report_submission_rules() {
        let server = server();
        let body = json!({
            "title": "Farola apagada",
            "description": "La farola de la esquina lleva una semana sin luz",
            "category": "POWER",
            "location": "40.4168,-3.7038"
        });

        server
            .post("/ayto/reports")
            .authorization_bearer(token_for(UserRole::Government))
            .json(&body)
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let mut bad_location = body.clone();
        bad_location["location"] = json!("north of the plaza");
        server
            .post("/ayto/reports")
            .authorization_bearer(token_for(UserRole::Resident))
            .json(&bad_location)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_permission_failures_map_to_forbidden() {
        let server = server();
        let resident = token_for(UserRole::Resident);

        server
            .get("/ayto/utility-provider/all")
            .authorization_bearer(&resident)
            .await
            .assert_status(StatusCode::FORBIDDEN);

        server
            .get(&format!("/ayto/reports/resident/{}", Uuid::new_v4()))
            .authorization_bearer(&resident)
            .await
            .assert_status(StatusCode::FORBIDDEN);

        server
            .post("/api/employees")
            .authorization_bearer(&resident)
            .json(&json!({
                "maintenance_team_id": Uuid::new_v4(),
                "first_name": "Lucia",
                "last_name": "Garrido"
            }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_empty_report_edit_is_rejected() {
        let server = server();

        let response = server
            .put(&format!("/ayto/reports/{}", Uuid::new_v4()))
            .authorization_bearer(token_for(UserRole::Resident))
            .json(&json!({}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], json!("No fields to update"));
    }

    #[tokio::test]
    async fn test_report_routes_with_injected_user() {
        let config = test_config();
        let pool = lazy_pool(&config);
        let providers = Arc::new(UtilityProviderService::new(pool.clone()));
        let geocoding = Arc::new(assert_ok!(GeocodingService::new(&config.geocoding)));
        let directory: Arc<dyn ProviderDirectory> = providers.clone();
        let reports = Arc::new(ReportService::new(
            pool.clone(),
            ReportRouter::new(directory),
            geocoding,
        ));
        let teams = Arc::new(MaintenanceTeamService::new(pool));

        let router = reports_routes::routes(reports, providers, teams);
        let server = TestServer::new(with_user(
            router,
            user_with_role(UserRole::MaintenanceTeam),
        ))
        .unwrap();

        let response = server
            .post("/ayto/reports")
            .json(&json!({
                "title": "Fuga",
                "description": "Agua en la calzada",
                "category": "WATER",
                "location": "40.4168,-3.7038"
            }))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(
            response.json::<Value>()["message"],
            json!("You do not have permission to access this report")
        );
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let config = test_config();
        let validator = JwtValidator::new(
            &config.auth.jwt_secret,
            config.auth.issuer.clone(),
            config.auth.jwt_leeway,
        );

        assert_err!(validator.validate_token("a.b.c"));
    }
}
