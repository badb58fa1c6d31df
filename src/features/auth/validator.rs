use super::model::{AuthenticatedUser, Claims};
use crate::core::error::AppError;
use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::time::Duration;
use uuid::Uuid;

/// Returns true once `now` is past the token's expiry plus `leeway` seconds
pub fn is_expired(claims: &Claims, now: i64, leeway: u64) -> bool {
    now > claims.exp.saturating_add(leeway as i64)
}

pub struct JwtValidator {
    decoding_key: DecodingKey,
    issuer: String,
    leeway: u64,
}

impl JwtValidator {
    pub fn new(secret: &str, issuer: String, leeway: Duration) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            leeway: leeway.as_secs(),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        self.validate_token_at(token, Utc::now().timestamp())
    }

    /// Validate signature and issuer, then check expiry against `now`
    pub fn validate_token_at(&self, token: &str, now: i64) -> Result<AuthenticatedUser, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        // Expiry is checked below against an explicit clock
        validation.validate_exp = false;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?
            .claims;

        if is_expired(&claims, now, self.leeway) {
            return Err(AppError::Auth("Token has expired".to_string()));
        }

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Auth("Invalid subject claim".to_string()))?;

        Ok(AuthenticatedUser {
            user_id,
            email: claims.email,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::UserRole;
    use crate::features::auth::services::TokenService;
    use crate::shared::test_helpers::{test_auth_config, TEST_JWT_SECRET};

    fn claims_expiring_at(exp: i64) -> Claims {
        Claims {
            sub: Uuid::new_v4().to_string(),
            email: "vecino@example.com".to_string(),
            role: UserRole::Resident,
            iss: "ayto-test".to_string(),
            iat: exp - 3600,
            exp,
        }
    }

    #[test]
    fn test_is_expired_respects_leeway() {
        let claims = claims_expiring_at(1_000);

        assert!(!is_expired(&claims, 999, 0));
        assert!(!is_expired(&claims, 1_000, 0));
        assert!(is_expired(&claims, 1_001, 0));
        assert!(!is_expired(&claims, 1_050, 60));
        assert!(is_expired(&claims, 1_061, 60));
    }

    #[test]
    fn test_issued_token_validates() {
        let config = test_auth_config();
        let tokens = TokenService::new(&config);
        let validator =
            JwtValidator::new(TEST_JWT_SECRET, config.issuer.clone(), config.jwt_leeway);

        let user_id = Uuid::new_v4();
        let (token, _) = tokens
            .issue(user_id, "gob@example.com", UserRole::Government)
            .unwrap();

        let user = validator.validate_token(&token).unwrap();
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.role, UserRole::Government);
        assert_eq!(user.email, "gob@example.com");
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = test_auth_config();
        let tokens = TokenService::new(&config);
        let validator =
            JwtValidator::new(TEST_JWT_SECRET, config.issuer.clone(), config.jwt_leeway);

        let (token, expires_in) = tokens
            .issue(Uuid::new_v4(), "a@example.com", UserRole::Resident)
            .unwrap();

        let far_future = Utc::now().timestamp() + expires_in + 3600;
        assert!(matches!(
            validator.validate_token_at(&token, far_future),
            Err(AppError::Auth(_))
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = test_auth_config();
        let tokens = TokenService::new(&config);
        let validator = JwtValidator::new(
            "a-completely-different-secret-of-32-chars",
            config.issuer.clone(),
            config.jwt_leeway,
        );

        let (token, _) = tokens
            .issue(Uuid::new_v4(), "a@example.com", UserRole::Resident)
            .unwrap();

        assert!(validator.validate_token(&token).is_err());
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let config = test_auth_config();
        let tokens = TokenService::new(&config);
        let validator = JwtValidator::new(
            TEST_JWT_SECRET,
            "someone-else".to_string(),
            config.jwt_leeway,
        );

        let (token, _) = tokens
            .issue(Uuid::new_v4(), "a@example.com", UserRole::Resident)
            .unwrap();

        assert!(validator.validate_token(&token).is_err());
    }
}
