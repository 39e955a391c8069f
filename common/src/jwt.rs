use actix_web::{HttpMessage, HttpResponse, dev::ServiceRequest};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    env_config::JwtConfig,
    error::{AppError, Res},
    misc::StaffRole,
};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JwtClaims {
    pub user_id: i32,
    pub username: String,
    pub role: StaffRole,
    /// Unique per login, doubles as the session id.
    pub jti: Uuid,
    pub exp: usize,
}

pub struct ClaimsSpec {
    pub user_id: i32,
    pub username: String,
    pub role: StaffRole,
}

/// Generates JWT token based on staff user data and JWT configuration options
pub fn generate_jwt(spec: ClaimsSpec, config: &JwtConfig) -> Res<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(config.expiration_hours))
        .ok_or_else(|| AppError::Internal("Session expiry out of range".to_string()))?
        .timestamp();

    let claims = JwtClaims {
        user_id: spec.user_id,
        username: spec.username,
        role: spec.role,
        jti: Uuid::new_v4(),
        exp: expiration as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(AppError::from)
}

/// Extracts claims object from JWT token.
/// Requires JWT secret.
pub fn validate_jwt(token: &str, secret: &str) -> Res<JwtClaims> {
    let token_data = jsonwebtoken::decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired session".to_string()))?;
    Ok(token_data.claims)
}

pub fn get_jwt_claims_or_error(req: &ServiceRequest) -> Result<JwtClaims, HttpResponse> {
    if let Some(jwt_claims_res) = req.extensions().get::<Res<JwtClaims>>() {
        match jwt_claims_res {
            Ok(claims) => Ok(claims.clone()),
            Err(app_error) => Err(app_error.to_http_response()),
        }
    } else {
        Err(
            AppError::Unauthorized("No authorization token provided".to_string())
                .to_http_response(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "0123456789abcdef0123456789abcdef".to_string(),
            expiration_hours: 8,
        }
    }

    #[test]
    fn issued_token_validates() {
        let token = generate_jwt(
            ClaimsSpec {
                user_id: 7,
                username: "frontdesk".to_string(),
                role: StaffRole::Staff,
            },
            &config(),
        )
        .unwrap();

        let claims = validate_jwt(&token, &config().secret).unwrap();
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.username, "frontdesk");
        assert_eq!(claims.role, StaffRole::Staff);
    }

    #[test]
    fn token_signed_with_other_secret_is_unauthorized() {
        let token = generate_jwt(
            ClaimsSpec {
                user_id: 1,
                username: "admin".to_string(),
                role: StaffRole::Admin,
            },
            &config(),
        )
        .unwrap();

        let result = validate_jwt(&token, "another-secret-another-secret-xx");
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
