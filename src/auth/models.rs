use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
use std::env;
use uuid::Uuid;

use crate::utils::ApiError;

/// Claims minted by the external identity service. This service only
/// verifies and reads them; it never issues tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    pub sub: Uuid,
    #[serde(default)]
    pub role: String,
    pub exp: usize,
}

impl AccessTokenClaims {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::NotAuthorized(
                "administrator privileges required".to_owned(),
            ))
        }
    }
}

impl<S> FromRequestParts<S> for AccessTokenClaims
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::NotAuthorized("missing bearer token".to_owned()))?;

        let secret =
            env::var("JWT_SECRET").map_err(|e| ApiError::Internal(format!("JWT_SECRET: {}", e)))?;

        let data = decode::<AccessTokenClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| ApiError::NotAuthorized(format!("invalid token: {}", e)))?;

        Ok(data.claims)
    }
}
