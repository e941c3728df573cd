use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::modules::accounts::model::Claims;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_token;

/// Extractor that validates the bearer token and exposes the caller's
/// claims. Every route except login and health requires it; all token
/// problems surface as the same 401.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// The account id carried in the token subject.
    pub fn account_id(&self) -> Result<i64, AppError> {
        self.0
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::unauthorized(anyhow::anyhow!("Invalid subject in token")))
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::unauthorized(anyhow::anyhow!("Missing authorization header"))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized(anyhow::anyhow!("Invalid authorization header format"))
        })?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_with_sub(sub: &str) -> Claims {
        Claims {
            sub: sub.to_string(),
            email: "admin@example.com".to_string(),
            iss: "campus-api".to_string(),
            aud: "campus-admin".to_string(),
            iat: 1_700_000_000,
            exp: 9_999_999_999,
        }
    }

    #[test]
    fn account_id_parses_numeric_subject() {
        let auth = AuthUser(claims_with_sub("42"));
        assert_eq!(auth.account_id().unwrap(), 42);
    }

    #[test]
    fn account_id_rejects_non_numeric_subject() {
        let auth = AuthUser(claims_with_sub("not-a-number"));
        assert!(auth.account_id().is_err());
    }
}
