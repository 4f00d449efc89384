//! Bearer-token authentication
//!
//! Login hands out an HS256 JWT carrying the user id; the `CurrentUser`
//! extractor checks it on every protected route.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;
use verdant_core::Error;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id as a string, the same shape clients already store
    id: String,
    exp: i64,
}

/// Issues and verifies login tokens.
pub struct TokenAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenAuthority {
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(ttl_days),
        }
    }

    /// Sign a token for the user, expiring after the configured TTL.
    pub fn issue(&self, user: Uuid) -> Result<String, ApiError> {
        let claims = Claims {
            id: user.to_string(),
            exp: (Utc::now() + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|e| {
            error!(error = %e, "token signing failed");
            ApiError::from(Error::store("token signing failed"))
        })
    }

    /// The user id inside a valid, unexpired token.
    pub fn verify(&self, token: &str) -> Option<Uuid> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default()).ok()?;
        Uuid::parse_str(&data.claims.id).ok()
    }
}

/// The authenticated caller. Handlers that take this extractor reject
/// unauthenticated requests before running.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Uuid);

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ApiError::unauthorized("No authorization header, access denied")
            })?;
        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::unauthorized("Invalid authorization format. Use Bearer token")
        })?;
        if token.is_empty() {
            return Err(ApiError::unauthorized("No token provided, access denied"));
        }
        let user = state
            .auth
            .verify(token)
            .ok_or_else(|| ApiError::unauthorized("Token is not valid"))?;
        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_then_verify_roundtrip() {
        let authority = TokenAuthority::new("test-secret", 30);
        let user = Uuid::new_v4();
        let token = authority.issue(user).unwrap();
        assert_eq!(authority.verify(&token), Some(user));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let signer = TokenAuthority::new("secret-a", 30);
        let checker = TokenAuthority::new("secret-b", 30);
        let token = signer.issue(Uuid::new_v4()).unwrap();
        assert_eq!(checker.verify(&token), None);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // A negative TTL backdates the expiry past the validation leeway.
        let authority = TokenAuthority::new("test-secret", -1);
        let token = authority.issue(Uuid::new_v4()).unwrap();
        assert_eq!(authority.verify(&token), None);
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let authority = TokenAuthority::new("test-secret", 30);
        assert_eq!(authority.verify("definitely-not-a-jwt"), None);
    }
}
