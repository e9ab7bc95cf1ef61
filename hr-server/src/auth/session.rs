//! Session tokens
//!
//! HS256 JWTs carrying the user id and role. The token is the only session
//! state; nothing is stored server-side.

use std::sync::Arc;

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use shared::error::AppError;
use shared::models::Role;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated caller resolved from a session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
}

impl TryFrom<Claims> for Caller {
    type Error = AppError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id = claims
            .sub
            .parse()
            .map_err(|_| AppError::invalid_token("Malformed subject claim"))?;
        Ok(Self {
            user_id,
            email: claims.email,
            role: claims.role,
        })
    }
}

/// Signing and verification keys plus token lifetime
#[derive(Clone)]
pub struct SessionKeys {
    inner: Arc<KeysInner>,
}

struct KeysInner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_hours: i64,
}

impl SessionKeys {
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        Self {
            inner: Arc::new(KeysInner {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
                expiry_hours,
            }),
        }
    }

    pub fn expiry_hours(&self) -> i64 {
        self.inner.expiry_hours
    }

    /// Issue a token for a user
    pub fn issue(&self, user_id: i64, email: &str, role: Role) -> Result<String, AppError> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            exp: (now + chrono::Duration::hours(self.inner.expiry_hours)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.inner.encoding).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign session token");
            AppError::internal("Failed to issue session token")
        })
    }

    /// Validate signature and expiry, returning the caller
    ///
    /// Expired tokens map to `TokenExpired`, anything else to `TokenInvalid`.
    pub fn verify(&self, token: &str) -> Result<Caller, AppError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        let data = jsonwebtoken::decode::<Claims>(token, &self.inner.decoding, &validation)
            .map_err(|e| {
                tracing::debug!("JWT validation failed: {e}");
                match e.kind() {
                    ErrorKind::ExpiredSignature => AppError::token_expired(),
                    _ => AppError::invalid_token("Invalid token"),
                }
            })?;
        Caller::try_from(data.claims)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` value
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    #[test]
    fn test_issue_and_verify() {
        let keys = SessionKeys::new("test-secret", 1);
        let token = keys.issue(42, "ada@example.com", Role::Hr).unwrap();
        let caller = keys.verify(&token).unwrap();
        assert_eq!(
            caller,
            Caller {
                user_id: 42,
                email: "ada@example.com".into(),
                role: Role::Hr
            }
        );
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = SessionKeys::new("one", 1).issue(1, "a@b.c", Role::Admin).unwrap();
        let err = SessionKeys::new("two", 1).verify(&token).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }

    #[test]
    fn test_expired_token() {
        let keys = SessionKeys::new("test-secret", -1);
        let token = keys.issue(1, "a@b.c", Role::Employee).unwrap();
        let err = keys.verify(&token).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenExpired);
    }

    #[test]
    fn test_garbage_token() {
        let err = SessionKeys::new("s", 1).verify("not.a.jwt").unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic abc"), None);
    }
}
