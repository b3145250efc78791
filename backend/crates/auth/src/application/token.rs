//! Session Token Service
//!
//! HS256 JWTs carrying the account id, role and expiry. Renewal is decided
//! by [`needs_refresh`] on every authenticated request.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use kernel::id::AccountId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::value_object::account_role::AccountRole;
use crate::error::{AuthError, AuthResult};

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: Uuid,
    pub role: AccountRole,
    pub iat: i64,
    pub exp: i64,
}

/// Freshly signed token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Result of a successful verification
#[derive(Debug, Clone, Copy)]
pub struct VerifiedToken {
    pub account_id: AccountId,
    pub role: AccountRole,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct TokenService {
    config: Arc<AuthConfig>,
}

impl TokenService {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    fn secret(&self) -> AuthResult<&[u8]> {
        self.config
            .jwt_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::as_bytes)
            .ok_or(AuthError::NotConfigured)
    }

    /// Fail early when tokens cannot be issued at all
    pub fn ensure_configured(&self) -> AuthResult<()> {
        self.secret().map(|_| ())
    }

    pub fn issue(&self, account_id: AccountId, role: AccountRole) -> AuthResult<IssuedToken> {
        self.issue_at(account_id, role, Utc::now())
    }

    /// Issue as if the current time were `now`
    pub fn issue_at(
        &self,
        account_id: AccountId,
        role: AccountRole,
        now: DateTime<Utc>,
    ) -> AuthResult<IssuedToken> {
        let secret = self.secret()?;
        let expires_at = now + Duration::seconds(self.config.token_ttl_secs());

        let claims = Claims {
            sub: account_id.into_uuid(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))?;

        Ok(IssuedToken { token, expires_at })
    }

    pub fn verify(&self, token: &str) -> AuthResult<VerifiedToken> {
        let secret = self.secret()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid,
            })?;

        let expires_at =
            DateTime::<Utc>::from_timestamp(data.claims.exp, 0).ok_or(AuthError::TokenInvalid)?;

        Ok(VerifiedToken {
            account_id: AccountId::from_uuid(data.claims.sub),
            role: data.claims.role,
            expires_at,
        })
    }
}

/// Still valid, but with at most `window` left
pub fn needs_refresh(
    expires_at: DateTime<Utc>,
    now: DateTime<Utc>,
    window: std::time::Duration,
) -> bool {
    let remaining = expires_at - now;
    let window = Duration::from_std(window).unwrap_or(Duration::MAX);
    remaining > Duration::zero() && remaining <= window
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(Arc::new(AuthConfig::with_secret("test-secret")))
    }

    #[test]
    fn test_issue_and_verify() {
        let svc = service();
        let id = AccountId::new();
        let issued = svc.issue(id, AccountRole::Admin).unwrap();

        let verified = svc.verify(&issued.token).unwrap();
        assert_eq!(verified.account_id, id);
        assert_eq!(verified.role, AccountRole::Admin);
        assert_eq!(verified.expires_at.timestamp(), issued.expires_at.timestamp());
    }

    #[test]
    fn test_missing_secret() {
        let svc = TokenService::new(Arc::new(AuthConfig::default()));
        assert!(matches!(
            svc.issue(AccountId::new(), AccountRole::User),
            Err(AuthError::NotConfigured)
        ));
        assert!(matches!(svc.verify("x.y.z"), Err(AuthError::NotConfigured)));
    }

    #[test]
    fn test_expired_token() {
        let svc = service();
        let long_ago = Utc::now() - Duration::days(8);
        let issued = svc.issue_at(AccountId::new(), AccountRole::User, long_ago).unwrap();
        assert!(matches!(svc.verify(&issued.token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let issued = service().issue(AccountId::new(), AccountRole::User).unwrap();
        let other = TokenService::new(Arc::new(AuthConfig::with_secret("other-secret")));
        assert!(matches!(other.verify(&issued.token), Err(AuthError::TokenInvalid)));
        assert!(matches!(other.verify("garbage"), Err(AuthError::TokenInvalid)));
    }

    #[test]
    fn test_needs_refresh() {
        let now = Utc::now();
        let window = std::time::Duration::from_secs(86_400);

        assert!(needs_refresh(now + Duration::hours(2), now, window));
        assert!(needs_refresh(now + Duration::hours(24), now, window));
        assert!(!needs_refresh(now + Duration::days(6), now, window));
        assert!(!needs_refresh(now - Duration::seconds(1), now, window));
    }
}
