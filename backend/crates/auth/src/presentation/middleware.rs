//! Auth Middleware
//!
//! `require_auth` resolves the session cookie to a [`CurrentAccount`] and
//! places it in request extensions. The role guards run after it and only
//! read that extension.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

use crate::application::AuthenticateUseCase;
use crate::application::config::AuthConfig;
use crate::domain::entity::CurrentAccount;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::access_policy::AccessPolicy;
use crate::error::AuthError;
use crate::presentation::session_cookie::set_session_cookie;

/// Middleware state
pub struct AuthGuard<R> {
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> AuthGuard<R> {
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }
}

impl<R> Clone for AuthGuard<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

/// Middleware that requires a valid session token
///
/// A token close to expiry is re-issued and returned as a fresh cookie on
/// the response.
pub async fn require_auth<R>(
    State(guard): State<AuthGuard<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    R: AccountRepository + Send + Sync + 'static,
{
    let token = platform::cookie::extract_cookie(req.headers(), &guard.config.cookie_name)
        .ok_or(AuthError::MissingToken)?;

    let authenticated = AuthenticateUseCase::new(guard.repo.clone(), guard.config.clone())
        .execute(&token)
        .await?;

    let renewal = authenticated
        .renewed
        .map(|issued| set_session_cookie(&guard.config, req.headers(), &issued.token));

    req.extensions_mut().insert(authenticated.account);
    let mut response = next.run(req).await;

    if let Some(cookie) = renewal {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }

    Ok(response)
}

/// Staff only; must be layered inside [`require_auth`]
pub async fn require_admin_or_owner(req: Request, next: Next) -> Result<Response, AuthError> {
    check_policy(&req, AccessPolicy::AdminOrOwner)?;
    Ok(next.run(req).await)
}

/// Owner only; must be layered inside [`require_auth`]
pub async fn require_owner(req: Request, next: Next) -> Result<Response, AuthError> {
    check_policy(&req, AccessPolicy::OwnerOnly)?;
    Ok(next.run(req).await)
}

fn check_policy(req: &Request, policy: AccessPolicy) -> Result<(), AuthError> {
    let account = req
        .extensions()
        .get::<CurrentAccount>()
        .ok_or(AuthError::MissingToken)?;
    policy.check(account.role)
}
