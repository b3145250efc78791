//! HTTP Handlers

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use audit::AuditRecorder;
use kernel::extract::JsonBody;
use kernel::id::AccountId;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    AccountChanges, LoginInput, LoginUseCase, ManageAdminsUseCase, NewAccountInput,
    RegisterUseCase, UpdateProfileUseCase,
};
use crate::domain::entity::CurrentAccount;
use crate::domain::repository::AccountRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AccountChangesRequest, AccountResponse, AdminListResponse, AdminResponse, AuthResponse,
    LoginRequest, MessageResponse, NewAccountRequest, ProfileUpdatedResponse, UserResponse,
};
use crate::presentation::middleware::AuthGuard;
use crate::presentation::session_cookie::{clear_session_cookie, set_session_cookie};

/// Shared state for auth handlers
pub struct AuthAppState<R> {
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub audit: AuditRecorder,
}

impl<R> Clone for AuthAppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
            audit: self.audit.clone(),
        }
    }
}

impl<R> AuthAppState<R> {
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>, audit: AuditRecorder) -> Self {
        Self {
            repo,
            config,
            audit,
        }
    }

    /// Guard state over the same store and config
    pub fn guard(&self) -> AuthGuard<R> {
        AuthGuard::new(self.repo.clone(), self.config.clone())
    }
}

impl From<NewAccountRequest> for NewAccountInput {
    fn from(req: NewAccountRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
        }
    }
}

impl From<AccountChangesRequest> for AccountChanges {
    fn from(req: AccountChangesRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    JsonBody(req): JsonBody<NewAccountRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountRepository + Send + Sync + 'static,
{
    let output = RegisterUseCase::new(state.repo.clone(), state.config.clone())
        .execute(req.into())
        .await?;

    let cookie = set_session_cookie(&state.config, &headers, &output.token.token);

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            message: "User registered successfully",
            user: AccountResponse::from(&output.account),
            token: output.token.token,
        }),
    ))
}

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    JsonBody(req): JsonBody<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountRepository + Send + Sync + 'static,
{
    let output = LoginUseCase::new(state.repo.clone(), state.config.clone())
        .execute(LoginInput {
            username_or_email: req.username_or_email,
            password: req.password,
            account_type: req.account_type,
        })
        .await?;

    let cookie = set_session_cookie(&state.config, &headers, &output.token.token);

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            message: "Login successful",
            user: AccountResponse::from(&output.account),
            token: output.token.token,
        }),
    ))
}

/// POST /api/auth/logout
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> impl IntoResponse
where
    R: Send + Sync + 'static,
{
    let cookie = clear_session_cookie(&state.config, &headers);
    (
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse {
            message: "Logged out",
        }),
    )
}

/// GET /api/auth/me
pub async fn me(Extension(account): Extension<CurrentAccount>) -> Json<UserResponse> {
    Json(UserResponse {
        user: account.into(),
    })
}

/// PUT /api/auth/me
pub async fn update_me<R>(
    State(state): State<AuthAppState<R>>,
    Extension(account): Extension<CurrentAccount>,
    JsonBody(req): JsonBody<AccountChangesRequest>,
) -> AuthResult<Json<ProfileUpdatedResponse>>
where
    R: AccountRepository + Send + Sync + 'static,
{
    let updated = UpdateProfileUseCase::new(state.repo.clone(), state.config.clone())
        .execute(account.id, req.into())
        .await?;

    Ok(Json(ProfileUpdatedResponse {
        message: "Profile updated",
        user: AccountResponse::from(&updated),
    }))
}

// ============================================================================
// Staff management
// ============================================================================

fn admins<R>(state: &AuthAppState<R>) -> ManageAdminsUseCase<R>
where
    R: AccountRepository,
{
    ManageAdminsUseCase::new(state.repo.clone(), state.config.clone(), state.audit.clone())
}

fn parse_admin_id(raw: &str) -> AuthResult<AccountId> {
    AccountId::parse(raw).ok_or_else(|| AuthError::Validation("Invalid admin id".to_string()))
}

/// GET /api/admin/admins
pub async fn list_admins<R>(
    State(state): State<AuthAppState<R>>,
) -> AuthResult<Json<AdminListResponse>>
where
    R: AccountRepository + Send + Sync + 'static,
{
    let staff = admins(&state).list().await?;
    Ok(Json(AdminListResponse {
        admins: staff.iter().map(AccountResponse::from).collect(),
    }))
}

/// POST /api/admin/admins
pub async fn create_admin<R>(
    State(state): State<AuthAppState<R>>,
    Extension(actor): Extension<CurrentAccount>,
    JsonBody(req): JsonBody<NewAccountRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountRepository + Send + Sync + 'static,
{
    let admin = admins(&state).create(&actor, req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(AdminResponse {
            message: "Admin created",
            admin: AccountResponse::from(&admin),
        }),
    ))
}

/// PUT /api/admin/admins/{id}
pub async fn update_admin<R>(
    State(state): State<AuthAppState<R>>,
    Extension(actor): Extension<CurrentAccount>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<AccountChangesRequest>,
) -> AuthResult<Json<AdminResponse>>
where
    R: AccountRepository + Send + Sync + 'static,
{
    let id = parse_admin_id(&id)?;
    let admin = admins(&state).update(&actor, id, req.into()).await?;
    Ok(Json(AdminResponse {
        message: "Admin updated",
        admin: AccountResponse::from(&admin),
    }))
}

/// DELETE /api/admin/admins/{id}
pub async fn delete_admin<R>(
    State(state): State<AuthAppState<R>>,
    Extension(actor): Extension<CurrentAccount>,
    Path(id): Path<String>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AccountRepository + Send + Sync + 'static,
{
    let id = parse_admin_id(&id)?;
    admins(&state).delete(&actor, id).await?;
    Ok(Json(MessageResponse {
        message: "Admin deleted",
    }))
}
