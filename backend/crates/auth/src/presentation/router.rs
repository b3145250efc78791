//! Auth Routers
//!
//! Staff routers come without role guards; the application layers
//! `require_admin_or_owner` / `require_owner` and then `require_auth`
//! around them.

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::domain::repository::AccountRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_auth;

/// `/api/auth`: register, login, logout are public; `/me` needs a session
pub fn auth_router<R>(state: AuthAppState<R>) -> Router
where
    R: AccountRepository + Send + Sync + 'static,
{
    let guard = state.guard();

    let session = Router::new()
        .route("/me", get(handlers::me).put(handlers::update_me::<R>))
        .route_layer(middleware::from_fn_with_state(guard, require_auth::<R>))
        .with_state(state.clone());

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/logout", post(handlers::logout::<R>))
        .with_state(state)
        .merge(session)
}

/// `GET/POST /admins` (admin-or-owner)
pub fn admin_staff_router<R>(state: AuthAppState<R>) -> Router
where
    R: AccountRepository + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/admins",
            get(handlers::list_admins::<R>).post(handlers::create_admin::<R>),
        )
        .with_state(state)
}

/// `PUT/DELETE /admins/{id}` (owner-only)
pub fn admin_owner_router<R>(state: AuthAppState<R>) -> Router
where
    R: AccountRepository + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/admins/{id}",
            put(handlers::update_admin::<R>).delete(handlers::delete_admin::<R>),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use audit::{AuditRecorder, MemoryAuditRepository};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use chrono::{Duration, Utc};
    use tower::ServiceExt;

    use crate::application::config::AuthConfig;
    use crate::application::register::{NewAccountInput, create_account};
    use crate::application::token::TokenService;
    use crate::domain::value_object::account_role::AccountRole;
    use crate::infra::memory::MemoryAccountRepository;
    use crate::presentation::middleware::{require_admin_or_owner, require_owner};

    fn state() -> AuthAppState<MemoryAccountRepository> {
        AuthAppState::new(
            Arc::new(MemoryAccountRepository::new()),
            Arc::new(AuthConfig::with_random_secret()),
            AuditRecorder::new(Arc::new(MemoryAuditRepository::new())),
        )
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn with_cookie(mut req: Request<Body>, cookie: &str) -> Request<Body> {
        req.headers_mut()
            .insert(header::COOKIE, cookie.parse().unwrap());
        req
    }

    /// `token=<value>` part of a Set-Cookie header
    fn session_cookie(response: &axum::response::Response) -> String {
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    /// Staff routes guarded the way the API binary does it
    fn admin_app(state: AuthAppState<MemoryAccountRepository>) -> Router {
        let guard = state.guard();
        admin_staff_router(state.clone())
            .route_layer(middleware::from_fn(require_admin_or_owner))
            .merge(
                admin_owner_router(state)
                    .route_layer(middleware::from_fn(require_owner)),
            )
            .route_layer(middleware::from_fn_with_state(
                guard,
                require_auth::<MemoryAccountRepository>,
            ))
    }

    #[tokio::test]
    async fn test_register_me_logout() {
        let app = auth_router(state());

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/register",
                serde_json::json!({"username": "alice", "email": "Alice@X.com", "password": "password1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let cookie = session_cookie(&response);
        let json = body_json(response).await;
        assert_eq!(json["message"], "User registered successfully");
        assert_eq!(json["user"]["email"], "alice@x.com");
        assert_eq!(json["user"]["role"], "user");
        assert!(json["user"].get("password").is_none());

        let response = app
            .clone()
            .oneshot(with_cookie(
                Request::builder().uri("/me").body(Body::empty()).unwrap(),
                &cookie,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["user"]["username"], "alice");

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/logout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cleared = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cleared.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_token_near_expiry_is_renewed_on_response() {
        let state = state();
        let account = create_account(
            state.repo.as_ref(),
            &state.config,
            NewAccountInput {
                username: Some("alice".into()),
                email: Some("alice@x.com".into()),
                password: Some("password1".into()),
            },
            AccountRole::User,
        )
        .await
        .unwrap();
        let tokens = TokenService::new(state.config.clone());
        let app = auth_router(state.clone());
        let cookie_name = state.config.cookie_name.clone();

        // 12 hours left of a 7 day token
        let aging = tokens
            .issue_at(account.id, account.role, Utc::now() - Duration::hours(156))
            .unwrap();
        let response = app
            .clone()
            .oneshot(with_cookie(
                Request::builder().uri("/me").body(Body::empty()).unwrap(),
                &format!("{cookie_name}={}", aging.token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let renewed = session_cookie(&response);
        assert!(renewed.starts_with(&format!("{cookie_name}=")));
        assert_ne!(renewed, format!("{cookie_name}={}", aging.token));

        let fresh = tokens.issue(account.id, account.role).unwrap();
        let response = app
            .oneshot(with_cookie(
                Request::builder().uri("/me").body(Body::empty()).unwrap(),
                &format!("{cookie_name}={}", fresh.token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_me_requires_token() {
        let response = auth_router(state())
            .oneshot(Request::builder().uri("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["message"], "Not authorized: no token");
    }

    #[tokio::test]
    async fn test_login_sets_cookie() {
        let state = state();
        create_account(
            state.repo.as_ref(),
            &state.config,
            NewAccountInput {
                username: Some("alice".into()),
                email: Some("alice@x.com".into()),
                password: Some("password1".into()),
            },
            AccountRole::User,
        )
        .await
        .unwrap();

        let response = auth_router(state)
            .oneshot(json_request(
                "POST",
                "/login",
                serde_json::json!({"usernameOrEmail": "alice", "password": "password1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(session_cookie(&response).starts_with("token="));
        assert_eq!(body_json(response).await["message"], "Login successful");
    }

    #[tokio::test]
    async fn test_staff_guards() {
        let state = state();
        let config = state.config.clone();
        let repo = state.repo.clone();
        let tokens = crate::application::TokenService::new(config.clone());

        let mut cookies = Vec::new();
        for (name, role) in [
            ("joe", AccountRole::User),
            ("mia", AccountRole::Admin),
            ("boss", AccountRole::Owner),
        ] {
            let account = create_account(
                repo.as_ref(),
                &config,
                NewAccountInput {
                    username: Some(name.into()),
                    email: Some(format!("{name}@x.com")),
                    password: Some("password1".into()),
                },
                role,
            )
            .await
            .unwrap();
            let token = tokens.issue(account.id, account.role).unwrap();
            cookies.push((account, format!("token={}", token.token)));
        }

        let app = admin_app(state);
        let list = |cookie: &str| {
            with_cookie(
                Request::builder().uri("/admins").body(Body::empty()).unwrap(),
                cookie,
            )
        };

        let response = app.clone().oneshot(list(&cookies[0].1)).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app.clone().oneshot(list(&cookies[1].1)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["admins"].as_array().unwrap().len(), 2);

        // Admin cannot delete admins; owner can
        let admin_id = cookies[1].0.id;
        let delete = |cookie: &str| {
            with_cookie(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/admins/{admin_id}"))
                    .body(Body::empty())
                    .unwrap(),
                cookie,
            )
        };
        let response = app.clone().oneshot(delete(&cookies[1].1)).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app.clone().oneshot(delete(&cookies[2].1)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["message"], "Admin deleted");

        let response = app
            .oneshot(with_cookie(
                Request::builder()
                    .method("DELETE")
                    .uri("/admins/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
                &cookies[2].1,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Invalid admin id");
    }
}
