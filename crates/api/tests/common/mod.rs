#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use url::Url;

use raze_api::auth::jwt::JwtConfig;
use raze_api::auth::oauth::{
    ExternalIdentity, IdentityProvider, OAuthConfig, OAuthError,
};
use raze_api::auth::session_events::SessionEventBus;
use raze_api::config::ServerConfig;
use raze_api::router::build_app_router;
use raze_api::state::AppState;
use raze_core::progress::ProgressStore;
use raze_core::wizard::WizardConfig;
use raze_db::progress_store::PgProgressStore;

/// Email that is granted the admin role in tests.
pub const ADMIN_EMAIL: &str = "admin@raze.test";

/// Authorization code the fake provider rejects.
pub const REJECTED_CODE: &str = "rejected";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        session_cleanup_interval_secs: 3600,
        public_base_url: "http://localhost:3000".to_string(),
        admin_emails: vec![ADMIN_EMAIL.to_string()],
        wizard: WizardConfig::default(),
        jwt: JwtConfig {
            secret: "test-secret-with-enough-entropy".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 30,
        },
        oauth: OAuthConfig {
            provider_name: "fake".to_string(),
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            authorize_url: "https://idp.test/authorize".to_string(),
            token_url: "https://idp.test/token".to_string(),
            userinfo_url: "https://idp.test/userinfo".to_string(),
            scopes: "openid email".to_string(),
        },
    }
}

/// Identity provider that treats the authorization code as the subject.
///
/// Code `alice` signs in `alice@raze.test`; code `admin` signs in
/// [`ADMIN_EMAIL`]; [`REJECTED_CODE`] fails like a provider error would.
pub struct FakeIdentityProvider;

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    fn authorize_url(&self, redirect_uri: &str, state: &str) -> Result<Url, OAuthError> {
        Ok(Url::parse_with_params(
            "https://idp.test/authorize",
            &[("redirect_uri", redirect_uri), ("state", state)],
        )?)
    }

    async fn exchange_code(
        &self,
        code: &str,
        _redirect_uri: &str,
    ) -> Result<ExternalIdentity, OAuthError> {
        if code == REJECTED_CODE {
            return Err(OAuthError::Provider {
                status: 400,
                body: "invalid_grant".to_string(),
            });
        }
        Ok(ExternalIdentity {
            provider: "fake".to_string(),
            subject: format!("sub-{code}"),
            email: format!("{code}@raze.test"),
            display_name: Some(code.to_string()),
            avatar_url: None,
        })
    }
}

/// Build the full application router backed by PostgreSQL progress storage.
pub fn build_test_app(pool: PgPool) -> Router {
    let store = Arc::new(PgProgressStore::new(pool.clone()));
    build_test_app_with_store(pool, store)
}

/// Build the application with a custom progress store (e.g. one that fails).
pub fn build_test_app_with_store(pool: PgPool, store: Arc<dyn ProgressStore>) -> Router {
    build_test_app_with(pool, test_config(), store)
}

pub fn build_test_app_with(
    pool: PgPool,
    config: ServerConfig,
    store: Arc<dyn ProgressStore>,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        identity_provider: Arc::new(FakeIdentityProvider),
        progress_store: store,
        session_events: Arc::new(SessionEventBus::default()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_with_cookie(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("cookie", cookie)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PATCH, uri, token, Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Sign-in helpers
// ---------------------------------------------------------------------------

/// Tokens of a completed sign-in.
pub struct SignedIn {
    pub access_token: String,
    pub refresh_token: String,
    pub identity_id: i64,
    pub callback: serde_json::Value,
}

/// A sign-in redirect as the browser would follow it.
#[derive(Clone)]
pub struct PendingSignIn {
    /// Callback URL handed to the provider.
    pub redirect_uri: String,
    /// Signed `state` handed to the provider.
    pub state: String,
    /// `name=value` of the nonce cookie set by the redirect.
    pub cookie: String,
}

/// Follow `GET uri` (a sign-in URL) and capture what the provider and the
/// browser were given.
pub async fn start_sign_in(app: Router, uri: &str) -> PendingSignIn {
    let response = get(app, uri).await;
    assert_eq!(response.status(), axum::http::StatusCode::SEE_OTHER);

    let cookie = response.headers()["set-cookie"]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();
    let location = Url::parse(response.headers()["location"].to_str().unwrap()).unwrap();
    let param = |name: &str| {
        location
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
            .unwrap()
    };
    PendingSignIn {
        redirect_uri: param("redirect_uri"),
        state: param("state"),
        cookie,
    }
}

/// Come back from the provider with `code`, as the browser would.
pub async fn finish_sign_in(app: Router, pending: &PendingSignIn, code: &str) -> Response<Body> {
    let mut callback = Url::parse(&pending.redirect_uri).unwrap();
    callback
        .query_pairs_mut()
        .append_pair("code", code)
        .append_pair("state", &pending.state);
    let uri = format!("{}?{}", callback.path(), callback.query().unwrap());
    get_with_cookie(app, &uri, &pending.cookie).await
}

/// Sign in through the redirect and callback with the given fake code.
pub async fn sign_in(app: Router, code: &str) -> SignedIn {
    let pending = start_sign_in(app.clone(), "/api/v1/auth/sign-in").await;
    let response = finish_sign_in(app, &pending, code).await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let json = body_json(response).await;
    SignedIn {
        access_token: json["access_token"].as_str().unwrap().to_string(),
        refresh_token: json["refresh_token"].as_str().unwrap().to_string(),
        identity_id: json["identity"]["id"].as_i64().unwrap(),
        callback: json,
    }
}
