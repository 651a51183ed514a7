//! Handlers for the `/auth` resource (OAuth sign-in, session, refresh,
//! sign-out, session-change stream).

use std::convert::Infallible;

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderName, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Redirect};
use axum::Json;
use chrono::Utc;
use futures::stream::{self, Stream, StreamExt};
use raze_core::error::CoreError;
use raze_core::progress::ProgressAdapter;
use raze_core::return_action::ReturnAction;
use raze_core::roles::role_for_email;
use raze_core::types::DbId;
use raze_db::models::identity::{Identity, UpsertIdentity};
use raze_db::models::session::CreateSession;
use raze_db::repositories::{IdentityRepo, SessionRepo};
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use url::form_urlencoded;

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::oauth_state::{
    clear_state_cookie, issue_state, nonce_from_cookies, state_cookie, verify_state,
};
use crate::auth::session_events::SessionEvent;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

/// Path of the callback endpoint, relative to the public base URL.
const CALLBACK_PATH: &str = "/api/v1/auth/callback";

/// Path of the sign-in endpoint, as handed to clients.
const SIGN_IN_PATH: &str = "/api/v1/auth/sign-in";

/// `Clear-Site-Data` value sent on sign-out.
const CLEAR_SITE_DATA: &str = "\"cookies\", \"storage\"";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query for `GET /auth/sign-in`.
#[derive(Debug, Deserialize)]
pub struct SignInQuery {
    #[serde(rename = "returnTo")]
    pub return_to: Option<String>,
}

/// Query for `GET /auth/callback`.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    /// Set by the provider when the user declined or the request was bad.
    pub error: Option<String>,
    /// Echo of the signed state issued by `sign-in`.
    pub state: Option<String>,
    #[serde(rename = "returnTo")]
    pub return_to: Option<String>,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Query for `GET /auth/events`.
#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    /// Access token; `EventSource` cannot send an `Authorization` header.
    pub token: Option<String>,
}

/// Public identity info.
#[derive(Debug, Serialize)]
pub struct IdentityInfo {
    pub id: DbId,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: String,
}

impl From<Identity> for IdentityInfo {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id,
            email: identity.email,
            display_name: identity.display_name,
            avatar_url: identity.avatar_url,
            role: identity.role,
        }
    }
}

/// Tokens plus the identity they were issued for.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub identity: IdentityInfo,
}

/// Response of a completed sign-in.
#[derive(Debug, Serialize)]
pub struct CallbackResponse {
    #[serde(flatten)]
    pub auth: AuthResponse,
    /// What the client should do now, if sign-in was started with one.
    pub return_action: Option<ReturnAction>,
    /// Last saved navigation path, or `/`.
    pub redirect_path: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/auth/sign-in
///
/// Redirect the browser to the provider. An optional `returnTo` action is
/// carried through the callback URL. The signed OAuth `state` nonce is also
/// set as a cookie for the callback to match.
pub async fn sign_in(
    State(state): State<AppState>,
    Query(query): Query<SignInQuery>,
) -> AppResult<impl IntoResponse> {
    let (oauth_state, nonce) = issue_state(&state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("State generation error: {e}")))?;
    let callback = callback_url(&state, query.return_to.as_deref());
    let url = state
        .identity_provider
        .authorize_url(&callback, &oauth_state)
        .map_err(|e| AppError::AuthFailed(e.to_string()))?;

    let secure = state.config.public_base_url.starts_with("https://");
    tracing::debug!(callback = %callback, "Redirecting to identity provider");
    Ok((
        [(header::SET_COOKIE, state_cookie(&nonce, secure))],
        Redirect::to(url.as_str()),
    ))
}

/// GET /api/v1/auth/callback
///
/// Complete sign-in: check the state against the nonce cookie, exchange the
/// code, record the identity, issue tokens and report where the client
/// should go next. A completed sign-in clears the nonce cookie.
pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    if let Some(error) = query.error {
        return Err(AppError::AuthFailed(format!("Provider returned: {error}")));
    }
    verify_state(
        query.state.as_deref(),
        nonce_from_cookies(&headers).as_deref(),
        &state.config.jwt,
    )
    .map_err(|e| {
        tracing::warn!(error = %e, "Rejected OAuth callback");
        AppError::AuthFailed(e.to_string())
    })?;
    let code = query
        .code
        .ok_or_else(|| AppError::AuthFailed("Missing authorization code".into()))?;

    let callback = callback_url(&state, query.return_to.as_deref());
    let external = state
        .identity_provider
        .exchange_code(&code, &callback)
        .await
        .map_err(|e| AppError::AuthFailed(e.to_string()))?;

    let role = role_for_email(&external.email, &state.config.admin_emails);
    let identity = IdentityRepo::upsert(
        &state.pool,
        &UpsertIdentity {
            provider: external.provider,
            subject: external.subject,
            email: external.email,
            display_name: external.display_name,
            avatar_url: external.avatar_url,
            role: role.to_string(),
        },
    )
    .await?;

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let auth = issue_tokens(&state, identity, user_agent).await?;
    let identity_id = auth.identity.id;

    state
        .session_events
        .publish(SessionEvent::signed_in(identity_id));

    let return_action = query.return_to.as_deref().and_then(|raw| {
        ReturnAction::parse(raw)
            .map_err(|e| tracing::warn!(error = %e, raw, "Ignoring malformed return action"))
            .ok()
    });

    let saved = ProgressAdapter::new(state.progress_store.as_ref())
        .load(identity_id)
        .await;
    let redirect_path = saved.path.unwrap_or_else(|| "/".to_string());

    tracing::info!(identity_id, ?return_action, redirect_path = %redirect_path, "Identity signed in");

    Ok((
        [(header::SET_COOKIE, clear_state_cookie())],
        Json(CallbackResponse {
            auth,
            return_action,
            redirect_path,
        }),
    ))
}

/// GET /api/v1/auth/session
///
/// The signed-in identity, or `null` when signed out.
pub async fn session(
    State(state): State<AppState>,
    user: MaybeAuthUser,
) -> AppResult<Json<DataResponse<Option<IdentityInfo>>>> {
    let identity = match user.0 {
        Some(user) => IdentityRepo::find_by_id(&state.pool, user.identity_id)
            .await?
            .map(IdentityInfo::from),
        None => None,
    };
    Ok(Json(DataResponse { data: identity }))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    // Rotation: the presented token is single-use.
    SessionRepo::revoke(&state.pool, session.id).await?;

    let identity = IdentityRepo::find_by_id(&state.pool, session.identity_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Identity no longer exists".into()))
        })?;

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let response = issue_tokens(&state, identity, user_agent).await?;

    Ok(Json(response))
}

/// POST /api/v1/auth/sign-out
///
/// Revoke every session of the identity. Returns 204 with `Clear-Site-Data`.
pub async fn sign_out(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let revoked = SessionRepo::revoke_all_for_identity(&state.pool, user.identity_id).await?;
    state
        .session_events
        .publish(SessionEvent::signed_out(user.identity_id));

    tracing::info!(identity_id = user.identity_id, revoked, "Identity signed out");

    Ok((
        StatusCode::NO_CONTENT,
        [(HeaderName::from_static("clear-site-data"), CLEAR_SITE_DATA)],
    ))
}

/// GET /api/v1/auth/events
///
/// Server-sent stream of the caller's own sign-in / sign-out events. The
/// token comes from `?token=` or the `Authorization` header. The bus
/// subscription is dropped with the stream.
pub async fn events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
    headers: HeaderMap,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let token = query
        .token
        .or_else(|| extract_bearer_token(&headers))
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Missing access token".into()))
        })?;
    let user = AuthUser::from_token(&token, &state)?;
    let identity_id = user.identity_id;

    let rx = state.session_events.subscribe();
    tracing::debug!(identity_id, "Session event stream opened");

    let connected =
        stream::once(async { Ok::<_, Infallible>(Event::default().event("connected").data("ok")) });

    let events = BroadcastStream::new(rx).filter_map(move |result| async move {
        match result {
            Ok(event) if event.identity_id() == identity_id => Event::default()
                .event(event.name())
                .json_data(&event)
                .ok()
                .map(Ok),
            Ok(_) => None,
            Err(BroadcastStreamRecvError::Lagged(n)) => Event::default()
                .event("lagged")
                .json_data(serde_json::json!({ "missed": n }))
                .ok()
                .map(Ok),
        }
    });

    Ok(Sse::new(connected.chain(events)).keep_alive(KeepAlive::default()))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Relative URL of the sign-in endpoint, with the return action encoded
/// into `returnTo` when given.
pub fn sign_in_path(action: Option<ReturnAction>) -> String {
    match action {
        Some(action) => {
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair("returnTo", &action.to_param())
                .finish();
            format!("{SIGN_IN_PATH}?{query}")
        }
        None => SIGN_IN_PATH.to_string(),
    }
}

/// Absolute callback URL. Must be identical for the authorization redirect
/// and the code exchange.
fn callback_url(state: &AppState, return_to: Option<&str>) -> String {
    let base = format!("{}{CALLBACK_PATH}", state.config.public_base_url);
    match return_to {
        Some(raw) => {
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair("returnTo", raw)
                .finish();
            format!("{base}?{query}")
        }
        None => base,
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    auth.strip_prefix("Bearer ").map(str::to_string)
}

/// Generate access + refresh tokens, persist a session row, and build the response.
async fn issue_tokens(
    state: &AppState,
    identity: Identity,
    user_agent: Option<String>,
) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(identity.id, &identity.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();
    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            identity_id: identity.id,
            refresh_token_hash: refresh_hash,
            expires_at,
            user_agent,
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        identity: identity.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_in_path_encodes_show_form() {
        assert_eq!(
            sign_in_path(Some(ReturnAction::ShowForm)),
            "/api/v1/auth/sign-in?returnTo=%7B%22type%22%3A%22show_form%22%7D"
        );
        assert_eq!(sign_in_path(None), "/api/v1/auth/sign-in");
    }
}
