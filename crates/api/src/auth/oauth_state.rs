//! OAuth `state` values that bind a callback to the browser that started it.
//!
//! Sign-in hands the provider a short-lived HS256 token holding a random
//! nonce and sets the same nonce in an HttpOnly cookie. The callback is
//! only accepted when the token verifies and its nonce equals the cookie's.

use axum::http::{header, HeaderMap};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::jwt::JwtConfig;

/// Cookie carrying the sign-in nonce.
pub const STATE_COOKIE: &str = "raze_oauth_state";

/// Lifetime of a sign-in attempt, in seconds.
pub const STATE_TTL_SECS: i64 = 600;

/// Cookie scope; the callback lives under it.
const COOKIE_PATH: &str = "/api/v1/auth";

/// Keeps state tokens from validating as anything else and vice versa.
const STATE_AUDIENCE: &str = "raze-oauth-state";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateClaims {
    pub nonce: String,
    pub aud: String,
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Missing OAuth state")]
    Missing,

    #[error("Invalid OAuth state: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    #[error("OAuth state does not belong to this browser")]
    NonceMismatch,
}

/// Issue a state token. Returns `(state, nonce)`; the nonce goes in the
/// cookie.
pub fn issue_state(config: &JwtConfig) -> Result<(String, String), jsonwebtoken::errors::Error> {
    let nonce = Uuid::new_v4().to_string();
    let claims = StateClaims {
        nonce: nonce.clone(),
        aud: STATE_AUDIENCE.to_string(),
        exp: chrono::Utc::now().timestamp() + STATE_TTL_SECS,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;
    Ok((token, nonce))
}

/// Verify a callback's `state` against the nonce cookie.
pub fn verify_state(
    state: Option<&str>,
    cookie_nonce: Option<&str>,
    config: &JwtConfig,
) -> Result<StateClaims, StateError> {
    let state = state.ok_or(StateError::Missing)?;
    let mut validation = Validation::default();
    validation.set_audience(&[STATE_AUDIENCE]);
    let claims = decode::<StateClaims>(
        state,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?
    .claims;

    match cookie_nonce {
        Some(nonce) if nonce == claims.nonce => Ok(claims),
        _ => Err(StateError::NonceMismatch),
    }
}

/// `Set-Cookie` value carrying the nonce.
pub fn state_cookie(nonce: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{STATE_COOKIE}={nonce}; Path={COOKIE_PATH}; Max-Age={STATE_TTL_SECS}; HttpOnly; SameSite=Lax"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that drops the nonce once the callback has used it.
pub fn clear_state_cookie() -> String {
    format!("{STATE_COOKIE}=; Path={COOKIE_PATH}; Max-Age=0; HttpOnly; SameSite=Lax")
}

/// The nonce from the request's `Cookie` headers, if present.
pub fn nonce_from_cookies(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == STATE_COOKIE)
        .map(|(_, value)| value.to_string())
}
