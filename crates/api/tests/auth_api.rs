//! HTTP-level tests for OAuth sign-in, session, refresh and sign-out.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, finish_sign_in, get, get_auth, post_json, post_json_auth, put_json_auth, sign_in,
    start_sign_in, PendingSignIn,
};
use raze_api::background::session_cleanup;
use serde_json::json;
use sqlx::PgPool;

const SHOW_FORM_SIGN_IN: &str = "/api/v1/auth/sign-in?returnTo=%7B%22type%22%3A%22show_form%22%7D";

async fn count(pool: &PgPool, table: &str) -> i64 {
    let row: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap();
    row.0
}

async fn session_rows(pool: &PgPool) -> i64 {
    count(pool, "user_sessions").await
}

// ---------------------------------------------------------------------------
// Sign-in redirect and callback
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn sign_in_redirects_with_return_action_in_callback(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, SHOW_FORM_SIGN_IN).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cookie = response.headers()["set-cookie"].to_str().unwrap();
    assert!(cookie.starts_with("raze_oauth_state="));
    assert!(cookie.contains("HttpOnly"));
    let location = response.headers()["location"].to_str().unwrap().to_string();
    let url = url::Url::parse(&location).unwrap();
    assert_eq!(url.host_str(), Some("idp.test"));

    let redirect_uri = url
        .query_pairs()
        .find(|(k, _)| k == "redirect_uri")
        .map(|(_, v)| v.into_owned())
        .unwrap();
    let callback = url::Url::parse(&redirect_uri).unwrap();
    assert_eq!(callback.path(), "/api/v1/auth/callback");
    let return_to = callback
        .query_pairs()
        .find(|(k, _)| k == "returnTo")
        .map(|(_, v)| v.into_owned());
    assert_eq!(return_to.as_deref(), Some(r#"{"type":"show_form"}"#));
    assert!(url.query_pairs().any(|(k, v)| k == "state" && !v.is_empty()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn callback_issues_tokens_and_defaults_redirect_home(pool: PgPool) {
    let app = common::build_test_app(pool);
    let signed_in = sign_in(app, "alice").await;

    let json = signed_in.callback;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["expires_in"], 900);
    assert_eq!(json["identity"]["email"], "alice@raze.test");
    assert_eq!(json["identity"]["role"], "user");
    assert!(json["return_action"].is_null());
    assert_eq!(json["redirect_path"], "/");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn repeated_sign_in_reuses_the_identity(pool: PgPool) {
    let app = common::build_test_app(pool);
    let first = sign_in(app.clone(), "alice").await;
    let second = sign_in(app, "alice").await;

    assert_eq!(first.identity_id, second.identity_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn configured_admin_email_gets_admin_role(pool: PgPool) {
    let app = common::build_test_app(pool);
    let signed_in = sign_in(app, "admin").await;

    assert_eq!(signed_in.callback["identity"]["role"], "admin");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn callback_decodes_show_form_action(pool: PgPool) {
    let app = common::build_test_app(pool);
    let pending = start_sign_in(app.clone(), SHOW_FORM_SIGN_IN).await;
    let response = finish_sign_in(app, &pending, "alice").await;

    assert_eq!(response.status(), StatusCode::OK);
    let cleared = response.headers()["set-cookie"].to_str().unwrap();
    assert!(cleared.starts_with("raze_oauth_state=;"));
    assert!(cleared.contains("Max-Age=0"));
    let json = body_json(response).await;
    assert_eq!(json["return_action"], json!({ "type": "show_form" }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_return_action_is_ignored(pool: PgPool) {
    let app = common::build_test_app(pool);
    let pending = start_sign_in(app.clone(), "/api/v1/auth/sign-in?returnTo=not-json").await;
    let response = finish_sign_in(app, &pending, "alice").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["return_action"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn provider_failure_is_auth_failed_with_return_home(pool: PgPool) {
    let app = common::build_test_app(pool);
    let pending = start_sign_in(app.clone(), "/api/v1/auth/sign-in").await;
    let response = finish_sign_in(app, &pending, common::REJECTED_CODE).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "AUTH_FAILED");
    assert_eq!(json["return_to"], "/");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn provider_error_parameter_is_auth_failed(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/auth/callback?error=access_denied").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "AUTH_FAILED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn callback_without_state_is_auth_failed(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/auth/callback?code=alice").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "AUTH_FAILED");
    assert_eq!(count(&pool, "identities").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn callback_with_another_browsers_state_is_auth_failed(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let victim = start_sign_in(app.clone(), "/api/v1/auth/sign-in").await;
    let attacker = start_sign_in(app.clone(), "/api/v1/auth/sign-in").await;

    // The attacker's state replayed into the victim's browser.
    let forged = PendingSignIn {
        cookie: victim.cookie.clone(),
        ..attacker.clone()
    };
    let response = finish_sign_in(app.clone(), &forged, "mallory").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "AUTH_FAILED");

    // No cookie at all.
    let cookieless = PendingSignIn {
        cookie: "theme=dark".to_string(),
        ..attacker
    };
    let response = finish_sign_in(app, &cookieless, "mallory").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(count(&pool, "identities").await, 0);
    assert_eq!(session_rows(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn callback_redirects_to_last_saved_path(pool: PgPool) {
    let app = common::build_test_app(pool);
    let first = sign_in(app.clone(), "alice").await;

    let response = put_json_auth(
        app.clone(),
        "/api/v1/progress/path",
        &first.access_token,
        json!({ "path": "/form" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let second = sign_in(app, "alice").await;
    assert_eq!(second.callback["redirect_path"], "/form");
}

// ---------------------------------------------------------------------------
// Session, refresh, sign-out
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn session_is_null_when_signed_out(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/auth/session").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn session_returns_signed_in_identity(pool: PgPool) {
    let app = common::build_test_app(pool);
    let signed_in = sign_in(app.clone(), "alice").await;

    let response = get_auth(app, "/api/v1/auth/session", &signed_in.access_token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], signed_in.identity_id);
    assert_eq!(json["data"]["display_name"], "alice");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_token_is_rejected_even_on_optional_auth(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/auth/session", "garbage").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_rotates_the_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let signed_in = sign_in(app.clone(), "alice").await;

    let body = json!({ "refresh_token": signed_in.refresh_token });
    let response = post_json(app.clone(), "/api/v1/auth/refresh", body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_ne!(json["refresh_token"], body["refresh_token"]);
    assert_eq!(json["identity"]["id"], signed_in.identity_id);

    // The old token was single-use.
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sign_out_revokes_sessions_and_clears_site_data(pool: PgPool) {
    let app = common::build_test_app(pool);
    let signed_in = sign_in(app.clone(), "alice").await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/auth/sign-out",
        &signed_in.access_token,
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(response.headers().contains_key("clear-site-data"));

    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": signed_in.refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cleanup_sweep_purges_rotated_and_signed_out_sessions(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let alice = sign_in(app.clone(), "alice").await;
    let bob = sign_in(app.clone(), "bob").await;

    // Rotation revokes alice's first session; sign-out revokes bob's.
    let response = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": alice.refresh_token }),
    )
    .await;
    let rotated = body_json(response).await["refresh_token"].clone();
    post_json_auth(app.clone(), "/api/v1/auth/sign-out", &bob.access_token, json!({})).await;

    assert_eq!(session_rows(&pool).await, 3);
    assert_eq!(session_cleanup::sweep(&pool).await, 2);
    assert_eq!(session_rows(&pool).await, 1);

    let response = post_json(app, "/api/v1/auth/refresh", json!({ "refresh_token": rotated })).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sign_out_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/auth/sign-out", json!({})).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Session event stream
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn event_stream_requires_a_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/auth/events").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn event_stream_accepts_query_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let signed_in = sign_in(app.clone(), "alice").await;

    let response = get(
        app,
        &format!("/api/v1/auth/events?token={}", signed_in.access_token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "text/event-stream");
}
