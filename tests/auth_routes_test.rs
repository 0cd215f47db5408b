// ABOUTME: Integration tests for registration, login, and session enforcement
// ABOUTME: Exercises the auth routes end to end over a temp database
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use axum::http::StatusCode;
use common::{register_user, request_json, spawn_app};
use serde_json::json;

#[tokio::test]
async fn test_register_login_profile_roundtrip() {
    let app = spawn_app().await;

    let (status, body) = request_json(
        &app.router,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "email": "a@x.com", "password": "secret1", "name": "Ada" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["token"].as_str().unwrap().len() > 20);
    assert_eq!(body["user"]["email"], "a@x.com");
    assert_eq!(body["user"]["name"], "Ada");

    let (status, body) = request_json(
        &app.router,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "a@x.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_owned();

    let (status, body) =
        request_json(&app.router, "GET", "/api/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["bmr"], 0);

    let (status, body) =
        request_json(&app.router, "GET", "/api/calories/total", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCalories"], 0);
}

#[tokio::test]
async fn test_login_failures_use_one_generic_message() {
    let app = spawn_app().await;
    register_user(&app.router, "a@x.com", "secret1", "Ada").await;

    let (status, unknown_email) = request_json(
        &app.router,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "nobody@x.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, wrong_password) = request_json(
        &app.router,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "a@x.com", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The message must not reveal which credential was wrong
    assert_eq!(unknown_email["message"], wrong_password["message"]);
    assert_eq!(unknown_email["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_register_duplicate_email_conflict() {
    let app = spawn_app().await;
    register_user(&app.router, "a@x.com", "secret1", "Ada").await;

    let (status, _) = request_json(
        &app.router,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "email": "a@x.com", "password": "another7", "name": "Imposter" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_rejects_invalid_input() {
    let app = spawn_app().await;

    let (status, _) = request_json(
        &app.router,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "email": "not-an-email", "password": "secret1", "name": "Ada" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request_json(
        &app.router,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "email": "a@x.com", "password": "short", "name": "Ada" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request_json(
        &app.router,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "email": "a@x.com", "password": "secret1", "name": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_protected_routes_reject_missing_or_bad_tokens() {
    let app = spawn_app().await;

    for path in ["/api/profile", "/api/calories/total"] {
        let (status, _) = request_json(&app.router, "GET", path, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "no token on {path}");

        let (status, _) =
            request_json(&app.router, "GET", path, Some("not-a-real-token"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "garbage token on {path}");
    }
}

#[tokio::test]
async fn test_google_login_without_configuration_fails_cleanly() {
    let app = spawn_app().await;

    let (status, _) = request_json(&app.router, "GET", "/auth/google", None, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
