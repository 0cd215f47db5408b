// ABOUTME: Integration tests for the calorie accumulator routes
// ABOUTME: Covers increment-returns-total, rejection of negative deltas, and per-user isolation
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use axum::http::StatusCode;
use common::{register_user, request_json, spawn_app};
use serde_json::json;

#[tokio::test]
async fn test_increments_accumulate() {
    let app = spawn_app().await;
    let token = register_user(&app.router, "a@x.com", "secret1", "Ada").await;

    let (status, body) = request_json(
        &app.router,
        "POST",
        "/api/calories",
        Some(&token),
        Some(json!({ "exercise": "pushups", "calories": 50 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCalories"], 50);

    let (status, body) = request_json(
        &app.router,
        "POST",
        "/api/calories",
        Some(&token),
        Some(json!({ "exercise": "squats", "calories": 50 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCalories"], 100);

    let (status, body) =
        request_json(&app.router, "GET", "/api/calories/total", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCalories"], 100);
}

#[tokio::test]
async fn test_exercise_label_is_optional() {
    let app = spawn_app().await;
    let token = register_user(&app.router, "a@x.com", "secret1", "Ada").await;

    let (status, body) = request_json(
        &app.router,
        "POST",
        "/api/calories",
        Some(&token),
        Some(json!({ "calories": 30 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCalories"], 30);
}

#[tokio::test]
async fn test_negative_delta_rejected_without_side_effect() {
    let app = spawn_app().await;
    let token = register_user(&app.router, "a@x.com", "secret1", "Ada").await;

    let (status, body) = request_json(
        &app.router,
        "POST",
        "/api/calories",
        Some(&token),
        Some(json!({ "calories": -10 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALUE_OUT_OF_RANGE");

    let (_, body) =
        request_json(&app.router, "GET", "/api/calories/total", Some(&token), None).await;
    assert_eq!(body["totalCalories"], 0);
}

#[tokio::test]
async fn test_zero_delta_is_a_no_op_read() {
    let app = spawn_app().await;
    let token = register_user(&app.router, "a@x.com", "secret1", "Ada").await;

    request_json(
        &app.router,
        "POST",
        "/api/calories",
        Some(&token),
        Some(json!({ "calories": 25 })),
    )
    .await;

    let (status, body) = request_json(
        &app.router,
        "POST",
        "/api/calories",
        Some(&token),
        Some(json!({ "calories": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCalories"], 25);
}

#[tokio::test]
async fn test_totals_are_per_user() {
    let app = spawn_app().await;
    let ada = register_user(&app.router, "a@x.com", "secret1", "Ada").await;
    let bob = register_user(&app.router, "b@x.com", "secret2", "Bob").await;

    request_json(
        &app.router,
        "POST",
        "/api/calories",
        Some(&ada),
        Some(json!({ "calories": 80 })),
    )
    .await;

    let (_, body) =
        request_json(&app.router, "GET", "/api/calories/total", Some(&bob), None).await;
    assert_eq!(body["totalCalories"], 0);

    let (_, body) =
        request_json(&app.router, "GET", "/api/calories/total", Some(&ada), None).await;
    assert_eq!(body["totalCalories"], 80);
}

#[tokio::test]
async fn test_concurrent_increments_sum_exactly() {
    let app = spawn_app().await;
    let token = register_user(&app.router, "a@x.com", "secret1", "Ada").await;

    let mut handles = Vec::new();
    for delta in 1..=10_i64 {
        let router = app.router.clone();
        let token = token.clone();
        handles.push(tokio::spawn(async move {
            let (status, _) = request_json(
                &router,
                "POST",
                "/api/calories",
                Some(&token),
                Some(json!({ "calories": delta })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let (_, body) =
        request_json(&app.router, "GET", "/api/calories/total", Some(&token), None).await;
    assert_eq!(body["totalCalories"], 55);
}
