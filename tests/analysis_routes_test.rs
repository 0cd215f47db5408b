// ABOUTME: Integration tests for the mock exercise analysis endpoint
// ABOUTME: Verifies the fixed result shape, value ranges, and label validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use axum::http::StatusCode;
use common::{register_user, request_multipart, spawn_app};

#[tokio::test]
async fn test_analyze_returns_fixed_shape_within_ranges() {
    let app = spawn_app().await;
    let token = register_user(&app.router, "a@x.com", "secret1", "Ada").await;

    let (status, body) = request_multipart(
        &app.router,
        "/api/exercise-ai/analyze",
        Some(&token),
        &[("exercise", "pushups")],
        Some(("file", "workout.mp4", b"fake-video-bytes")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["exercise"], "pushups");
    let reps = body["reps"].as_u64().unwrap();
    let calories = body["calories"].as_u64().unwrap();
    assert!((5..=24).contains(&reps), "reps out of range: {reps}");
    assert!(
        (20..=119).contains(&calories),
        "calories out of range: {calories}"
    );
    assert_eq!(body["feedback"], "Great form! Keep it up!");
}

#[tokio::test]
async fn test_analyze_echoes_each_known_exercise() {
    let app = spawn_app().await;
    let token = register_user(&app.router, "a@x.com", "secret1", "Ada").await;

    for exercise in ["pushups", "squats", "situps", "pullups", "lunges", "plank"] {
        let (status, body) = request_multipart(
            &app.router,
            "/api/exercise-ai/analyze",
            Some(&token),
            &[("exercise", exercise)],
            Some(("file", "clip.mp4", b"bytes" as &[u8])),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{exercise} rejected");
        assert_eq!(body["exercise"], exercise);
    }
}

#[tokio::test]
async fn test_analyze_rejects_unknown_exercise() {
    let app = spawn_app().await;
    let token = register_user(&app.router, "a@x.com", "secret1", "Ada").await;

    let (status, body) = request_multipart(
        &app.router,
        "/api/exercise-ai/analyze",
        Some(&token),
        &[("exercise", "juggling")],
        Some(("file", "clip.mp4", b"bytes" as &[u8])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_analyze_requires_exercise_field() {
    let app = spawn_app().await;
    let token = register_user(&app.router, "a@x.com", "secret1", "Ada").await;

    let (status, body) = request_multipart(
        &app.router,
        "/api/exercise-ai/analyze",
        Some(&token),
        &[],
        Some(("file", "clip.mp4", b"bytes" as &[u8])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "MISSING_REQUIRED_FIELD");
}

#[tokio::test]
async fn test_analyze_requires_authentication() {
    let app = spawn_app().await;

    let (status, _) = request_multipart(
        &app.router,
        "/api/exercise-ai/analyze",
        None,
        &[("exercise", "pushups")],
        Some(("file", "clip.mp4", b"bytes" as &[u8])),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_results_are_not_persisted_to_the_total() {
    let app = spawn_app().await;
    let token = register_user(&app.router, "a@x.com", "secret1", "Ada").await;

    let (status, _) = request_multipart(
        &app.router,
        "/api/exercise-ai/analyze",
        Some(&token),
        &[("exercise", "squats")],
        Some(("file", "clip.mp4", b"bytes" as &[u8])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = common::request_json(
        &app.router,
        "GET",
        "/api/calories/total",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["totalCalories"], 0);
}
