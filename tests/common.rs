// ABOUTME: Shared helpers for integration tests
// ABOUTME: Builds a router over a temp database and wraps request plumbing
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code)] // Not every test binary uses every helper

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use fitburn::config::environment::{Environment, GoogleOAuthConfig, ServerConfig};
use fitburn::database::Database;
use fitburn::resources::ServerResources;
use fitburn::server::build_router;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub resources: Arc<ServerResources>,
    // Holds the database file and uploads dir alive for the test's duration
    pub tmp: TempDir,
}

/// Build an app over a fresh temp-file database and uploads dir
pub async fn spawn_app() -> TestApp {
    let tmp = TempDir::new().unwrap();
    let database_url = format!("sqlite:{}", tmp.path().join("test.db").display());

    let config = ServerConfig {
        http_port: 0,
        database_url: database_url.clone(),
        jwt_secret: "integration-test-secret".into(),
        token_expiry_hours: 24,
        uploads_dir: tmp.path().join("uploads"),
        environment: Environment::Testing,
        google_oauth: GoogleOAuthConfig::default(),
    };

    let database = Database::new(&database_url).await.unwrap();
    let resources = Arc::new(ServerResources::new(database, config));
    let router = build_router(resources.clone());

    TestApp {
        router,
        resources,
        tmp,
    }
}

/// Send a JSON request and return status plus decoded body
pub async fn request_json(
    router: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = if let Some(body) = body {
        builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Send a multipart request with optional text and file fields
pub async fn request_multipart(
    router: &Router,
    path: &str,
    token: Option<&str>,
    text_fields: &[(&str, &str)],
    file_field: Option<(&str, &str, &[u8])>,
) -> (StatusCode, Value) {
    let boundary = "fitburn-test-boundary";
    let mut body = Vec::new();

    for (name, value) in text_fields {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some((name, file_name, data)) = file_field {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        );
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }

    let response = router
        .clone()
        .oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Register a user and return their session token
pub async fn register_user(router: &Router, email: &str, password: &str, name: &str) -> String {
    let (status, body) = request_json(
        router,
        "POST",
        "/api/auth/register",
        None,
        Some(serde_json::json!({ "email": email, "password": password, "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "registration failed: {body}");
    body["token"].as_str().unwrap().to_owned()
}
