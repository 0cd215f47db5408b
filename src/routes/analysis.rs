// ABOUTME: Route handlers for the mock exercise analysis endpoint
// ABOUTME: Accepts uploaded media and returns randomized placeholder results
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Exercise analysis stub
//!
//! This endpoint is an integration placeholder for a future real model. It
//! accepts a label from a fixed set plus one media file and returns a
//! fixed-shape result whose numbers are uniformly random: reps in `5..=24`,
//! calories in `20..=119`. No relationship exists between the uploaded media
//! and the returned values; the contract is shape and ranges only.

use crate::{auth::AuthResult, errors::AppError, resources::ServerResources};
use axum::{
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Exercise labels the stub accepts
pub const EXERCISES: &[&str] = &["pushups", "squats", "situps", "pullups", "lunges", "plank"];

/// Rep-count range of the mock generator (inclusive)
pub const REPS_RANGE: std::ops::RangeInclusive<u32> = 5..=24;

/// Calorie-estimate range of the mock generator (inclusive)
pub const CALORIES_RANGE: std::ops::RangeInclusive<u32> = 20..=119;

/// Fixed-shape analysis result
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub exercise: String,
    pub reps: u32,
    pub calories: u32,
    pub feedback: String,
}

/// Exercise analysis route handlers
pub struct AnalysisRoutes;

impl AnalysisRoutes {
    /// Create the analysis route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/exercise-ai/analyze", post(Self::handle_analyze))
            .with_state(resources)
    }

    /// Generate a mock result for a validated exercise label
    ///
    /// Results are ephemeral request/response payloads and never persisted.
    #[must_use]
    pub fn mock_result(exercise: &str) -> AnalysisResult {
        let mut rng = rand::thread_rng();
        AnalysisResult {
            exercise: exercise.to_owned(),
            reps: rng.gen_range(REPS_RANGE),
            calories: rng.gen_range(CALORIES_RANGE),
            feedback: "Great form! Keep it up!".to_owned(),
        }
    }

    /// Handle POST /api/exercise-ai/analyze
    async fn handle_analyze(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        mut multipart: Multipart,
    ) -> Result<Response, AppError> {
        let auth: AuthResult = resources
            .auth_middleware
            .authenticate_request(&headers)
            .await?;

        let mut exercise: Option<String> = None;
        let mut has_file = false;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::invalid_input(format!("Malformed multipart body: {e}")))?
        {
            match field.name() {
                Some("exercise") => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| AppError::invalid_input(format!("Invalid exercise field: {e}")))?;
                    exercise = Some(value);
                }
                Some("file") => {
                    // Media is accepted and discarded; the stub never reads it
                    let _ = field.bytes().await.map_err(|e| {
                        AppError::invalid_input(format!("Failed to read upload: {e}"))
                    })?;
                    has_file = true;
                }
                _ => {}
            }
        }

        let Some(exercise) = exercise else {
            return Err(AppError::new(
                crate::errors::ErrorCode::MissingRequiredField,
                "Missing exercise field",
            ));
        };

        if !EXERCISES.contains(&exercise.as_str()) {
            return Err(AppError::invalid_input(format!(
                "Unknown exercise: {exercise}"
            )));
        }

        let result = Self::mock_result(&exercise);

        tracing::info!(
            user_id = %auth.user_id,
            exercise = %exercise,
            has_file,
            "exercise analysis requested"
        );

        Ok((StatusCode::OK, Json(result)).into_response())
    }
}
