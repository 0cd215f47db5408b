// ABOUTME: Route handlers for the calorie accumulator REST API
// ABOUTME: Provides the per-user running total increment and read endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Calorie accumulator routes
//!
//! The increment is a single atomic read-modify-write at the storage layer,
//! so concurrent requests for the same user always sum exactly. Negative
//! deltas are rejected at this boundary to keep the total monotonically
//! non-decreasing.

use crate::{auth::AuthResult, errors::AppError, resources::ServerResources};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Calorie increment request; `exercise` is recorded in logs only
#[derive(Debug, Deserialize)]
pub struct AddCaloriesRequest {
    pub exercise: Option<String>,
    pub calories: i64,
}

/// Running-total response
#[derive(Debug, Serialize, Deserialize)]
pub struct TotalCaloriesResponse {
    #[serde(rename = "totalCalories")]
    pub total_calories: i64,
}

/// Calorie accumulator route handlers
pub struct CaloriesRoutes;

impl CaloriesRoutes {
    /// Create all calorie routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/calories", post(Self::handle_add))
            .route("/api/calories/total", get(Self::handle_total))
            .with_state(resources)
    }

    async fn authenticate(
        headers: &HeaderMap,
        resources: &Arc<ServerResources>,
    ) -> Result<AuthResult, AppError> {
        resources.auth_middleware.authenticate_request(headers).await
    }

    /// Handle POST /api/calories - increment and return the new total
    async fn handle_add(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<AddCaloriesRequest>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources).await?;

        if request.calories < 0 {
            return Err(AppError::out_of_range("calories must be non-negative"));
        }

        let total_calories = resources
            .database
            .increment_calories(auth.user_id, request.calories)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        tracing::info!(
            user_id = %auth.user_id,
            exercise = request.exercise.as_deref().unwrap_or("unspecified"),
            amount = request.calories,
            total = total_calories,
            "calories recorded"
        );

        Ok((
            StatusCode::OK,
            Json(TotalCaloriesResponse { total_calories }),
        )
            .into_response())
    }

    /// Handle GET /api/calories/total - read the running total
    async fn handle_total(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources).await?;

        let total_calories = resources
            .database
            .get_total_calories(auth.user_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((
            StatusCode::OK,
            Json(TotalCaloriesResponse { total_calories }),
        )
            .into_response())
    }
}
