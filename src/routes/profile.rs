// ABOUTME: Route handlers for the profile REST API
// ABOUTME: Provides profile read/update, BMR write, and avatar upload endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Profile routes
//!
//! Reads and writes the authenticated user's profile. Partial updates are
//! allow-listed: fields not in [`ProfileUpdate`] are ignored even if present
//! in the request body. Avatar upload persists a file and then writes the
//! reference onto the record; the two effects are not transactional, so a
//! record-write failure can leave an orphaned file behind.

use crate::{
    auth::AuthResult,
    database::ProfileUpdate,
    errors::AppError,
    models::UserProfile,
    resources::ServerResources,
};
use axum::{
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Plausible BMR range in kcal/day; writes outside it are rejected
const BMR_RANGE: std::ops::RangeInclusive<i64> = 0..=10_000;

/// BMR update request
#[derive(Debug, Deserialize)]
pub struct BmrRequest {
    pub bmr: i64,
}

/// BMR update response
#[derive(Debug, Serialize, Deserialize)]
pub struct BmrResponse {
    pub bmr: i64,
}

/// Avatar upload response
#[derive(Debug, Serialize, Deserialize)]
pub struct AvatarResponse {
    #[serde(rename = "profilePic")]
    pub profile_pic: String,
    pub user: UserProfile,
}

/// Profile route handlers
pub struct ProfileRoutes;

impl ProfileRoutes {
    /// Create all profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/profile", get(Self::handle_get))
            .route("/api/profile", put(Self::handle_update))
            .route("/api/profile/bmr", put(Self::handle_update_bmr))
            .route("/api/profile/avatar", post(Self::handle_upload_avatar))
            .with_state(resources)
    }

    async fn authenticate(
        headers: &HeaderMap,
        resources: &Arc<ServerResources>,
    ) -> Result<AuthResult, AppError> {
        resources.auth_middleware.authenticate_request(headers).await
    }

    /// Handle GET /api/profile - the allow-listed field subset
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources).await?;

        let user = resources
            .database
            .get_user(auth.user_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found(format!("User {}", auth.user_id)))?;

        Ok((StatusCode::OK, Json(user.profile())).into_response())
    }

    /// Handle PUT /api/profile - partial update of allow-listed fields
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(update): Json<ProfileUpdate>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources).await?;

        if let Some(age) = update.age {
            if age < 0 {
                return Err(AppError::out_of_range("age must be non-negative"));
            }
        }
        for (field, value) in [("weight", update.weight), ("height", update.height)] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(AppError::out_of_range(format!(
                        "{field} must be a non-negative number"
                    )));
                }
            }
        }

        let user = resources
            .database
            .update_profile(auth.user_id, &update)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::OK, Json(user.profile())).into_response())
    }

    /// Handle PUT /api/profile/bmr - unconditional overwrite within bounds
    async fn handle_update_bmr(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<BmrRequest>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources).await?;

        if !BMR_RANGE.contains(&request.bmr) {
            return Err(AppError::out_of_range(format!(
                "bmr must be between {} and {}",
                BMR_RANGE.start(),
                BMR_RANGE.end()
            )));
        }

        let bmr = resources
            .database
            .update_bmr(auth.user_id, request.bmr)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::OK, Json(BmrResponse { bmr })).into_response())
    }

    /// Handle POST /api/profile/avatar - multipart upload of field `avatar`
    async fn handle_upload_avatar(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        mut multipart: Multipart,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources).await?;

        let mut upload: Option<(String, Vec<u8>)> = None;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::invalid_input(format!("Malformed multipart body: {e}")))?
        {
            if field.name() == Some("avatar") {
                let file_name = field.file_name().unwrap_or("avatar.png").to_owned();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::invalid_input(format!("Failed to read upload: {e}")))?;
                upload = Some((file_name, data.to_vec()));
            }
        }

        let Some((original_name, data)) = upload else {
            return Err(AppError::new(
                crate::errors::ErrorCode::MissingRequiredField,
                "No file uploaded",
            ));
        };

        let public_path = Self::store_avatar(&resources, auth.user_id, &original_name, &data).await?;

        let user = resources
            .database
            .update_profile_pic(auth.user_id, &public_path)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        tracing::info!(user_id = %auth.user_id, path = %public_path, "avatar uploaded");

        Ok((
            StatusCode::OK,
            Json(AvatarResponse {
                profile_pic: public_path,
                user: user.profile(),
            }),
        )
            .into_response())
    }

    /// Write the avatar to the uploads dir and return its public path
    ///
    /// Filenames embed the user id and a fresh UUID, so every upload produces
    /// a reference distinct from any previously issued one.
    async fn store_avatar(
        resources: &ServerResources,
        user_id: Uuid,
        original_name: &str,
        data: &[u8],
    ) -> Result<String, AppError> {
        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("png");
        let file_name = format!("{user_id}-{}.{ext}", Uuid::new_v4());

        let uploads_dir = &resources.config.uploads_dir;
        tokio::fs::create_dir_all(uploads_dir)
            .await
            .map_err(|e| AppError::storage(format!("Failed to create uploads dir: {e}")))?;
        tokio::fs::write(uploads_dir.join(&file_name), data)
            .await
            .map_err(|e| AppError::storage(format!("Failed to write avatar: {e}")))?;

        Ok(format!("/uploads/{file_name}"))
    }
}
