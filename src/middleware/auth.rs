// ABOUTME: Authentication middleware for protected route handlers
// ABOUTME: Resolves bearer JWT tokens to user records before business logic runs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::auth::{AuthManager, AuthResult};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use axum::http::HeaderMap;
use uuid::Uuid;

/// Middleware resolving a bearer credential to exactly one user
///
/// Protected handlers call this before touching business logic; a missing or
/// invalid token never reaches a database mutation.
#[derive(Clone)]
pub struct AuthMiddleware {
    auth_manager: AuthManager,
    database: Database,
}

impl AuthMiddleware {
    /// Create new auth middleware
    #[must_use]
    pub const fn new(auth_manager: AuthManager, database: Database) -> Self {
        Self {
            auth_manager,
            database,
        }
    }

    /// Authenticate a request from its headers
    ///
    /// # Errors
    ///
    /// Returns an error if the Authorization header is missing or malformed,
    /// token validation fails, or the user no longer exists.
    pub async fn authenticate_request(&self, headers: &HeaderMap) -> AppResult<AuthResult> {
        let auth_header = headers
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(AppError::auth_required)?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::auth_invalid("Invalid authorization header format - must be 'Bearer <token>'")
        })?;

        self.authenticate_token(token).await
    }

    /// Authenticate a bare token string
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the user no longer exists.
    pub async fn authenticate_token(&self, token: &str) -> AppResult<AuthResult> {
        let claims = self
            .auth_manager
            .validate_token(token)
            .map_err(|e| AppError::auth_invalid(format!("JWT validation failed: {e}")))?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::auth_invalid("Invalid user ID in token"))?;

        // Confirm the subject still resolves to a record
        let user = self
            .database
            .get_user(user_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::auth_invalid("Token subject no longer exists"))?;

        tracing::debug!(user_id = %user.id, "request authenticated");

        Ok(AuthResult { user_id: user.id })
    }
}
