// ABOUTME: User authentication route handlers for registration, login, and Google OAuth
// ABOUTME: Provides REST endpoints for account management and the external-identity exchange
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication routes
//!
//! Handles user registration, password login, and the Google OAuth code
//! exchange. All handlers are thin wrappers that delegate business logic to
//! [`AuthService`]. Credential failures return one generic message so the
//! response never reveals which field was wrong.

use crate::{
    errors::{AppError, AppResult},
    models::{User, UserSummary},
    resources::ServerResources,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// User registration request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// User login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login and registration response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

/// Google OAuth callback query parameters
#[derive(Debug, Deserialize)]
pub struct GoogleCallbackQuery {
    pub code: String,
    #[allow(dead_code)]
    pub state: Option<String>,
}

/// Google token endpoint response
#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
}

/// Google userinfo profile
#[derive(Debug, Deserialize)]
struct GoogleProfile {
    id: String,
    email: String,
    name: Option<String>,
}

/// Authentication service for business logic
#[derive(Clone)]
pub struct AuthService;

impl AuthService {
    /// Handle user registration
    ///
    /// # Errors
    /// Returns an error if validation fails, the email is taken, or the
    /// database operation fails.
    pub async fn register(
        resources: &ServerResources,
        request: RegisterRequest,
    ) -> AppResult<LoginResponse> {
        tracing::info!("User registration attempt for email: {}", request.email);

        if !Self::is_valid_email(&request.email) {
            return Err(AppError::invalid_input("Invalid email format"));
        }
        if !Self::is_valid_password(&request.password) {
            return Err(AppError::invalid_input(
                "Password must be at least 6 characters",
            ));
        }
        if request.name.trim().is_empty() {
            return Err(AppError::invalid_input("Name must not be empty"));
        }

        if let Ok(Some(_)) = resources.database.get_user_by_email(&request.email).await {
            return Err(AppError::already_exists("A user with this email already exists"));
        }

        let password_hash = crate::auth::hash_password(request.password)
            .await
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        let user = User::new(request.name, request.email.clone(), Some(password_hash));
        resources
            .database
            .create_user(&user)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        tracing::info!("User registered successfully: {} ({})", request.email, user.id);

        Self::issue_session(resources, &user)
    }

    /// Handle password login
    ///
    /// # Errors
    /// Returns a generic authentication error if the email is unknown or the
    /// password does not match.
    pub async fn login(
        resources: &ServerResources,
        request: LoginRequest,
    ) -> AppResult<LoginResponse> {
        tracing::info!("User login attempt for email: {}", request.email);

        let user = resources
            .database
            .get_user_by_email_required(&request.email)
            .await
            .map_err(|_| AppError::auth_invalid("Invalid email or password"))?;

        let Some(password_hash) = user.password_hash.clone() else {
            // Google-only account; same generic message as a bad password
            return Err(AppError::auth_invalid("Invalid email or password"));
        };

        let is_valid = crate::auth::verify_password(request.password, password_hash)
            .await
            .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

        if !is_valid {
            tracing::warn!("Invalid password for user: {}", request.email);
            return Err(AppError::auth_invalid("Invalid email or password"));
        }

        tracing::info!("User logged in successfully: {} ({})", request.email, user.id);

        Self::issue_session(resources, &user)
    }

    /// Resolve a Google profile to a user record, creating one on first login
    ///
    /// # Errors
    /// Returns an error if the database operations fail.
    pub async fn login_with_google_profile(
        resources: &ServerResources,
        google_id: &str,
        email: &str,
        name: Option<&str>,
    ) -> AppResult<LoginResponse> {
        let existing = resources
            .database
            .get_user_by_google_id(google_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        let user = if let Some(user) = existing {
            user
        } else if let Some(user) = resources
            .database
            .get_user_by_email(email)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
        {
            // Same email registered with a password earlier; reuse the record
            user
        } else {
            let user = User::from_google(
                google_id.to_owned(),
                name.unwrap_or(email).to_owned(),
                email.to_owned(),
            );
            resources
                .database
                .create_user(&user)
                .await
                .map_err(|e| AppError::database(e.to_string()))?;
            tracing::info!("Created user from Google identity: {} ({})", email, user.id);
            user
        };

        Self::issue_session(resources, &user)
    }

    fn issue_session(resources: &ServerResources, user: &User) -> AppResult<LoginResponse> {
        let token = resources
            .auth_manager
            .generate_token(user)
            .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;
        Ok(LoginResponse {
            token,
            user: user.summary(),
        })
    }

    /// Validate email format
    #[must_use]
    pub fn is_valid_email(email: &str) -> bool {
        if email.len() <= 5 {
            return false;
        }
        let Some(at_pos) = email.find('@') else {
            return false;
        };
        if at_pos == 0 || at_pos == email.len() - 1 {
            return false;
        }
        let domain_part = &email[at_pos + 1..];
        domain_part.contains('.')
    }

    /// Validate password strength
    #[must_use]
    pub const fn is_valid_password(password: &str) -> bool {
        password.len() >= 6
    }
}

/// Authentication route handlers
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/register", post(Self::handle_register))
            .route("/api/auth/login", post(Self::handle_login))
            .route("/auth/google", get(Self::handle_google_start))
            .route("/auth/google/callback", get(Self::handle_google_callback))
            .with_state(resources)
    }

    /// Handle POST /api/auth/register
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RegisterRequest>,
    ) -> Result<Response, AppError> {
        let response = AuthService::register(&resources, request).await?;
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle POST /api/auth/login
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        let response = AuthService::login(&resources, request).await?;
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /auth/google - redirect to the Google consent screen
    async fn handle_google_start(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let oauth = &resources.config.google_oauth;
        let (Some(client_id), Some(redirect_uri)) =
            (oauth.client_id.as_deref(), oauth.redirect_uri.as_deref())
        else {
            return Err(AppError::config("Google OAuth is not configured"));
        };

        let state: String = rand::thread_rng()
            .sample_iter(rand::distributions::Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();

        let url = format!(
            "https://accounts.google.com/o/oauth2/v2/auth?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            urlencoding::encode(client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode("openid email profile"),
            state,
        );

        Ok(Redirect::temporary(&url).into_response())
    }

    /// Handle GET /auth/google/callback - exchange the code and redirect to
    /// the frontend with `token` and `user` as query parameters
    async fn handle_google_callback(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<GoogleCallbackQuery>,
    ) -> Result<Response, AppError> {
        let profile = Self::exchange_google_code(&resources, &query.code).await?;

        tracing::info!("Google OAuth callback for email: {}", profile.email);

        let session = AuthService::login_with_google_profile(
            &resources,
            &profile.id,
            &profile.email,
            profile.name.as_deref(),
        )
        .await?;

        let user_json = serde_json::to_string(&session.user)
            .map_err(|e| AppError::internal(format!("User serialization failed: {e}")))?;
        let destination = format!(
            "{}/oauth-callback?token={}&user={}",
            resources.config.google_oauth.frontend_url,
            urlencoding::encode(&session.token),
            urlencoding::encode(&user_json),
        );

        Ok(Redirect::temporary(&destination).into_response())
    }

    /// Exchange an authorization code for the Google profile
    async fn exchange_google_code(
        resources: &ServerResources,
        code: &str,
    ) -> Result<GoogleProfile, AppError> {
        let oauth = &resources.config.google_oauth;
        let (Some(client_id), Some(client_secret), Some(redirect_uri)) = (
            oauth.client_id.as_deref(),
            oauth.client_secret.as_deref(),
            oauth.redirect_uri.as_deref(),
        ) else {
            return Err(AppError::config("Google OAuth is not configured"));
        };

        let client = reqwest::Client::new();
        let token: GoogleTokenResponse = client
            .post("https://oauth2.googleapis.com/token")
            .form(&[
                ("code", code),
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::external_service("google", e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::external_service("google", e.to_string()))?
            .json()
            .await
            .map_err(|e| AppError::external_service("google", e.to_string()))?;

        let profile: GoogleProfile = client
            .get("https://www.googleapis.com/oauth2/v2/userinfo")
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| AppError::external_service("google", e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::external_service("google", e.to_string()))?
            .json()
            .await
            .map_err(|e| AppError::external_service("google", e.to_string()))?;

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(AuthService::is_valid_email("a@example.com"));
        assert!(!AuthService::is_valid_email("a@x"));
        assert!(!AuthService::is_valid_email("@example.com"));
        assert!(!AuthService::is_valid_email("no-at-sign"));
    }

    #[test]
    fn test_password_validation() {
        assert!(AuthService::is_valid_password("secret1"));
        assert!(!AuthService::is_valid_password("short"));
    }
}
