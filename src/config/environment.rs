// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment-based configuration management for production deployment

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Environment type for security and logging decisions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Google OAuth client settings for external-identity login
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GoogleOAuthConfig {
    /// OAuth client id issued by Google
    pub client_id: Option<String>,
    /// OAuth client secret issued by Google
    pub client_secret: Option<String>,
    /// Redirect URI registered with Google (our callback endpoint)
    pub redirect_uri: Option<String>,
    /// Frontend URL to redirect to after the token exchange completes
    pub frontend_url: String,
}

impl GoogleOAuthConfig {
    /// Whether enough settings are present to run the Google login flow
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some() && self.redirect_uri.is_some()
    }
}

/// Server configuration loaded from environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP port to bind
    pub http_port: u16,
    /// Database connection string (`sqlite:...`)
    pub database_url: String,
    /// Secret used to sign session JWTs
    pub jwt_secret: String,
    /// Session token lifetime in hours
    pub token_expiry_hours: i64,
    /// Directory where uploaded avatars are stored
    pub uploads_dir: PathBuf,
    /// Deployment environment
    pub environment: Environment,
    /// Google OAuth settings (external-identity login)
    pub google_oauth: GoogleOAuthConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `JWT_SECRET` is missing in production or a numeric
    /// variable fails to parse.
    pub fn from_env() -> Result<Self> {
        let environment = Environment::from_str_or_default(
            &env::var("ENVIRONMENT").unwrap_or_default(),
        );

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if environment.is_production() => {
                anyhow::bail!("JWT_SECRET must be set in production")
            }
            Err(_) => {
                tracing::warn!("JWT_SECRET not set, using a development-only default");
                "fitburn-dev-secret".into()
            }
        };

        let http_port = env::var("HTTP_PORT")
            .unwrap_or_else(|_| "5003".into())
            .parse::<u16>()
            .context("Invalid HTTP_PORT")?;

        let token_expiry_hours = env::var("TOKEN_EXPIRY_HOURS")
            .unwrap_or_else(|_| "24".into())
            .parse::<i64>()
            .context("Invalid TOKEN_EXPIRY_HOURS")?;

        Ok(Self {
            http_port,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:data/fitburn.db".into()),
            jwt_secret,
            token_expiry_hours,
            uploads_dir: env::var("UPLOADS_DIR")
                .map_or_else(|_| PathBuf::from("uploads"), PathBuf::from),
            environment,
            google_oauth: GoogleOAuthConfig {
                client_id: env::var("GOOGLE_CLIENT_ID").ok(),
                client_secret: env::var("GOOGLE_CLIENT_SECRET").ok(),
                redirect_uri: env::var("GOOGLE_REDIRECT_URI").ok(),
                frontend_url: env::var("FRONTEND_URL")
                    .unwrap_or_else(|_| "http://localhost:3000".into()),
            },
        })
    }

    /// One-line configuration summary for startup logging (no secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "http_port={} database={} environment={} uploads_dir={} google_oauth={}",
            self.http_port,
            self.database_url,
            self.environment,
            self.uploads_dir.display(),
            if self.google_oauth.is_configured() {
                "configured"
            } else {
                "disabled"
            }
        )
    }
}
