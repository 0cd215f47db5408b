// ABOUTME: Shared server state threaded through route handlers
// ABOUTME: Bundles database, auth manager, middleware, and configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared server state

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::middleware::AuthMiddleware;

/// Everything a route handler needs, shared behind one `Arc`
pub struct ServerResources {
    /// User storage
    pub database: Database,
    /// Session token manager
    pub auth_manager: AuthManager,
    /// Bearer-token gate for protected routes
    pub auth_middleware: AuthMiddleware,
    /// Server configuration
    pub config: ServerConfig,
}

impl ServerResources {
    /// Assemble server resources from configuration and a connected database
    #[must_use]
    pub fn new(database: Database, config: ServerConfig) -> Self {
        let auth_manager = AuthManager::new(
            config.jwt_secret.as_bytes(),
            config.token_expiry_hours,
        );
        let auth_middleware = AuthMiddleware::new(auth_manager.clone(), database.clone());
        Self {
            database,
            auth_manager,
            auth_middleware,
            config,
        }
    }
}
